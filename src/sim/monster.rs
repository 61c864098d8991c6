//! Monster actor and its motion state machine
//!
//! A monster appears on the upper platform, slides to a random drop point,
//! falls, and slides along the floor towards the turret. State transitions
//! come from two places: the per-frame [`Monster::tick`] (drop point reached,
//! low-altitude gravity fix) and collision reports fed in through
//! [`Monster::handle_contact`], which are applied immediately.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::events::{Contact, GameEvent, MonsterHandle};
use super::particles::ParticleKind;
use super::pool::Poolable;
use crate::Range;
use crate::consts::{DROP_REACH_DISTANCE, GRAVITY_RESTORE_Y};

/// Monster variants; each has its own pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterColor {
    Blue,
    Red,
}

/// Motion phase of a monster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionState {
    /// Parked in the pool
    #[default]
    Inert,
    /// Sliding along the upper platform towards the drop point
    PlatformMotion,
    /// Falling from the platform
    DroppingDown,
    /// Sliding along the floor
    FloorMotion,
}

/// Hit counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub max: u32,
    pub current: u32,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { max, current: max }
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }

    /// Take one hit. Returns true when health ran out.
    pub fn hit(&mut self) -> bool {
        self.current = self.current.saturating_sub(1);
        self.current == 0
    }
}

/// Per-spawn movement parameters drawn from the spawner's current ranges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnParams {
    pub horizontal_velocity: Range,
    pub vertical_velocity: Range,
    pub drop_range: i32,
}

/// A pooled monster
#[derive(Debug, Clone)]
pub struct Monster<B> {
    handle: MonsterHandle,
    body: B,
    state: MotionState,
    horizontal_speed: f32,
    vertical_speed: f32,
    drop_target: Vec2,
    drop_range: i32,
    alive: bool,
    active: bool,
    health: Health,
    score: u32,
    /// Parking position while inactive
    home: Vec2,
}

impl<B: PhysicsBody> Monster<B> {
    pub fn new(handle: MonsterHandle, body: B, score: u32, max_health: u32, home: Vec2) -> Self {
        let mut monster = Self {
            handle,
            body,
            state: MotionState::Inert,
            horizontal_speed: 0.0,
            vertical_speed: 0.0,
            drop_target: Vec2::ZERO,
            drop_range: 0,
            alive: false,
            active: false,
            health: Health::new(max_health),
            score,
            home,
        };
        monster.reset();
        monster
    }

    pub fn handle(&self) -> MonsterHandle {
        self.handle
    }

    pub fn color(&self) -> MonsterColor {
        self.handle.kind
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn drop_target(&self) -> Vec2 {
        self.drop_target
    }

    pub fn horizontal_speed(&self) -> f32 {
        self.horizontal_speed
    }

    pub fn vertical_speed(&self) -> f32 {
        self.vertical_speed
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    /// Bring a claimed monster to life at `position` and start it on the platform
    pub fn spawn<R: Rng + ?Sized>(&mut self, position: Vec2, params: &SpawnParams, rng: &mut R) {
        debug_assert!(self.active, "spawn on an unclaimed monster");
        self.alive = true;
        self.health.refill();
        self.drop_range = params.drop_range;
        self.horizontal_speed = params.horizontal_velocity.sample(rng);
        self.vertical_speed = params.vertical_velocity.sample(rng);
        self.body.set_position(position);
        self.enter_platform_motion(rng);
    }

    /// Per-frame update
    pub fn tick(&mut self) {
        if !self.active || !self.alive {
            return;
        }
        match self.state {
            MotionState::Inert | MotionState::FloorMotion => {}
            MotionState::PlatformMotion => {
                let distance = (self.body.position() - self.drop_target).length();
                if distance <= DROP_REACH_DISTANCE {
                    self.body.set_velocity(Vec2::ZERO);
                    self.enter_dropping_down();
                }
            }
            MotionState::DroppingDown => {
                // Platform contact can leave the body kinematic on the way down
                if self.body.position().y < GRAVITY_RESTORE_Y && !self.body.gravity_enabled() {
                    self.body.set_gravity_enabled(true);
                }
            }
        }
    }

    /// Apply a collision report immediately
    pub fn handle_contact<R: Rng + ?Sized>(
        &mut self,
        contact: Contact,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        if !self.active {
            return;
        }
        match contact {
            Contact::LandedOnPlatform => self.enter_platform_motion(rng),
            Contact::LandedOnFloor => self.enter_floor_motion(),
            Contact::HitPlayer => self.kill_player(events),
            Contact::HitBoundary => {}
        }
    }

    /// One projectile hit. Returns true if it killed the monster.
    pub fn take_damage(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if !self.active || !self.alive {
            return false;
        }
        let position = self.body.position();
        if self.health.hit() {
            events.push(GameEvent::ParticleRequested {
                kind: ParticleKind::ProjectileHit,
                position,
            });
            events.push(GameEvent::Score { points: self.score });
            self.deactivate(events);
            true
        } else {
            events.push(GameEvent::ParticleRequested {
                kind: ParticleKind::ProjectileLost,
                position,
            });
            false
        }
    }

    /// Stop, park and go inert
    pub fn reset(&mut self) {
        self.alive = false;
        self.body.set_velocity(Vec2::ZERO);
        self.body.set_gravity_enabled(false);
        self.active = false;
        self.body.set_position(self.home);
        self.state = MotionState::Inert;
    }

    fn kill_player(&mut self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::PlayerKilled);
        self.deactivate(events);
    }

    fn deactivate(&mut self, events: &mut Vec<GameEvent>) {
        self.reset();
        events.push(GameEvent::MonsterDeactivated(self.handle));
    }

    fn enter_platform_motion<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.state == MotionState::PlatformMotion {
            return;
        }
        let position = self.body.position();
        let target_x = rng.random_range(-self.drop_range..=self.drop_range) as f32;
        self.drop_target = Vec2::new(target_x, position.y);

        self.body.set_gravity_enabled(false);
        let direction = if target_x > position.x { 1.0 } else { -1.0 };
        self.body
            .set_velocity(Vec2::new(direction * self.horizontal_speed, 0.0));

        self.state = MotionState::PlatformMotion;
    }

    fn enter_dropping_down(&mut self) {
        if self.state == MotionState::DroppingDown {
            return;
        }
        self.body.set_gravity_enabled(true);
        self.body.set_velocity(Vec2::new(0.0, -self.vertical_speed));
        self.state = MotionState::DroppingDown;
    }

    fn enter_floor_motion(&mut self) {
        if self.state == MotionState::FloorMotion {
            return;
        }
        self.body.set_gravity_enabled(false);
        let direction = if self.body.position().x < 0.0 { 1.0 } else { -1.0 };
        self.body
            .set_velocity(Vec2::new(direction * self.horizontal_speed, 0.0));
        self.state = MotionState::FloorMotion;
    }
}

impl<B: PhysicsBody> Poolable for Monster<B> {
    fn is_active(&self) -> bool {
        self.active
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn release(&mut self) {
        self.reset();
    }
}
