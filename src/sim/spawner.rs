//! Monster spawning and difficulty ramp
//!
//! Spawns one monster per interval while the game is playable. Blue
//! monsters come in streaks; after `red_threshold` blues a red one drops
//! and a new threshold is drawn. Every spawn also feeds two ramp counters:
//! one speeds up the drop, the other shortens the interval.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{KinematicBody, PhysicsBody};
use super::events::{Contact, GameEvent, MonsterHandle};
use super::monster::{Monster, MonsterColor, SpawnParams};
use super::pool::{Factory, Pool, PoolHandle, Poolable};
use crate::Range;
use crate::consts::*;
use crate::error::SimError;
use crate::tuning::SpawnerTuning;

/// Mutable difficulty state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnState {
    pub horizontal_velocity: Range,
    pub vertical_velocity: Range,
    /// Working interval; starts at the configured maximum
    pub next_spawn_interval: f32,
    /// Seconds since the last spawn
    pub spawn_timer: f32,
    /// Blue spawns since the last red
    pub blue_streak: u32,
    pub red_threshold: u32,
    pub speed_bump_counter: u32,
    pub interval_counter: u32,
    /// Spawns since the last reset
    pub total_spawns: u64,
}

impl SpawnState {
    fn initial<R: Rng + ?Sized>(tuning: &SpawnerTuning, rng: &mut R) -> Self {
        Self {
            horizontal_velocity: tuning.horizontal_velocity,
            vertical_velocity: tuning.vertical_velocity,
            next_spawn_interval: tuning.spawn_interval.max,
            spawn_timer: 0.0,
            blue_streak: 0,
            red_threshold: rng.random_range(INITIAL_RED_THRESHOLD.0..INITIAL_RED_THRESHOLD.1),
            speed_bump_counter: 0,
            interval_counter: 0,
            total_spawns: 0,
        }
    }
}

/// Owns the monster pools and decides what spawns when
pub struct MonsterSpawner<B> {
    tuning: SpawnerTuning,
    state: SpawnState,
    blue: Pool<MonsterColor, Monster<B>>,
    red: Pool<MonsterColor, Monster<B>>,
}

impl<B> std::fmt::Debug for MonsterSpawner<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonsterSpawner")
            .field("state", &self.state)
            .field("blue", &self.blue)
            .field("red", &self.red)
            .finish_non_exhaustive()
    }
}

impl<B: PhysicsBody + 'static> MonsterSpawner<B> {
    /// Build both pools and prewarm them. `bodies` creates the physics body
    /// for each new monster.
    pub fn new<R, F>(tuning: &SpawnerTuning, bodies: F, rng: &mut R) -> Result<Self, SimError>
    where
        R: Rng + ?Sized,
        F: Factory<MonsterColor, B> + Clone + 'static,
    {
        if tuning.spawn_points.is_empty() {
            return Err(SimError::NoSpawnPoints);
        }
        let mut blue = Pool::new(MonsterColor::Blue, monster_factory(tuning, bodies.clone()));
        let mut red = Pool::new(MonsterColor::Red, monster_factory(tuning, bodies));
        blue.prewarm(tuning.blue_pool_size)?;
        red.prewarm(tuning.red_pool_size)?;
        log::debug!(
            "Monster pools ready: {} blue, {} red",
            blue.len(),
            red.len()
        );

        Ok(Self {
            tuning: tuning.clone(),
            state: SpawnState::initial(tuning, rng),
            blue,
            red,
        })
    }

    pub fn state(&self) -> &SpawnState {
        &self.state
    }

    /// Mutable access for scripted scenarios and tests
    pub fn state_mut(&mut self) -> &mut SpawnState {
        &mut self.state
    }

    pub fn pool(&self, color: MonsterColor) -> &Pool<MonsterColor, Monster<B>> {
        match color {
            MonsterColor::Blue => &self.blue,
            MonsterColor::Red => &self.red,
        }
    }

    fn pool_mut(&mut self, color: MonsterColor) -> &mut Pool<MonsterColor, Monster<B>> {
        match color {
            MonsterColor::Blue => &mut self.blue,
            MonsterColor::Red => &mut self.red,
        }
    }

    pub fn monster(&self, handle: MonsterHandle) -> Option<&Monster<B>> {
        self.pool(handle.kind).get(handle)
    }

    pub fn monster_mut(&mut self, handle: MonsterHandle) -> Option<&mut Monster<B>> {
        self.pool_mut(handle.kind).get_mut(handle)
    }

    /// Active monsters in both pools, blue first
    pub fn active_monsters(&self) -> impl Iterator<Item = (MonsterHandle, &Monster<B>)> {
        self.blue.iter_active().chain(self.red.iter_active())
    }

    /// Every monster, active or not
    pub fn monsters_mut(&mut self) -> impl Iterator<Item = &mut Monster<B>> {
        self.blue.iter_mut().chain(self.red.iter_mut())
    }

    /// Accumulate time and spawn once the interval has passed
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        playable: bool,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) -> Result<Option<MonsterHandle>, SimError> {
        if !playable {
            return Ok(None);
        }
        self.state.spawn_timer += dt;
        if self.state.spawn_timer < self.state.next_spawn_interval {
            return Ok(None);
        }
        let handle = self.spawn(rng, events)?;
        self.state.spawn_timer = 0.0;
        Ok(Some(handle))
    }

    /// Spawn one monster immediately and advance the difficulty ramp
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) -> Result<MonsterHandle, SimError> {
        let color = self.next_color(rng);
        let handle = self.drop_monster(color, rng, events)?;
        self.ramp_difficulty();
        self.state.total_spawns += 1;
        Ok(handle)
    }

    /// Run every active monster's per-frame state machine
    pub fn tick_monsters(&mut self) {
        for monster in self.monsters_mut() {
            monster.tick();
        }
    }

    /// Route a collision report to a monster. Unknown handles are ignored.
    pub fn handle_contact<R: Rng + ?Sized>(
        &mut self,
        handle: MonsterHandle,
        contact: Contact,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        match self.monster_mut(handle) {
            Some(monster) => monster.handle_contact(contact, rng, events),
            None => log::warn!("Contact {contact:?} for unknown monster {handle:?}"),
        }
    }

    /// One projectile hit on a monster. Returns true if it died.
    pub fn damage(&mut self, handle: MonsterHandle, events: &mut Vec<GameEvent>) -> bool {
        match self.monster_mut(handle) {
            Some(monster) => monster.take_damage(events),
            None => {
                log::warn!("Hit on unknown monster {handle:?}");
                false
            }
        }
    }

    /// Park every monster and restore the configured difficulty
    pub fn global_reset<R: Rng + ?Sized>(&mut self, rng: &mut R, events: &mut Vec<GameEvent>) {
        for monster in self.monsters_mut() {
            let was_active = monster.is_active();
            monster.reset();
            if was_active {
                events.push(GameEvent::MonsterDeactivated(monster.handle()));
            }
        }
        self.state = SpawnState::initial(&self.tuning, rng);
        log::debug!("Spawner reset, next red after {}", self.state.red_threshold);
    }

    fn next_color<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MonsterColor {
        if self.state.blue_streak < self.state.red_threshold {
            self.state.blue_streak += 1;
            MonsterColor::Blue
        } else {
            self.state.blue_streak = 0;
            self.state.red_threshold = rng.random_range(RED_THRESHOLD.0..RED_THRESHOLD.1);
            MonsterColor::Red
        }
    }

    fn drop_monster<R: Rng + ?Sized>(
        &mut self,
        color: MonsterColor,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) -> Result<MonsterHandle, SimError> {
        let points = &self.tuning.spawn_points;
        let position = points[rng.random_range(0..points.len())];
        let params = SpawnParams {
            horizontal_velocity: self.state.horizontal_velocity,
            vertical_velocity: self.state.vertical_velocity,
            drop_range: self.tuning.drop_range,
        };

        let pool = self.pool_mut(color);
        let handle = pool.acquire()?;
        if let Some(monster) = pool.get_mut(handle) {
            monster.spawn(position, &params, rng);
        }
        log::debug!("Spawned {color:?} monster in slot {} at {position}", handle.slot);
        events.push(GameEvent::MonsterSpawned { handle, position });
        Ok(handle)
    }

    fn ramp_difficulty(&mut self) {
        let state = &mut self.state;

        state.speed_bump_counter += 1;
        if state.speed_bump_counter > SPEED_BUMP_SPAWNS {
            if state.vertical_velocity.min < VERTICAL_MIN_CEILING {
                state.vertical_velocity.min += SPEED_BUMP_STEP;
            }
            if state.vertical_velocity.max < VERTICAL_MAX_CEILING {
                state.vertical_velocity.max += SPEED_BUMP_STEP;
            }
            state.speed_bump_counter = 0;
        }

        state.interval_counter += 1;
        if state.interval_counter > INTERVAL_BUMP_SPAWNS {
            if state.next_spawn_interval > self.tuning.spawn_interval.min {
                state.next_spawn_interval -= INTERVAL_BUMP_STEP;
            }
            state.interval_counter = 0;
        }
    }
}

/// Wrap a body factory into one that builds complete monsters
fn monster_factory<B, F>(
    tuning: &SpawnerTuning,
    mut bodies: F,
) -> impl Factory<MonsterColor, Monster<B>> + 'static
where
    B: PhysicsBody + 'static,
    F: Factory<MonsterColor, B> + 'static,
{
    let home = tuning.home;
    let (blue_score, red_score) = (tuning.blue_score, tuning.red_score);
    let (blue_health, red_health) = (tuning.blue_health, tuning.red_health);
    move |color: MonsterColor, slot: usize| -> Result<Monster<B>, SimError> {
        let body = bodies.instantiate(color, slot)?;
        let (score, health) = match color {
            MonsterColor::Blue => (blue_score, blue_health),
            MonsterColor::Red => (red_score, red_health),
        };
        let handle = PoolHandle { kind: color, slot };
        Ok(Monster::new(handle, body, score, health, home))
    }
}

/// Body factory that parks new bodies at `home`
pub fn kinematic_bodies(home: Vec2) -> impl Factory<MonsterColor, KinematicBody> + Clone + 'static {
    move |_: MonsterColor, _: usize| -> Result<KinematicBody, SimError> { Ok(KinematicBody::at(home)) }
}
