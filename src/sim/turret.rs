//! Turret aiming and fire gating

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::energy::EnergyGenerator;
use super::events::{GameEvent, ProjectileHandle};
use super::pool::Pool;
use super::projectile::Projectile;
use crate::error::SimError;
use crate::tuning::TurretTuning;

/// Player controls sampled for one frame
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TurretInput {
    /// Horizontal axis in `[-1, 1]`; positive turns right
    pub turn: f32,
    /// Fire button is down this frame
    pub fire_held: bool,
    /// Fire button went up this frame
    pub fire_released: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    tuning: TurretTuning,
    /// Degrees from vertical, positive is clockwise (right)
    rotation: f32,
    /// Seconds since the turret came online
    clock: f32,
    next_fire: f32,
    hold_timer: f32,
}

impl Turret {
    pub fn new(tuning: &TurretTuning) -> Self {
        Self {
            tuning: tuning.clone(),
            rotation: 0.0,
            clock: 0.0,
            next_fire: 0.0,
            hold_timer: 0.0,
        }
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Unit vector the barrel points along
    pub fn heading(&self) -> Vec2 {
        let radians = self.rotation.to_radians();
        Vec2::new(radians.sin(), radians.cos())
    }

    pub fn muzzle(&self) -> Vec2 {
        self.tuning.fire_point + self.heading() * self.tuning.barrel_length
    }

    /// Turn, then fire if the trigger, cooldown and generator all allow it.
    /// Returns the fired projectile, if any.
    pub fn update(
        &mut self,
        input: &TurretInput,
        dt: f32,
        energy: &mut EnergyGenerator,
        projectiles: &mut Pool<(), Projectile>,
        events: &mut Vec<GameEvent>,
    ) -> Result<Option<ProjectileHandle>, SimError> {
        self.clock += dt;

        self.rotation += input.turn.clamp(-1.0, 1.0) * self.tuning.turn_speed * 10.0 * dt;
        self.rotation = self.rotation.clamp(-self.tuning.fov, self.tuning.fov);

        let mut fired = None;
        if input.fire_held && self.clock > self.next_fire && energy.can_fire() {
            fired = Some(self.shoot(projectiles, events)?);

            self.hold_timer += dt;
            if self.hold_timer >= self.tuning.hold_threshold {
                energy.on_fire_held(events);
            }
        }

        if input.fire_released {
            self.hold_timer = 0.0;
            energy.on_fire_released();
        }
        Ok(fired)
    }

    /// Back to center with no cooldown pending
    pub fn reset(&mut self) {
        self.rotation = 0.0;
        self.next_fire = self.clock;
        self.hold_timer = 0.0;
    }

    fn shoot(
        &mut self,
        projectiles: &mut Pool<(), Projectile>,
        events: &mut Vec<GameEvent>,
    ) -> Result<ProjectileHandle, SimError> {
        let handle = projectiles.acquire()?;
        let (muzzle, heading) = (self.muzzle(), self.heading());
        if let Some(projectile) = projectiles.get_mut(handle) {
            projectile.fire(muzzle, heading);
        }
        self.next_fire = self.clock + self.tuning.fire_rate;
        events.push(GameEvent::ProjectileFired(handle));
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::EnergyTuning;

    fn rig() -> (Turret, EnergyGenerator, Pool<(), Projectile>) {
        let tuning = TurretTuning::default();
        let speed = tuning.projectile_speed;
        let pool = Pool::new((), move |_: (), _: usize| -> Result<Projectile, SimError> {
            Ok(Projectile::new(speed))
        });
        (
            Turret::new(&tuning),
            EnergyGenerator::new(&EnergyTuning::default()),
            pool,
        )
    }

    const HOLD: TurretInput = TurretInput {
        turn: 0.0,
        fire_held: true,
        fire_released: false,
    };

    #[test]
    fn test_rotation_clamped_to_fov() {
        let (mut turret, mut energy, mut pool) = rig();
        let mut events = Vec::new();
        let input = TurretInput {
            turn: 1.0,
            ..Default::default()
        };
        for _ in 0..200 {
            turret
                .update(&input, 0.1, &mut energy, &mut pool, &mut events)
                .unwrap();
        }
        assert_eq!(turret.rotation(), 75.0);
        assert!(turret.heading().x > 0.0);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let (mut turret, mut energy, mut pool) = rig();
        let mut events = Vec::new();
        let first = turret
            .update(&HOLD, 0.05, &mut energy, &mut pool, &mut events)
            .unwrap();
        assert!(first.is_some());
        let second = turret
            .update(&HOLD, 0.05, &mut energy, &mut pool, &mut events)
            .unwrap();
        assert!(second.is_none());

        let mut fired = 0;
        for _ in 0..10 {
            if turret
                .update(&HOLD, 0.05, &mut energy, &mut pool, &mut events)
                .unwrap()
                .is_some()
            {
                fired += 1;
            }
        }
        assert!(fired >= 2);
        let projectile = pool.get(first.unwrap()).unwrap();
        assert_eq!(projectile.vel, Vec2::new(0.0, 45.0));
    }

    #[test]
    fn test_sustained_fire_overheats_and_blocks() {
        let (mut turret, mut energy, mut pool) = rig();
        let mut events = Vec::new();
        for _ in 0..500 {
            turret
                .update(&HOLD, 0.25, &mut energy, &mut pool, &mut events)
                .unwrap();
        }
        assert!(energy.is_overheated());
        let shots = pool.len();
        let again = turret
            .update(&HOLD, 0.25, &mut energy, &mut pool, &mut events)
            .unwrap();
        assert!(again.is_none());
        assert_eq!(pool.len(), shots);
    }

    #[test]
    fn test_release_starts_restoration() {
        let (mut turret, mut energy, mut pool) = rig();
        let mut events = Vec::new();
        for _ in 0..6 {
            turret
                .update(&HOLD, 0.25, &mut energy, &mut pool, &mut events)
                .unwrap();
        }
        assert!(energy.bars() < energy.max_bars());
        let release = TurretInput {
            fire_released: true,
            ..Default::default()
        };
        turret
            .update(&release, 0.016, &mut energy, &mut pool, &mut events)
            .unwrap();
        assert!(energy.is_restoring());
    }
}
