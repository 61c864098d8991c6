//! Data-driven game balance
//!
//! Every knob a level designer can turn lives here. Defaults are the
//! shipped balance; a JSON file can override any subset.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Range;
use crate::error::SimError;

/// Monster spawning and movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerTuning {
    /// Drop targets are drawn from `-drop_range..=drop_range`
    pub drop_range: i32,
    /// Initial horizontal speed range
    pub horizontal_velocity: Range,
    /// Initial vertical (drop) speed range
    pub vertical_velocity: Range,
    /// Seconds between spawns: starts at `max`, ramps down to `min`
    pub spawn_interval: Range,
    /// Positions on the platform monsters appear at
    pub spawn_points: Vec<Vec2>,
    /// Where inactive monsters park
    pub home: Vec2,
    pub blue_pool_size: usize,
    pub red_pool_size: usize,
    /// Score per kill
    pub blue_score: u32,
    pub red_score: u32,
    /// Hits to kill
    pub blue_health: u32,
    pub red_health: u32,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self {
            drop_range: 12,
            horizontal_velocity: Range::new(6.0, 8.0),
            vertical_velocity: Range::new(3.0, 5.0),
            spawn_interval: Range::new(1.5, 2.0),
            spawn_points: vec![Vec2::new(-14.0, 6.5), Vec2::new(14.0, 6.5)],
            home: Vec2::new(0.0, 10.0),
            blue_pool_size: 10,
            red_pool_size: 5,
            blue_score: 1,
            red_score: 3,
            blue_health: 1,
            red_health: 3,
        }
    }
}

/// Turret energy generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyTuning {
    pub max_bars: u8,
    /// Sustained-fire calls consumed per bar
    pub shots_per_bar: u32,
    /// Seconds per restored bar
    pub restore_interval: f32,
}

impl Default for EnergyTuning {
    fn default() -> Self {
        Self {
            max_bars: 4,
            shots_per_bar: 3,
            restore_interval: 0.25,
        }
    }
}

/// Turret aiming and firing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurretTuning {
    /// Degrees per second per unit of input axis (scaled by 10)
    pub turn_speed: f32,
    /// Rotation limit either side of vertical, degrees
    pub fov: f32,
    /// Seconds between shots
    pub fire_rate: f32,
    /// Trigger must be held this long before it drains energy
    pub hold_threshold: f32,
    /// Muzzle position
    pub fire_point: Vec2,
    /// Distance from the pivot to the muzzle
    pub barrel_length: f32,
    pub projectile_speed: f32,
    pub projectile_pool_size: usize,
}

impl Default for TurretTuning {
    fn default() -> Self {
        Self {
            turn_speed: 12.5,
            fov: 75.0,
            fire_rate: 0.2,
            hold_threshold: 0.02,
            fire_point: Vec2::new(0.0, -7.75),
            barrel_length: 1.5,
            projectile_speed: 45.0,
            projectile_pool_size: 5,
        }
    }
}

/// Particle pools and camera shake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsTuning {
    pub projectile_lost_pool: usize,
    pub projectile_hit_pool: usize,
    pub player_explode_pool: usize,
    /// Seconds a particle emitter stays busy once played
    pub particle_lifetime: f32,
    pub shake_duration: f32,
    pub shake_intensity: f32,
}

impl Default for EffectsTuning {
    fn default() -> Self {
        Self {
            projectile_lost_pool: 9,
            projectile_hit_pool: 5,
            player_explode_pool: 1,
            particle_lifetime: 1.0,
            shake_duration: 0.5,
            shake_intensity: 0.25,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub spawner: SpawnerTuning,
    pub energy: EnergyTuning,
    pub turret: TurretTuning,
    pub effects: EffectsTuning,
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        let s = &self.spawner;
        if s.spawn_points.is_empty() {
            return Err(SimError::NoSpawnPoints);
        }
        if s.drop_range < 0 {
            return Err(invalid("spawner.drop_range must not be negative"));
        }
        for (name, range) in [
            ("spawner.horizontal_velocity", s.horizontal_velocity),
            ("spawner.vertical_velocity", s.vertical_velocity),
            ("spawner.spawn_interval", s.spawn_interval),
        ] {
            if !(range.min.is_finite() && range.max.is_finite()) || range.min > range.max {
                return Err(invalid(format!("{name} must be a finite range with min <= max")));
            }
        }
        if s.spawn_interval.min <= 0.0 {
            return Err(invalid("spawner.spawn_interval.min must be positive"));
        }
        if s.blue_health == 0 || s.red_health == 0 {
            return Err(invalid("monster health must be at least 1"));
        }

        let e = &self.energy;
        if e.max_bars == 0 {
            return Err(invalid("energy.max_bars must be at least 1"));
        }
        if e.shots_per_bar == 0 {
            return Err(invalid("energy.shots_per_bar must be at least 1"));
        }
        if e.restore_interval <= 0.0 {
            return Err(invalid("energy.restore_interval must be positive"));
        }

        let t = &self.turret;
        if t.fov < 0.0 || t.fire_rate < 0.0 || t.projectile_speed <= 0.0 {
            return Err(invalid("turret fov/fire_rate/projectile_speed out of range"));
        }

        if self.effects.particle_lifetime <= 0.0 || self.effects.shake_duration <= 0.0 {
            return Err(invalid("effect durations must be positive"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> SimError {
    SimError::InvalidTuning(msg.into())
}
