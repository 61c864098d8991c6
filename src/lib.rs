//! Monster Invasion - turret versus falling monsters
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pools, spawning, motion FSM, energy)
//! - `tuning`: Data-driven game balance
//! - `error`: Crate error type
//!
//! Physics integration, rendering and input devices live outside this crate.
//! The core consumes a [`sim::PhysicsBody`] per monster and a stream of
//! collision reports, and emits [`sim::GameEvent`]s back out.

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use tuning::Tuning;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Distance to the drop target at which a monster leaves the platform
    pub const DROP_REACH_DISTANCE: f32 = 1.0;
    /// Below this height a dropping monster always has gravity enabled
    pub const GRAVITY_RESTORE_Y: f32 = -5.0;

    /// Spawns between vertical speed bumps (bump fires when the counter exceeds this)
    pub const SPEED_BUMP_SPAWNS: u32 = 9;
    /// Vertical speed increment per bump
    pub const SPEED_BUMP_STEP: f32 = 0.25;
    /// Vertical range minimum stops growing once it reaches this
    pub const VERTICAL_MIN_CEILING: f32 = 5.0;
    /// Vertical range maximum stops growing once it reaches this
    pub const VERTICAL_MAX_CEILING: f32 = 9.0;

    /// Spawns between interval reductions (reduction fires when the counter exceeds this)
    pub const INTERVAL_BUMP_SPAWNS: u32 = 50;
    /// Spawn interval decrement per reduction (seconds)
    pub const INTERVAL_BUMP_STEP: f32 = 0.1;

    /// Red monster threshold drawn at reset, half-open
    pub const INITIAL_RED_THRESHOLD: (u32, u32) = (6, 10);
    /// Red monster threshold drawn after every red spawn, half-open
    pub const RED_THRESHOLD: (u32, u32) = (3, 10);

    /// Where the turret explodes on game over
    pub const PLAYER_EXPLODE_POS: (f32, f32) = (0.0, -7.75);
    /// Delay between player death and the game over screen (seconds)
    pub const GAME_OVER_SCREEN_DELAY: f32 = 1.0;
}

/// Closed float interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform draw in `[min, max]`
    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min >= self.max {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}
