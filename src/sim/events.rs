//! Collision reports coming in and signals going out

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::monster::MonsterColor;
use super::particles::ParticleKind;
use super::pool::PoolHandle;

pub type MonsterHandle = PoolHandle<MonsterColor>;
pub type ProjectileHandle = PoolHandle<()>;

/// Collision reported by the physics engine for a monster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    LandedOnPlatform,
    LandedOnFloor,
    HitPlayer,
    HitBoundary,
}

/// Collision reported by the physics engine for a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileContact {
    /// Struck a monster; the monster takes one hit
    Monster(MonsterHandle),
    Boundary,
    Platform,
}

/// Signals emitted by the core for the surrounding application
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    MonsterSpawned {
        handle: MonsterHandle,
        position: Vec2,
    },
    MonsterDeactivated(MonsterHandle),
    Score {
        points: u32,
    },
    PlayerKilled,
    ParticleRequested {
        kind: ParticleKind,
        position: Vec2,
    },
    ProjectileFired(ProjectileHandle),
    ProjectileLost(ProjectileHandle),
    EnergyChanged {
        bars: u8,
    },
    GameOver {
        final_score: u64,
    },
    /// Game over screen is due (delayed after the player dies)
    GameOverScreen,
}
