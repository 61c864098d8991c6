//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep supplied by the caller
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or physics engine dependencies; bodies are reached
//!   through [`PhysicsBody`] and collisions arrive as reports

pub mod body;
pub mod energy;
pub mod events;
pub mod game;
pub mod monster;
pub mod particles;
pub mod pool;
pub mod projectile;
pub mod shake;
pub mod spawner;
pub mod turret;

pub use body::{KinematicBody, PhysicsBody};
pub use energy::{EnergyGenerator, EnergyPhase};
pub use events::{Contact, GameEvent, MonsterHandle, ProjectileContact, ProjectileHandle};
pub use game::{Game, GamePhase};
pub use monster::{Health, Monster, MonsterColor, MotionState, SpawnParams};
pub use particles::{Emitter, ParticleKind, ParticlePools};
pub use pool::{Factory, Pool, PoolHandle, Poolable};
pub use projectile::Projectile;
pub use shake::ScreenShake;
pub use spawner::{MonsterSpawner, SpawnState, kinematic_bodies};
pub use turret::{Turret, TurretInput};
