//! Pooled particle emitters
//!
//! One pool per effect kind. An emitter counts as busy while it plays.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pool::{Pool, PoolHandle, Poolable};
use crate::error::SimError;
use crate::tuning::EffectsTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Projectile hit a wall, the platform, or a monster without killing it
    ProjectileLost,
    /// Projectile killed a monster
    ProjectileHit,
    /// Turret destroyed
    PlayerExplode,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 3] = [
        ParticleKind::ProjectileLost,
        ParticleKind::ProjectileHit,
        ParticleKind::PlayerExplode,
    ];

    fn index(self) -> usize {
        match self {
            ParticleKind::ProjectileLost => 0,
            ParticleKind::ProjectileHit => 1,
            ParticleKind::PlayerExplode => 2,
        }
    }
}

/// A single effect instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emitter {
    pub kind: ParticleKind,
    pub pos: Vec2,
    /// Seconds since play started
    pub elapsed: f32,
    pub lifetime: f32,
    playing: bool,
}

impl Emitter {
    pub fn new(kind: ParticleKind, lifetime: f32) -> Self {
        Self {
            kind,
            pos: Vec2::ZERO,
            elapsed: 0.0,
            lifetime,
            playing: false,
        }
    }

    pub fn play(&mut self, pos: Vec2) {
        self.pos = pos;
        self.elapsed = 0.0;
        self.playing = true;
    }

    /// Advance playback; stops once the lifetime runs out
    pub fn step(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= self.lifetime {
            self.release();
        }
    }
}

impl Poolable for Emitter {
    fn is_active(&self) -> bool {
        self.playing
    }

    fn activate(&mut self) {
        self.playing = true;
        self.elapsed = 0.0;
    }

    fn release(&mut self) {
        self.playing = false;
        self.elapsed = 0.0;
        self.pos = Vec2::ZERO;
    }
}

/// All particle pools, indexed by kind
#[derive(Debug)]
pub struct ParticlePools {
    pools: [Pool<ParticleKind, Emitter>; 3],
}

impl ParticlePools {
    pub fn new(tuning: &EffectsTuning) -> Result<Self, SimError> {
        let lifetime = tuning.particle_lifetime;
        let make = move |kind: ParticleKind| {
            Pool::new(kind, move |kind: ParticleKind, _slot: usize| -> Result<Emitter, SimError> {
                Ok(Emitter::new(kind, lifetime))
            })
        };
        let mut pools = ParticleKind::ALL.map(make);
        pools[ParticleKind::ProjectileLost.index()].prewarm(tuning.projectile_lost_pool)?;
        pools[ParticleKind::ProjectileHit.index()].prewarm(tuning.projectile_hit_pool)?;
        pools[ParticleKind::PlayerExplode.index()].prewarm(tuning.player_explode_pool)?;
        Ok(Self { pools })
    }

    /// Play a free emitter of `kind` at `pos`
    pub fn show(&mut self, kind: ParticleKind, pos: Vec2) -> Result<PoolHandle<ParticleKind>, SimError> {
        let pool = self.pool_mut(kind);
        let handle = pool.acquire()?;
        if let Some(emitter) = pool.get_mut(handle) {
            emitter.play(pos);
        }
        Ok(handle)
    }

    pub fn step(&mut self, dt: f32) {
        for pool in &mut self.pools {
            for emitter in pool.iter_mut() {
                emitter.step(dt);
            }
        }
    }

    pub fn stop_all(&mut self) {
        for pool in &mut self.pools {
            pool.release_all();
        }
    }

    pub fn pool(&self, kind: ParticleKind) -> &Pool<ParticleKind, Emitter> {
        &self.pools[kind.index()]
    }

    fn pool_mut(&mut self, kind: ParticleKind) -> &mut Pool<ParticleKind, Emitter> {
        &mut self.pools[kind.index()]
    }

    /// Emitters currently playing, across every kind
    pub fn playing(&self) -> usize {
        self.pools.iter().map(|pool| pool.active_count()).sum()
    }
}
