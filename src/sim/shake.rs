//! Camera shake as a ticked process
//!
//! Started on player death; every step yields a random offset whose
//! amplitude fades out over the last quarter of the duration.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::EffectsTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenShake {
    pub duration: f32,
    pub intensity: f32,
    elapsed: f32,
    active: bool,
    offset: Vec2,
}

impl ScreenShake {
    pub fn new(tuning: &EffectsTuning) -> Self {
        Self {
            duration: tuning.shake_duration,
            intensity: tuning.shake_intensity,
            elapsed: 0.0,
            active: false,
            offset: Vec2::ZERO,
        }
    }

    /// Start (or restart) the shake from the rest position
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.offset = Vec2::ZERO;
        self.active = true;
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.offset = Vec2::ZERO;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current camera offset from its rest position
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn step<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> Vec2 {
        if !self.active {
            return Vec2::ZERO;
        }
        if self.elapsed >= self.duration {
            self.cancel();
            return Vec2::ZERO;
        }

        self.elapsed += dt;
        let progress = self.elapsed / self.duration;
        let damping = damping(progress);

        let x = rng.random::<f32>() * 2.0 - 1.0;
        let y = rng.random::<f32>() * 2.0 - 1.0;
        self.offset = Vec2::new(x, y) * self.intensity * damping;
        self.offset
    }
}

/// Full strength until 75% progress, then linear fade to zero
fn damping(progress: f32) -> f32 {
    1.0 - (4.0 * progress - 3.0).clamp(0.0, 1.0)
}
