//! Turret projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pool::Poolable;

/// A pooled laser bolt. The physics engine moves it; the core only fires
/// and recycles it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Unit vector the bolt travels along
    pub heading: Vec2,
    pub speed: f32,
    active: bool,
}

impl Projectile {
    pub fn new(speed: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            heading: Vec2::Y,
            speed,
            active: false,
        }
    }

    /// Launch from `origin` along `heading`
    pub fn fire(&mut self, origin: Vec2, heading: Vec2) {
        self.pos = origin;
        self.heading = heading.normalize_or(Vec2::Y);
        self.vel = self.heading * self.speed;
    }

    /// Where the bolt visibly ends (one unit ahead of its position)
    pub fn tip(&self) -> Vec2 {
        self.pos + self.heading
    }
}

impl Poolable for Projectile {
    fn is_active(&self) -> bool {
        self.active
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn release(&mut self) {
        self.active = false;
        self.vel = Vec2::ZERO;
        self.pos = Vec2::ZERO;
    }
}
