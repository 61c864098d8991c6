//! Physics body capability
//!
//! The physics engine owns integration and collision detection. A monster
//! only steers its body through this trait.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What the motion state machine needs from a rigid body
pub trait PhysicsBody {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, pos: Vec2);
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, vel: Vec2);
    /// Enabling gravity also makes the body dynamic; disabling makes it kinematic
    fn set_gravity_enabled(&mut self, enabled: bool);
    fn gravity_enabled(&self) -> bool;
}

/// Plain-data body for headless runs and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub gravity: bool,
}

impl KinematicBody {
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }

    /// Explicit Euler step; stands in for the external engine in headless runs
    pub fn integrate(&mut self, dt: f32, gravity_accel: f32) {
        if self.gravity {
            self.vel.y -= gravity_accel * dt;
        }
        self.pos += self.vel * dt;
    }
}

impl PhysicsBody for KinematicBody {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    fn velocity(&self) -> Vec2 {
        self.vel
    }

    fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity = enabled;
    }

    fn gravity_enabled(&self) -> bool {
        self.gravity
    }
}
