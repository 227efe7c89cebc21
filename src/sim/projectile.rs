//! A single player bolt

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A projectile travelling away from the player along -z
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec3,
    /// Forward speed (units per tick), grows every tick up to the cap
    pub velocity: f32,
    pub deleted: bool,
}

impl Projectile {
    /// Spawn a bolt at the player's horizontal position
    pub fn new(id: u32, origin: Vec3) -> Self {
        Self {
            id,
            pos: Vec3::new(origin.x, PROJECTILE_SPAWN_Y, origin.z),
            velocity: PROJECTILE_START_VELOCITY,
            deleted: false,
        }
    }

    /// Accelerate and advance one tick. No-op once deleted.
    pub fn update(&mut self) {
        if self.deleted {
            return;
        }

        // v' = v * (1 + v): short, snappy ramp up to the cap
        self.velocity = (self.velocity * (1.0 + self.velocity)).min(PROJECTILE_MAX_VELOCITY);
        self.pos.z -= self.velocity;

        if self.pos.z < -FAR_BOUNDARY {
            self.delete();
        }
    }

    pub fn delete(&mut self) {
        self.deleted = true;
    }
}
