//! The player's ship

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::projectile::Projectile;
use crate::consts::*;

/// Ship entity: inertia-driven horizontal movement and rate-limited fire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
    /// Signed velocity accumulator, clamped to [-MAX_INERTIA, MAX_INERTIA]
    pub inertia: f32,
    /// Visual roll (radians), derived from inertia
    pub lean: f32,
    /// Whether `shoot` may currently succeed
    pub fire_ready: bool,
    /// Clock time at which `fire_ready` flips back on
    pub ready_at: Option<f64>,
    /// Live projectiles owned by this ship
    pub projectiles: Vec<Projectile>,
    next_projectile_id: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec3::new(0.0, 0.0, PLAYER_Z),
            inertia: 0.0,
            lean: 0.0,
            fire_ready: true,
            ready_at: None,
            projectiles: Vec::new(),
            next_projectile_id: 1,
        }
    }

    /// Push the ship left (-1) or right (+1) by `magnitude`
    pub fn move_by(&mut self, direction: f32, magnitude: f32) {
        if !direction.is_finite() || !magnitude.is_finite() {
            return;
        }
        let step = direction.clamp(-1.0, 1.0) * magnitude;
        self.inertia = (self.inertia + step).clamp(-MAX_INERTIA, MAX_INERTIA);
    }

    /// Place the ship directly (tilt input), clamped to the lane
    pub fn set_x(&mut self, x: f32) {
        if x.is_finite() {
            self.pos.x = x.clamp(PLAYER_MIN_X, PLAYER_MAX_X);
        }
    }

    /// Advance one tick: drift by inertia, lean, then dampen toward zero
    pub fn update(&mut self) {
        self.pos.x = (self.pos.x + self.inertia * PLAYER_SPEED).clamp(PLAYER_MIN_X, PLAYER_MAX_X);
        self.lean = -self.inertia * LEAN_FACTOR;

        self.inertia = if self.inertia > 0.0 {
            (self.inertia - INERTIA_DAMPENING).max(0.0)
        } else {
            (self.inertia + INERTIA_DAMPENING).min(0.0)
        };
    }

    /// Flip `fire_ready` back on once the cooldown has elapsed
    pub fn refresh_cooldown(&mut self, now: f64) {
        if let Some(ready_at) = self.ready_at {
            if now >= ready_at {
                self.fire_ready = true;
                self.ready_at = None;
            }
        }
    }

    /// Fire a projectile if ready. Returns whether one was spawned.
    pub fn shoot(&mut self, now: f64, cooldown: f32) -> bool {
        self.refresh_cooldown(now);
        if !self.fire_ready {
            return false;
        }

        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        self.projectiles.push(Projectile::new(id, self.pos));

        self.fire_ready = false;
        self.ready_at = Some(now + f64::from(cooldown.max(0.0)));
        true
    }

    /// Advance every live projectile and drop the deleted ones
    pub fn update_projectiles(&mut self) {
        for projectile in &mut self.projectiles {
            projectile.update();
        }
        self.projectiles.retain(|p| !p.deleted);
    }

    /// Release all projectiles (level skip / reset)
    pub fn clear_projectiles(&mut self) {
        for projectile in &mut self.projectiles {
            projectile.delete();
        }
        self.projectiles.clear();
    }
}
