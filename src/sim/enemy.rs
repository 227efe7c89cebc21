//! Enemies and the rigid formations they move in
//!
//! A formation is a grid of enemies sharing one group offset. Members keep
//! their local grid position; only the offset moves (side-to-side
//! oscillation plus a steady creep toward the deadline).

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A single enemy, positioned relative to its formation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Unique within its formation
    pub id: u32,
    /// One hit destroys an enemy regardless of health
    pub health: u32,
    pub local_pos: Vec3,
    /// Edge length of the enemy's bounding cube
    pub size: f32,
    /// Spin about the local Y axis (cosmetic)
    pub rotation: f32,
}

impl Enemy {
    pub fn new(id: u32, local_pos: Vec3, size: f32, health: u32) -> Self {
        Self {
            id,
            health,
            local_pos,
            size,
            rotation: 0.0,
        }
    }

    /// Per-tick local animation
    pub fn update(&mut self) {
        self.rotation = (self.rotation + ENEMY_SPIN) % std::f32::consts::TAU;
    }
}

/// Layout and speeds for a new formation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSpawnOptions {
    pub rows: u32,
    pub cols: u32,
    pub origin: Vec3,
    pub spacing: Vec3,
    pub enemy_size: f32,
    pub enemy_health: u32,
    pub speed_x: f32,
    pub speed_z: f32,
}

/// The plane whose crossing by a formation ends the game
///
/// Points `p` on the plane satisfy `normal.dot(p) + constant == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeadlinePlane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Default for DeadlinePlane {
    /// The z = 0 plane
    fn default() -> Self {
        Self {
            normal: Vec3::Z,
            constant: 0.0,
        }
    }
}

impl DeadlinePlane {
    /// Whether the axis-aligned box [min, max] touches or straddles the plane
    pub fn intersects_box(&self, min: Vec3, max: Vec3) -> bool {
        let mut near = 0.0;
        let mut far = 0.0;
        for axis in 0..3 {
            let n = self.normal[axis];
            if n > 0.0 {
                near += n * min[axis];
                far += n * max[axis];
            } else {
                near += n * max[axis];
                far += n * min[axis];
            }
        }
        near <= -self.constant && far >= -self.constant
    }
}

/// A rigid group of enemies moving and colliding as one unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyFormation {
    pub id: u32,
    /// Group translation applied to every member
    pub offset: Vec3,
    /// Horizontal direction, -1 or +1
    pub direction_x: f32,
    pub speed_x: f32,
    pub speed_z: f32,
    pub members: Vec<Enemy>,
    /// Set once the last member is removed
    pub is_empty: bool,
}

impl EnemyFormation {
    /// Lay out `rows x cols` enemies from `options.origin`
    ///
    /// Neighbouring enemies are `spacing + enemy_size` apart on x and z.
    /// Each side is capped at `MAX_GRID_SIDE`.
    pub fn create_grid(id: u32, options: &GridSpawnOptions, direction_x: f32) -> Self {
        let rows = options.rows.min(MAX_GRID_SIDE);
        let cols = options.cols.min(MAX_GRID_SIDE);
        let mut members = Vec::with_capacity(rows as usize * cols as usize);
        for row in 0..rows {
            for col in 0..cols {
                let local_pos = Vec3::new(
                    options.origin.x + col as f32 * (options.spacing.x + options.enemy_size),
                    options.origin.y + options.spacing.y,
                    options.origin.z + row as f32 * (options.spacing.z + options.enemy_size),
                );
                members.push(Enemy::new(
                    row * cols + col,
                    local_pos,
                    options.enemy_size,
                    options.enemy_health,
                ));
            }
        }

        Self {
            id,
            offset: Vec3::ZERO,
            direction_x: if direction_x < 0.0 { -1.0 } else { 1.0 },
            speed_x: options.speed_x,
            speed_z: options.speed_z,
            is_empty: members.is_empty(),
            members,
        }
    }

    /// One oscillation step plus forward creep. No-op when empty.
    pub fn update(&mut self) {
        if self.is_empty {
            return;
        }

        if self.offset.x > TARGET_MOVEMENT {
            self.direction_x = -1.0;
        }
        if self.offset.x < -TARGET_MOVEMENT {
            self.direction_x = 1.0;
        }
        self.offset.x += self.speed_x * self.direction_x;
        self.offset.z += self.speed_z;

        for enemy in &mut self.members {
            enemy.update();
        }
    }

    /// First member (in grid order) whose hit window contains `pos`
    ///
    /// This is first-match, not nearest-match: when two members are in
    /// range the earlier one in `members` is returned.
    pub fn colliding_member(&self, pos: Vec3) -> Option<&Enemy> {
        let local = pos - self.offset;
        self.members.iter().find(|e| {
            (e.local_pos.z - local.z).abs() <= HIT_TOLERANCE_Z
                && (e.local_pos.x - local.x).abs() <= HIT_TOLERANCE_X
        })
    }

    /// Detach a member by id
    pub fn remove_member(&mut self, id: u32) -> Option<Enemy> {
        let removed = self
            .members
            .iter()
            .position(|e| e.id == id)
            .map(|index| self.members.remove(index));
        self.is_empty = self.members.is_empty();
        removed
    }

    /// World-space bounding box of all members, `None` when empty
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut members = self.members.iter();
        let first = members.next()?;
        let half = Vec3::splat(first.size / 2.0);
        let mut min = first.local_pos - half;
        let mut max = first.local_pos + half;
        for enemy in members {
            let half = Vec3::splat(enemy.size / 2.0);
            min = min.min(enemy.local_pos - half);
            max = max.max(enemy.local_pos + half);
        }
        Some((min + self.offset, max + self.offset))
    }

    /// Whether the formation's bounding box reaches the deadline
    pub fn check_plane_collision(&self, plane: &DeadlinePlane) -> bool {
        self.bounds()
            .map(|(min, max)| plane.intersects_box(min, max))
            .unwrap_or(false)
    }

    /// World position of a member
    pub fn world_pos(&self, enemy: &Enemy) -> Vec3 {
        enemy.local_pos + self.offset
    }
}
