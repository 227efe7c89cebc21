//! Per-entity instance data for the draw pass

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// What an instance depicts
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InstanceKind {
    Player = 0,
    Enemy = 1,
    Projectile = 2,
    Deadline = 3,
}

/// One drawable: a unit box transformed by `model`
///
/// Laid out as a GPU instance buffer row, so a GPU backend can upload
/// `bytemuck::cast_slice(&scene.instances)` as is.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Instance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub kind: u32,
    pub _pad: [u32; 3],
}

impl Instance {
    pub fn new(kind: InstanceKind, model: Mat4, color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
            kind: kind as u32,
            _pad: [0; 3],
        }
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }

    /// World position of the instance origin
    pub fn position(&self) -> Vec3 {
        self.model().w_axis.truncate()
    }

    pub fn kind(&self) -> Option<InstanceKind> {
        match self.kind {
            0 => Some(InstanceKind::Player),
            1 => Some(InstanceKind::Enemy),
            2 => Some(InstanceKind::Projectile),
            3 => Some(InstanceKind::Deadline),
            _ => None,
        }
    }
}

/// Colors for things without a mesh template
pub mod colors {
    pub const DEADLINE: [f32; 4] = [0.933, 0.933, 0.933, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 0.8];
}
