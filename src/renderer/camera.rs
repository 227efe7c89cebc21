//! Perspective camera derived from the viewport
//!
//! Recomputed on every resize. Resizing never touches simulation state.

use glam::{Mat4, Vec2, Vec3};

use crate::consts::*;

/// Fixed camera pose: above and behind the player, pitched down
pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 130.0, 80.0);
pub const CAMERA_PITCH: f32 = -0.75;

/// Viewport and projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
    pub fov_deg: f32,
    view_proj: Mat4,
}

impl Camera {
    /// Build for a viewport in CSS pixels. Degenerate sizes clamp to 1.
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() && v >= 1.0 { v } else { 1.0 };
        let width = sanitize(width);
        let height = sanitize(height);
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };

        let fov_deg = if width < NARROW_VIEWPORT_PX {
            CAMERA_FOV_NARROW_DEG
        } else {
            CAMERA_FOV_DEG
        };

        let world_from_camera =
            Mat4::from_translation(CAMERA_POSITION) * Mat4::from_rotation_x(CAMERA_PITCH);
        let view = world_from_camera.inverse();
        let proj =
            Mat4::perspective_rh_gl(fov_deg.to_radians(), width / height, CAMERA_NEAR, CAMERA_FAR);

        Self {
            width,
            height,
            pixel_ratio,
            fov_deg,
            view_proj: proj * view,
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        self.view_proj
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Backing-store size in device pixels
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round() as u32,
            (self.height * self.pixel_ratio).round() as u32,
        )
    }

    /// Project a world point to viewport pixels (origin top-left)
    ///
    /// Returns `None` for points behind the camera or outside the depth range.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_proj * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fov_switches_on_narrow_viewports() {
        assert_eq!(Camera::new(1024.0, 768.0, 1.0).fov_deg, CAMERA_FOV_DEG);
        assert_eq!(Camera::new(500.0, 800.0, 1.0).fov_deg, CAMERA_FOV_NARROW_DEG);
    }

    #[test]
    fn test_degenerate_sizes_clamp() {
        let camera = Camera::new(0.0, -5.0, f32::NAN);
        assert_eq!(camera.width, 1.0);
        assert_eq!(camera.height, 1.0);
        assert_eq!(camera.pixel_ratio, 1.0);
        assert!(camera.view_proj().is_finite());
    }

    #[test]
    fn test_physical_size() {
        let camera = Camera::new(800.0, 600.0, 2.0);
        assert_eq!(camera.physical_size(), (1600, 1200));
    }

    #[test]
    fn test_projects_field_into_view() {
        let camera = Camera::new(1024.0, 768.0, 1.0);

        // Centre of the enemy field: horizontally centred, upper half
        let p = camera.project(Vec3::new(0.0, 0.0, -100.0)).unwrap();
        assert!((p.x - 512.0).abs() < 0.5);
        assert!(p.y > 0.0 && p.y < 384.0);

        // The deadline is nearer the bottom than the field
        let d = camera.project(Vec3::ZERO).unwrap();
        assert!(d.y > p.y && d.y < 768.0);

        // Behind the camera
        assert!(camera.project(Vec3::new(0.0, 130.0, 200.0)).is_none());
    }
}
