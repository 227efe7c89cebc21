//! Magento Destroyers - a lane shooter against descending enemy formations
//!
//! Core modules:
//! - `sim`: Simulation (player, projectiles, formations, per-tick update)
//! - `game`: Game controller (state machine, frame loop body, notifications)
//! - `renderer`: Presentation adapter (camera, per-frame instance snapshot)
//! - `effects`: Cosmetic passes that read state once per frame
//! - `assets`: Explicit asset registry resolved before the first game
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod delegate;
pub mod effects;
pub mod game;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use delegate::{ControlDelegate, NoopDelegate};
pub use game::{Game, GameOutcome, Phase};
pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Player horizontal bounds (world units)
    pub const PLAYER_MIN_X: f32 = -70.0;
    pub const PLAYER_MAX_X: f32 = 70.0;
    /// Player sits just in front of the deadline
    pub const PLAYER_Z: f32 = 10.0;
    /// Inertia is clamped to [-MAX_INERTIA, MAX_INERTIA]
    pub const MAX_INERTIA: f32 = 3.0;
    /// Inertia lost per tick when no input is applied
    pub const INERTIA_DAMPENING: f32 = 0.2;
    /// Position change per unit of inertia per tick
    pub const PLAYER_SPEED: f32 = 1.0;
    /// Roll (radians) per unit of inertia
    pub const LEAN_FACTOR: f32 = 0.15;

    /// Projectiles spawn slightly below the ship
    pub const PROJECTILE_SPAWN_Y: f32 = -5.0;
    pub const PROJECTILE_START_VELOCITY: f32 = 0.5;
    pub const PROJECTILE_MAX_VELOCITY: f32 = 10.0;
    /// Projectiles are deleted once they travel past -FAR_BOUNDARY on z
    pub const FAR_BOUNDARY: f32 = 500.0;

    /// Formation turns around once its offset passes +-TARGET_MOVEMENT
    pub const TARGET_MOVEMENT: f32 = 25.0;
    /// Hit window around each enemy (local space)
    pub const HIT_TOLERANCE_X: f32 = 10.0;
    pub const HIT_TOLERANCE_Z: f32 = 10.0;
    /// Enemy spin per tick (radians, cosmetic)
    pub const ENEMY_SPIN: f32 = 0.02;
    /// Largest wave grid side (rows or columns)
    pub const MAX_GRID_SIDE: u32 = 32;

    /// Camera
    pub const CAMERA_FOV_DEG: f32 = 60.0;
    pub const CAMERA_FOV_NARROW_DEG: f32 = 90.0;
    /// Viewports narrower than this use the wide field of view
    pub const NARROW_VIEWPORT_PX: f32 = 768.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 500.0;

    /// Device tilt (degrees) is clamped to +-TILT_CLAMP_DEG
    pub const TILT_CLAMP_DEG: f32 = 40.0;
    /// World units covered by the full tilt range
    pub const TILT_RANGE: f32 = 140.0;
    /// Seconds to wait for the tilt permission before starting without it
    pub const TILT_PERMISSION_TIMEOUT: f64 = 2.0;
}
