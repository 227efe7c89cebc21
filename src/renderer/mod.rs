//! Presentation adapter
//!
//! Turns the game state into a flat list of instances once per frame.
//! Drawing is left to the host (2D canvas on the web).

pub mod camera;
pub mod instance;
pub mod scene;

pub use camera::Camera;
pub use instance::{Instance, InstanceKind};
pub use scene::{Scene, Sprite};
