//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - Time comes from an injected `Clock`
//! - Randomness comes from the seeded RNG in `GameState`
//! - Input arrives as abstract actions, never raw device events

pub mod clock;
pub mod enemy;
pub mod input;
pub mod player;
pub mod projectile;
pub mod state;
pub mod tick;

pub use clock::{Clock, ManualClock, SystemClock};
pub use enemy::{DeadlinePlane, Enemy, EnemyFormation, GridSpawnOptions};
pub use input::{Action, InputHandler, Key, KeyBindings, TiltPermission};
pub use player::Player;
pub use projectile::Projectile;
pub use state::{Difficulty, GameEvent, GameState};
pub use tick::{GAME_OVER_REASON, TickInput, TickOutcome, skip_wave, spawn_next_wave, tick};
