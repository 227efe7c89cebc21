//! Data-driven game balance
//!
//! Difficulty curve, scoring and wave layout. Persisted separately from
//! settings so balance can be tweaked without touching user preferences.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_GRID_SIDE;
use crate::sim::GridSpawnOptions;

/// Wave grid layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub rows: u32,
    pub cols: u32,
    pub origin: Vec3,
    pub spacing: Vec3,
    pub enemy_size: f32,
    pub enemy_health: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 5,
            origin: Vec3::new(-30.0, 0.0, -250.0),
            spacing: Vec3::new(20.0, 0.0, 20.0),
            enemy_size: 5.0,
            enemy_health: 10,
        }
    }
}

impl GridLayout {
    /// Spawn options for a wave moving at the given speeds
    pub fn spawn_options(&self, speed_x: f32, speed_z: f32) -> GridSpawnOptions {
        GridSpawnOptions {
            rows: self.rows,
            cols: self.cols,
            origin: self.origin,
            spacing: self.spacing,
            enemy_size: self.enemy_size,
            enemy_health: self.enemy_health,
            speed_x,
            speed_z,
        }
    }
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === First wave ===
    pub enemy_speed_x: f32,
    pub enemy_speed_z: f32,
    /// Seconds between shots
    pub fire_cooldown: f32,
    pub player_step_size: f32,

    // === Per-wave escalation ===
    pub enemy_speed_x_step: f32,
    pub enemy_speed_z_step: f32,
    pub fire_cooldown_step: f32,
    pub fire_cooldown_floor: f32,
    pub player_step_size_step: f32,
    pub player_step_size_ceiling: f32,

    // === Scoring ===
    pub score_per_kill: u64,

    // === Waves ===
    pub grid: GridLayout,
    /// Campaign length; `None` plays until the deadline is crossed
    pub max_waves: Option<u32>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            enemy_speed_x: 0.3,
            enemy_speed_z: 0.2,
            fire_cooldown: 0.5,
            player_step_size: 0.5,

            enemy_speed_x_step: 0.1,
            enemy_speed_z_step: 0.05,
            fire_cooldown_step: 0.09,
            fire_cooldown_floor: 0.01,
            player_step_size_step: 0.1,
            player_step_size_ceiling: 10.0,

            score_per_kill: 50,

            grid: GridLayout::default(),
            max_waves: None,
        }
    }
}

impl Tuning {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "magento_destroyers_tuning";

    /// Clamp values that would break the difficulty curve
    ///
    /// Escalation steps are made non-negative so speeds never drop and the
    /// cooldown never rises between waves.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let finite_or = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };

        self.enemy_speed_x = finite_or(self.enemy_speed_x, defaults.enemy_speed_x).max(0.0);
        self.enemy_speed_z = finite_or(self.enemy_speed_z, defaults.enemy_speed_z).max(0.0);
        self.enemy_speed_x_step = finite_or(self.enemy_speed_x_step, 0.0).max(0.0);
        self.enemy_speed_z_step = finite_or(self.enemy_speed_z_step, 0.0).max(0.0);

        self.fire_cooldown_floor = finite_or(self.fire_cooldown_floor, defaults.fire_cooldown_floor).max(0.0);
        self.fire_cooldown = finite_or(self.fire_cooldown, defaults.fire_cooldown).max(self.fire_cooldown_floor);
        self.fire_cooldown_step = finite_or(self.fire_cooldown_step, 0.0).max(0.0);

        self.player_step_size_ceiling =
            finite_or(self.player_step_size_ceiling, defaults.player_step_size_ceiling).max(0.0);
        self.player_step_size = finite_or(self.player_step_size, defaults.player_step_size)
            .clamp(0.0, self.player_step_size_ceiling);
        self.player_step_size_step = finite_or(self.player_step_size_step, 0.0).max(0.0);

        self.grid.rows = self.grid.rows.clamp(1, MAX_GRID_SIDE);
        self.grid.cols = self.grid.cols.clamp(1, MAX_GRID_SIDE);
        if !self.grid.origin.is_finite() {
            self.grid.origin = defaults.grid.origin;
        }
        if !self.grid.spacing.is_finite() {
            self.grid.spacing = defaults.grid.spacing;
        }
        self.grid.enemy_size = finite_or(self.grid.enemy_size, defaults.grid.enemy_size).max(0.0);
        if self.max_waves == Some(0) {
            self.max_waves = None;
        }
        self
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning overrides from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring malformed tuning: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{"score_per_kill": 100, "max_waves": 3}"#).unwrap();
        assert_eq!(tuning.score_per_kill, 100);
        assert_eq!(tuning.max_waves, Some(3));
        assert_eq!(tuning.enemy_speed_x, 0.3);
        assert_eq!(tuning.grid.rows, 5);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Tuning::from_json("{not json").is_err());
    }

    #[test]
    fn test_sanitized_clamps_curve() {
        let tuning = Tuning {
            enemy_speed_x_step: -1.0,
            fire_cooldown_step: -0.5,
            fire_cooldown: 0.0,
            player_step_size: 50.0,
            enemy_speed_z: f32::NAN,
            max_waves: Some(0),
            ..Tuning::default()
        }
        .sanitized();

        assert_eq!(tuning.enemy_speed_x_step, 0.0);
        assert_eq!(tuning.fire_cooldown_step, 0.0);
        assert_eq!(tuning.fire_cooldown, tuning.fire_cooldown_floor);
        assert_eq!(tuning.player_step_size, tuning.player_step_size_ceiling);
        assert_eq!(tuning.enemy_speed_z, 0.2);
        assert_eq!(tuning.max_waves, None);
    }

    #[test]
    fn test_sanitized_bounds_grid() {
        let tuning = Tuning::from_json(r#"{"grid":{"rows":70000,"cols":0}}"#).unwrap();
        assert_eq!(tuning.grid.rows, MAX_GRID_SIDE);
        assert_eq!(tuning.grid.cols, 1);

        let mut tuning = Tuning::default();
        tuning.grid.origin = Vec3::new(f32::NAN, 0.0, 0.0);
        tuning.grid.spacing = Vec3::splat(f32::INFINITY);
        let tuning = tuning.sanitized();
        assert_eq!(tuning.grid.origin, GridLayout::default().origin);
        assert_eq!(tuning.grid.spacing, GridLayout::default().spacing);
    }

    #[test]
    fn test_spawn_options_carry_speeds() {
        let opts = GridLayout::default().spawn_options(1.0, 2.0);
        assert_eq!(opts.rows, 5);
        assert_eq!(opts.speed_x, 1.0);
        assert_eq!(opts.speed_z, 2.0);
    }
}
