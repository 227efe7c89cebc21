//! Cosmetic effect passes
//!
//! Effects run once per rendered frame, in order, with read-only access to
//! the game state. They keep their own state and never feed back into the
//! simulation.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::Settings;
use crate::sim::GameState;

/// A per-frame visual pass
pub trait Effect {
    fn name(&self) -> &'static str;

    fn update(&mut self, state: &GameState);

    fn as_any(&self) -> &dyn std::any::Any;
}

/// Starfield flowing toward the camera
#[derive(Debug, Clone)]
pub struct StarsEffect {
    pub stars: Vec<Vec3>,
}

impl StarsEffect {
    /// Depth range covered by the field
    pub const DEPTH: f32 = 1000.0;
    /// Distance between star layers
    pub const LAYER_SPACING: f32 = 20.0;
    /// Stars are scattered over [-SPREAD, SPREAD) on x and y
    pub const SPREAD: f32 = 500.0;

    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let layers = (2.0 * Self::DEPTH / Self::LAYER_SPACING) as usize;
        let stars = (0..layers)
            .map(|i| {
                let x = rng.random_range(-Self::SPREAD..Self::SPREAD);
                let y = rng.random_range(-Self::SPREAD..Self::SPREAD);
                Vec3::new(x, y, -Self::DEPTH + i as f32 * Self::LAYER_SPACING)
            })
            .collect();
        Self { stars }
    }
}

impl Effect for StarsEffect {
    fn name(&self) -> &'static str {
        "stars"
    }

    fn update(&mut self, _state: &GameState) {
        // Later stars move faster, giving a cheap parallax
        for (i, star) in self.stars.iter_mut().enumerate() {
            star.z += i as f32 / 10.0;
            if star.z > Self::DEPTH {
                star.z -= 2.0 * Self::DEPTH;
            }
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Curved-screen scanline post pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrtEffect {
    pub opacity: f32,
    /// Barrel distortion strength
    pub curve: f32,
    /// Scan line frequency across the screen
    pub scan_lines: f32,
    /// Scan line phase, drifts slowly while the game runs
    pub phase: f32,
}

impl Default for CrtEffect {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            curve: 2.25,
            scan_lines: 640.0,
            phase: 0.0,
        }
    }
}

impl CrtEffect {
    /// Brightness offset of the scan line at normalized screen y
    pub fn scanline_offset(&self, y: f32) -> f32 {
        (y * self.scan_lines + self.phase).sin() * 0.04
    }
}

impl Effect for CrtEffect {
    fn name(&self) -> &'static str {
        "crt"
    }

    fn update(&mut self, state: &GameState) {
        self.phase = (state.time_ticks as f32 * 0.05) % std::f32::consts::TAU;
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Glow pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomEffect {
    pub strength: f32,
    pub radius: f32,
    /// Luminance above which pixels glow
    pub threshold: f32,
}

impl Default for BloomEffect {
    fn default() -> Self {
        Self {
            strength: 1.0,
            radius: 0.0,
            threshold: 0.0,
        }
    }
}

impl Effect for BloomEffect {
    fn name(&self) -> &'static str {
        "bloom"
    }

    fn update(&mut self, _state: &GameState) {}

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Ordered list of effects
#[derive(Default)]
pub struct EffectsPipeline {
    effects: Vec<Box<dyn Effect>>,
}

impl EffectsPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the passes enabled in `settings`
    pub fn from_settings(settings: &Settings, seed: u64) -> Self {
        let mut pipeline = Self::new();
        if settings.starfield && !settings.reduced_motion {
            pipeline.push(Box::new(StarsEffect::new(seed)));
        }
        if settings.bloom {
            pipeline.push(Box::new(BloomEffect::default()));
        }
        if settings.crt {
            pipeline.push(Box::new(CrtEffect::default()));
        }
        pipeline
    }

    pub fn push(&mut self, effect: Box<dyn Effect>) {
        self.effects.push(effect);
    }

    /// Run every pass once, in insertion order
    pub fn update(&mut self, state: &GameState) {
        for effect in &mut self.effects {
            effect.update(state);
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.effects.iter().map(|e| e.name()).collect()
    }

    /// First pass of type `T`
    pub fn get<T: Effect + 'static>(&self) -> Option<&T> {
        self.effects
            .iter()
            .find_map(|e| e.as_any().downcast_ref::<T>())
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
