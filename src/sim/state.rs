//! Game state and core simulation types
//!
//! One `GameState` is live per game. Starting a new game builds a fresh
//! one; nothing (projectiles, formations, difficulty) carries over.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{DeadlinePlane, EnemyFormation};
use super::player::Player;
use crate::tuning::Tuning;

/// Difficulty knobs, escalated after each wave spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub enemy_speed_x: f32,
    pub enemy_speed_z: f32,
    /// Seconds between player shots
    pub fire_cooldown: f32,
    pub player_step_size: f32,
}

impl Difficulty {
    /// First-wave difficulty
    pub fn initial(tuning: &Tuning) -> Self {
        Self {
            enemy_speed_x: tuning.enemy_speed_x,
            enemy_speed_z: tuning.enemy_speed_z,
            fire_cooldown: tuning.fire_cooldown,
            player_step_size: tuning.player_step_size,
        }
    }

    /// Step up after a wave: faster enemies, faster fire, bigger steps
    pub fn escalate(&mut self, tuning: &Tuning) {
        self.enemy_speed_x += tuning.enemy_speed_x_step;
        self.enemy_speed_z += tuning.enemy_speed_z_step;
        self.fire_cooldown =
            (self.fire_cooldown - tuning.fire_cooldown_step).max(tuning.fire_cooldown_floor);
        self.player_step_size =
            (self.player_step_size + tuning.player_step_size_step).min(tuning.player_step_size_ceiling);
    }
}

/// Notifications produced by the simulation, dispatched by the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u64, old_score: u64 },
    EnemyKilled { formation_id: u32, enemy_id: u32 },
    WaveSpawned { wave: u32 },
    GameOver { score: u64, reason: String },
    Complete { score: u64 },
}

/// Complete state of one game
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed
    pub seed: u64,
    pub score: u64,
    pub player: Player,
    /// Active formations in spawn order
    pub formations: Vec<EnemyFormation>,
    pub deadline: DeadlinePlane,
    pub difficulty: Difficulty,
    /// Number of waves spawned so far
    pub wave_index: u32,
    /// Number of waves fully cleared
    pub waves_cleared: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and balance
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            score: 0,
            player: Player::new(),
            formations: Vec::new(),
            deadline: DeadlinePlane::default(),
            difficulty: Difficulty::initial(&tuning),
            wave_index: 0,
            waves_cleared: 0,
            time_ticks: 0,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Total enemies still alive across all formations
    pub fn enemies_remaining(&self) -> usize {
        self.formations.iter().map(|f| f.members.len()).sum()
    }
}
