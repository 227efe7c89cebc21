//! Per-tick simulation update
//!
//! One call advances the game by one displayed frame. The order of the
//! steps below is part of the game's behaviour: collision results (and so
//! scores) depend on it.

use rand::Rng;

use super::enemy::EnemyFormation;
use super::state::{GameEvent, GameState};

/// Reason reported when a formation reaches the deadline
pub const GAME_OVER_REASON: &str = "The formation crossed the deadline";

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Net held direction: -1 left, +1 right, 0 none
    pub move_dir: f32,
    /// Fire (held key or touch)
    pub shoot: bool,
    /// Absolute ship X from a fresh tilt reading. Ignored while a discrete
    /// move is held.
    pub tilt_x: Option<f32>,
    /// Clock time for cooldown bookkeeping (seconds)
    pub now: f64,
}

/// What the tick did to the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    GameOver,
    Complete,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) -> TickOutcome {
    state.time_ticks += 1;

    // 1. Player: pending input first, then movement
    if input.move_dir != 0.0 {
        state
            .player
            .move_by(input.move_dir, state.difficulty.player_step_size);
    } else if let Some(x) = input.tilt_x {
        state.player.set_x(x);
    }
    state.player.refresh_cooldown(input.now);
    if input.shoot {
        state.player.shoot(input.now, state.difficulty.fire_cooldown);
    }
    state.player.update();

    // 2. Projectiles
    state.player.update_projectiles();

    // 3. Empty formations never take part in collision checks
    state.formations.retain(|f| !f.is_empty);

    // 4. Advance formations and resolve hits. A deleted projectile is
    // skipped by later formations, so each bolt scores at most once.
    let score_per_kill = state.tuning.score_per_kill;
    for formation in &mut state.formations {
        formation.update();

        for projectile in &mut state.player.projectiles {
            if projectile.deleted {
                continue;
            }
            let Some(enemy_id) = formation.colliding_member(projectile.pos).map(|e| e.id) else {
                continue;
            };

            formation.remove_member(enemy_id);
            projectile.delete();

            let old_score = state.score;
            state.score += score_per_kill;
            events.push(GameEvent::EnemyKilled {
                formation_id: formation.id,
                enemy_id,
            });
            events.push(GameEvent::ScoreChanged {
                score: state.score,
                old_score,
            });
        }
    }
    state.player.projectiles.retain(|p| !p.deleted);

    // 5. Deadline
    let deadline = state.deadline;
    if let Some(formation) = state
        .formations
        .iter()
        .find(|f| f.check_plane_collision(&deadline))
    {
        log::info!(
            "Formation {} crossed the deadline at wave {} (score {})",
            formation.id,
            state.wave_index,
            state.score
        );
        events.push(GameEvent::GameOver {
            score: state.score,
            reason: GAME_OVER_REASON.to_string(),
        });
        return TickOutcome::GameOver;
    }

    // 6. Next wave
    state.formations.retain(|f| !f.is_empty);
    if state.formations.is_empty() {
        if state.wave_index > 0 {
            state.waves_cleared += 1;
        }
        if let Some(max_waves) = state.tuning.max_waves {
            if state.waves_cleared >= max_waves {
                log::info!("All {} waves cleared (score {})", max_waves, state.score);
                events.push(GameEvent::Complete { score: state.score });
                return TickOutcome::Complete;
            }
        }
        spawn_next_wave(state, events);
    }

    TickOutcome::Running
}

/// Spawn a formation at the grid origin and escalate difficulty
pub fn spawn_next_wave(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let options = state
        .tuning
        .grid
        .spawn_options(state.difficulty.enemy_speed_x, state.difficulty.enemy_speed_z);
    let direction = if state.rng.random_bool(0.5) { -1.0 } else { 1.0 };
    let id = state.next_entity_id();
    state
        .formations
        .push(EnemyFormation::create_grid(id, &options, direction));

    state.wave_index += 1;
    state.difficulty.escalate(&state.tuning);

    log::info!("Wave {} spawned", state.wave_index);
    log::debug!("Difficulty after wave {}: {:?}", state.wave_index, state.difficulty);
    events.push(GameEvent::WaveSpawned {
        wave: state.wave_index,
    });
}

/// Debug level skip: drop every formation and live projectile
///
/// The next tick finds no formations and spawns the following wave.
pub fn skip_wave(state: &mut GameState) {
    state.formations.clear();
    state.player.clear_projectiles();
    log::info!("Skipping wave {}", state.wave_index);
}
