//! Game controller
//!
//! Owns the one live `GameState` and drives it from the host's frame loop.
//! The host calls `frame()` once per display refresh and forwards device
//! events into the `InputHandler`; everything the host needs to show comes
//! back through the `ControlDelegate` and `scene()`.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::assets::{AssetError, AssetRegistry};
use crate::delegate::{ControlDelegate, NoopDelegate};
use crate::effects::EffectsPipeline;
use crate::renderer::{Camera, Scene};
use crate::settings::Settings;
use crate::sim::{
    Action, Clock, GameEvent, GameState, InputHandler, TickInput, skip_wave, tick,
};
use crate::tuning::Tuning;

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Assets not loaded yet; input is ignored
    Uninitialized,
    /// Waiting for a start signal
    Ready,
    Running,
    Paused,
    /// Simulation halted; a restart goes back through `Ready`
    GameOver,
}

/// How a finished run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// A formation crossed the deadline
    Defeated,
    /// Every wave of a finite campaign was cleared
    Complete,
}

pub struct Game {
    phase: Phase,
    outcome: Option<GameOutcome>,
    clock: Box<dyn Clock>,
    delegate: Box<dyn ControlDelegate>,
    assets: Option<AssetRegistry>,
    state: Option<GameState>,
    input: InputHandler,
    effects: EffectsPipeline,
    camera: Camera,
    settings: Settings,
    tuning: Tuning,
    seed: u64,
    games_started: u64,
    /// Start requested while the tilt permission was still pending
    pending_start: bool,
    /// Cleared by `dispose`; the frame loop stops rescheduling itself
    alive: bool,
    /// Make the next tick panic
    #[cfg(test)]
    fail_next_tick: bool,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("phase", &self.phase)
            .field("outcome", &self.outcome)
            .field("score", &self.score())
            .field("games_started", &self.games_started)
            .field("pending_start", &self.pending_start)
            .field("alive", &self.alive)
            .finish()
    }
}

impl Game {
    pub fn new(seed: u64, settings: Settings, tuning: Tuning, clock: Box<dyn Clock>) -> Self {
        let mut input = InputHandler::default();
        input.set_tilt_enabled(settings.tilt_input);

        Self {
            phase: Phase::Uninitialized,
            outcome: None,
            clock,
            delegate: Box::new(NoopDelegate),
            assets: None,
            state: None,
            input,
            effects: EffectsPipeline::from_settings(&settings, seed),
            camera: Camera::new(1.0, 1.0, 1.0),
            settings,
            tuning: tuning.sanitized(),
            seed,
            games_started: 0,
            pending_start: false,
            alive: true,
            #[cfg(test)]
            fail_next_tick: false,
        }
    }

    /// Rebind the notification target
    pub fn set_delegate(&mut self, delegate: Box<dyn ControlDelegate>) {
        self.delegate = delegate;
    }

    /// Finish the asset load phase
    ///
    /// On failure the game stays `Uninitialized` and can never start.
    pub fn assets_loaded(&mut self, result: Result<AssetRegistry, AssetError>) {
        if self.phase != Phase::Uninitialized {
            log::warn!("Assets already loaded, ignoring");
            return;
        }
        match result {
            Ok(assets) => {
                self.assets = Some(assets);
                self.phase = Phase::Ready;
                log::info!("Game ready");
            }
            Err(e) => {
                log::error!("Failed to load assets: {}", e);
            }
        }
    }

    /// Ask for the tilt sensor. The host resolves it through `input_mut()`.
    pub fn request_tilt(&mut self) {
        if self.settings.tilt_input {
            let now = self.clock.now();
            self.input.request_tilt(now);
        }
    }

    /// Begin a new game, discarding any previous one
    ///
    /// If the tilt permission is still pending, the start is deferred to
    /// the first frame where it has settled (or timed out).
    pub fn on_start_game(&mut self) {
        if !self.alive {
            return;
        }
        if self.phase == Phase::Uninitialized {
            log::warn!("Start requested before assets were loaded");
            return;
        }

        if self.phase == Phase::GameOver {
            self.phase = Phase::Ready;
            log::debug!("Back to ready");
        }

        let now = self.clock.now();
        if !self.input.tilt_settled(now) {
            log::info!("Waiting for tilt permission before starting");
            self.pending_start = true;
            return;
        }
        self.start_now();
    }

    fn start_now(&mut self) {
        self.pending_start = false;
        self.input.reset();

        let seed = self.seed.wrapping_add(self.games_started);
        self.games_started += 1;
        self.state = Some(GameState::new(seed, self.tuning.clone()));
        self.outcome = None;
        self.phase = Phase::Running;

        log::info!("Game {} started (seed {})", self.games_started, seed);
        self.delegate.on_start_game();
    }

    /// Freeze the simulation. Returns false if not running.
    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.phase = Phase::Paused;
        log::info!("Paused");
        self.delegate.on_paused();
        true
    }

    /// Unfreeze the simulation. Returns false if not paused.
    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.phase = Phase::Running;
        log::info!("Resumed");
        self.delegate.on_resumed();
        true
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => {
                self.pause();
            }
            Phase::Paused => {
                self.resume();
            }
            _ => {}
        }
    }

    /// Run one frame. Returns whether the host should schedule another.
    pub fn frame(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        let now = self.clock.now();

        if self.pending_start && self.input.tilt_settled(now) {
            self.start_now();
        }

        let mut tap_shoot = false;
        for action in self.input.take_triggered() {
            match action {
                Action::TogglePause => self.toggle_pause(),
                Action::SkipWave => {
                    if self.phase == Phase::Running {
                        if let Some(state) = self.state.as_mut() {
                            skip_wave(state);
                        }
                    }
                }
                Action::Shoot => tap_shoot = true,
                Action::MoveLeft | Action::MoveRight => {}
            }
        }

        if self.phase == Phase::Running {
            self.step(now, tap_shoot);
        }

        if let Some(state) = self.state.as_ref() {
            self.effects.update(state);
        }

        self.alive
    }

    /// Run one simulation tick and forward its events
    ///
    /// A panicking tick is logged and skipped so the next frame still runs.
    /// This only holds where panics unwind; wasm32 builds abort on panic, so
    /// the tick itself must not panic on any state reachable from sanitized
    /// tuning.
    fn step(&mut self, now: f64, tap_shoot: bool) {
        #[cfg(test)]
        let fail = std::mem::take(&mut self.fail_next_tick);
        #[cfg(not(test))]
        let fail = false;

        let Some(state) = self.state.as_mut() else {
            return;
        };

        let input = TickInput {
            move_dir: self.input.move_direction(),
            shoot: tap_shoot || self.input.is_held(Action::Shoot),
            tilt_x: self.input.take_tilt(),
            now,
        };

        let mut events = Vec::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            if fail {
                panic!("injected tick failure");
            }
            tick(state, &input, &mut events)
        }));
        if result.is_err() {
            log::warn!("Tick {} panicked, skipping frame", state.time_ticks);
        }

        // The outcome is carried by the GameOver/Complete events
        for event in &events {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ScoreChanged { score, old_score } => {
                self.delegate.on_score_changed(*score, *old_score);
            }
            GameEvent::GameOver { score, reason } => {
                if self.phase == Phase::GameOver {
                    return;
                }
                self.finish(GameOutcome::Defeated);
                log::info!("Game over: {} (score {})", reason, score);
                self.delegate.on_game_over(*score, reason);
            }
            GameEvent::Complete { score } => {
                if self.phase == Phase::GameOver {
                    return;
                }
                self.finish(GameOutcome::Complete);
                log::info!("Campaign complete (score {})", score);
                self.delegate.on_complete();
            }
            GameEvent::EnemyKilled {
                formation_id,
                enemy_id,
            } => {
                log::debug!("Enemy {} of formation {} destroyed", enemy_id, formation_id);
            }
            GameEvent::WaveSpawned { .. } => {}
        }
    }

    fn finish(&mut self, outcome: GameOutcome) {
        self.phase = Phase::GameOver;
        self.outcome = Some(outcome);
    }

    /// Viewport changed. Only the projection is recomputed.
    pub fn update_size(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        let camera = Camera::new(width, height, pixel_ratio);
        if camera.width != width || camera.height != height {
            log::warn!(
                "Clamped viewport {}x{} to {}x{}",
                width,
                height,
                camera.width,
                camera.height
            );
        }
        self.camera = camera;
    }

    /// Swap in new settings (effects are rebuilt, tilt toggled)
    pub fn apply_settings(&mut self, settings: Settings) {
        self.input.set_tilt_enabled(settings.tilt_input);
        self.effects = EffectsPipeline::from_settings(&settings, self.seed);
        self.settings = settings;
    }

    /// Tear down: unregister listeners and stop the frame loop. Idempotent.
    pub fn dispose(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.pending_start = false;
        self.input.destroy();
        self.state = None;
        log::info!("Game disposed");
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_start_pending(&self) -> bool {
        self.pending_start
    }

    pub fn score(&self) -> u64 {
        self.state.as_ref().map(|s| s.score).unwrap_or(0)
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    pub fn input(&self) -> &InputHandler {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    pub fn effects(&self) -> &EffectsPipeline {
        &self.effects
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Snapshot for drawing, once assets are loaded and a game exists
    pub fn scene(&self) -> Option<Scene> {
        let assets = self.assets.as_ref()?;
        let state = self.state.as_ref()?;
        Some(Scene::capture(state, assets, &self.effects))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::assets::BuiltinAssets;
    use crate::sim::{Key, ManualClock, TiltPermission};

    #[derive(Debug, Default)]
    struct Calls {
        scores: Vec<(u64, u64)>,
        started: u32,
        game_over: Vec<(u64, String)>,
        paused: u32,
        resumed: u32,
        complete: u32,
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Calls>>);

    impl ControlDelegate for Recorder {
        fn on_score_changed(&mut self, score: u64, old_score: u64) {
            self.0.borrow_mut().scores.push((score, old_score));
        }
        fn on_start_game(&mut self) {
            self.0.borrow_mut().started += 1;
        }
        fn on_game_over(&mut self, score: u64, reason: &str) {
            self.0.borrow_mut().game_over.push((score, reason.to_string()));
        }
        fn on_paused(&mut self) {
            self.0.borrow_mut().paused += 1;
        }
        fn on_resumed(&mut self) {
            self.0.borrow_mut().resumed += 1;
        }
        fn on_complete(&mut self) {
            self.0.borrow_mut().complete += 1;
        }
    }

    fn settings() -> Settings {
        Settings {
            tilt_input: false,
            ..Settings::default()
        }
    }

    fn ready_game(tuning: Tuning) -> (Game, ManualClock, Rc<RefCell<Calls>>) {
        let clock = ManualClock::new();
        let recorder = Recorder::default();
        let calls = recorder.0.clone();
        let mut game = Game::new(11, settings(), tuning, Box::new(clock.clone()));
        game.set_delegate(Box::new(recorder));
        game.assets_loaded(AssetRegistry::load(&BuiltinAssets));
        (game, clock, calls)
    }

    fn press(game: &mut Game, key: Key) {
        game.input_mut().set_held(key, true);
        game.input_mut().set_held(key, false);
    }

    #[test]
    fn test_start_enters_running() {
        let (mut game, _clock, calls) = ready_game(Tuning::default());
        assert_eq!(game.phase(), Phase::Ready);
        assert!(game.state().is_none());

        game.on_start_game();
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(calls.borrow().started, 1);

        assert!(game.frame());
        let state = game.state().unwrap();
        assert_eq!(state.wave_index, 1);
        assert_eq!(state.enemies_remaining(), 25);
    }

    #[test]
    fn test_asset_failure_never_starts() {
        let clock = ManualClock::new();
        let recorder = Recorder::default();
        let calls = recorder.0.clone();
        let mut game = Game::new(1, settings(), Tuning::default(), Box::new(clock));
        game.set_delegate(Box::new(recorder));

        game.assets_loaded(Err(AssetError::NotFound("enemy".to_string())));
        assert_eq!(game.phase(), Phase::Uninitialized);

        game.on_start_game();
        game.frame();
        assert_eq!(game.phase(), Phase::Uninitialized);
        assert_eq!(calls.borrow().started, 0);
        assert!(game.state().is_none());
        assert!(game.scene().is_none());
    }

    #[test]
    fn test_shoot_respects_cooldown() {
        let (mut game, clock, _calls) = ready_game(Tuning::default());
        game.on_start_game();
        game.input_mut().set_held(Key::Space, true);

        game.frame();
        assert_eq!(game.state().unwrap().player.projectiles.len(), 1);

        // Still cooling down
        clock.advance(0.25);
        game.frame();
        assert_eq!(game.state().unwrap().player.projectiles.len(), 1);

        // First shot used the 0.5 s starting cooldown
        clock.advance(0.25);
        game.frame();
        assert_eq!(game.state().unwrap().player.projectiles.len(), 2);
    }

    #[test]
    fn test_touch_shoots_once() {
        let (mut game, _clock, _calls) = ready_game(Tuning::default());
        game.on_start_game();
        game.input_mut().trigger_once(Key::Touch);

        game.frame();
        assert_eq!(game.state().unwrap().player.projectiles.len(), 1);
        assert!(!game.state().unwrap().player.fire_ready);
    }

    #[test]
    fn test_skip_wave_spawns_next() {
        let (mut game, _clock, _calls) = ready_game(Tuning::default());
        game.on_start_game();
        game.frame();
        let first_id = game.state().unwrap().formations[0].id;

        press(&mut game, Key::KeyL);
        game.frame();

        let state = game.state().unwrap();
        assert_eq!(state.wave_index, 2);
        assert_eq!(state.formations.len(), 1);
        assert_ne!(state.formations[0].id, first_id);
    }

    #[test]
    fn test_game_over_reported_once() {
        let (mut game, _clock, calls) = ready_game(Tuning::default());
        game.on_start_game();
        game.frame();

        // Push the formation across the deadline
        game.state_mut().unwrap().formations[0].offset.z = 200.0;
        for _ in 0..5 {
            game.frame();
        }

        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.outcome(), Some(GameOutcome::Defeated));
        let calls = calls.borrow();
        assert_eq!(calls.game_over.len(), 1);
        assert_eq!(calls.game_over[0].0, 0);
        assert_eq!(calls.game_over[0].1, crate::sim::GAME_OVER_REASON);
    }

    #[test]
    fn test_game_over_halts_simulation() {
        let (mut game, _clock, _calls) = ready_game(Tuning::default());
        game.on_start_game();
        game.frame();
        game.state_mut().unwrap().formations[0].offset.z = 200.0;
        game.frame();

        let ticks = game.state().unwrap().time_ticks;
        game.frame();
        game.frame();
        assert_eq!(game.state().unwrap().time_ticks, ticks);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let (mut game, _clock, calls) = ready_game(Tuning::default());
        game.on_start_game();
        game.frame();

        assert!(game.pause());
        assert!(!game.pause());
        assert_eq!(calls.borrow().paused, 1);

        let ticks = game.state().unwrap().time_ticks;
        game.frame();
        assert_eq!(game.state().unwrap().time_ticks, ticks);

        assert!(game.resume());
        assert!(!game.resume());
        assert_eq!(calls.borrow().resumed, 1);

        game.frame();
        assert_eq!(game.state().unwrap().time_ticks, ticks + 1);
    }

    #[test]
    fn test_escape_toggles_pause() {
        let (mut game, _clock, calls) = ready_game(Tuning::default());
        game.on_start_game();

        press(&mut game, Key::Escape);
        game.frame();
        assert_eq!(game.phase(), Phase::Paused);

        press(&mut game, Key::Escape);
        game.frame();
        assert_eq!(game.phase(), Phase::Running);

        let calls = calls.borrow();
        assert_eq!((calls.paused, calls.resumed), (1, 1));
    }

    #[test]
    fn test_pause_outside_running_is_ignored() {
        let (mut game, _clock, calls) = ready_game(Tuning::default());
        assert!(!game.pause());
        assert!(!game.resume());
        assert_eq!(calls.borrow().paused, 0);
    }

    #[test]
    fn test_campaign_completes_once() {
        let tuning = Tuning {
            max_waves: Some(1),
            ..Tuning::default()
        };
        let (mut game, _clock, calls) = ready_game(tuning);
        game.on_start_game();
        game.frame();

        press(&mut game, Key::KeyL);
        game.frame();
        game.frame();

        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.outcome(), Some(GameOutcome::Complete));
        assert_eq!(calls.borrow().complete, 1);
        assert!(calls.borrow().game_over.is_empty());
    }

    #[test]
    fn test_restart_discards_previous_game() {
        let (mut game, _clock, calls) = ready_game(Tuning::default());
        game.on_start_game();
        game.input_mut().set_held(Key::Space, true);
        game.frame();
        game.frame();
        assert!(!game.state().unwrap().player.projectiles.is_empty());

        game.on_start_game();
        let state = game.state().unwrap();
        assert!(state.player.projectiles.is_empty());
        assert!(state.formations.is_empty());
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.score, 0);
        assert_eq!(calls.borrow().started, 2);
        // Held keys from the old game do not carry over
        assert!(!game.input().is_held(Action::Shoot));
    }

    #[test]
    fn test_restart_after_game_over() {
        let (mut game, _clock, _calls) = ready_game(Tuning::default());
        game.on_start_game();
        game.frame();
        game.state_mut().unwrap().formations[0].offset.z = 200.0;
        game.frame();
        assert_eq!(game.phase(), Phase::GameOver);

        game.on_start_game();
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.outcome(), None);
    }

    #[test]
    fn test_restart_waits_in_ready_for_tilt() {
        let clock = ManualClock::new();
        let mut game = Game::new(
            5,
            Settings::default(),
            Tuning::default(),
            Box::new(clock.clone()),
        );
        game.assets_loaded(AssetRegistry::load(&BuiltinAssets));
        game.on_start_game();
        game.frame();
        game.state_mut().unwrap().formations[0].offset.z = 200.0;
        game.frame();
        assert_eq!(game.phase(), Phase::GameOver);

        game.request_tilt();
        game.on_start_game();
        assert_eq!(game.phase(), Phase::Ready);
        assert!(game.is_start_pending());

        game.input_mut().resolve_tilt(true);
        game.frame();
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.state().unwrap().score, 0);
    }

    #[test]
    fn test_panicking_tick_keeps_loop_running() {
        let (mut game, _clock, _calls) = ready_game(Tuning::default());
        game.on_start_game();
        game.frame();
        let ticks = game.state().unwrap().time_ticks;

        game.fail_next_tick = true;
        assert!(game.frame());
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.state().unwrap().time_ticks, ticks);

        assert!(game.frame());
        assert_eq!(game.state().unwrap().time_ticks, ticks + 1);
    }

    #[test]
    fn test_tilt_permission_timeout_defers_start() {
        let clock = ManualClock::new();
        let recorder = Recorder::default();
        let calls = recorder.0.clone();
        let mut game = Game::new(
            5,
            Settings::default(),
            Tuning::default(),
            Box::new(clock.clone()),
        );
        game.set_delegate(Box::new(recorder));
        game.assets_loaded(AssetRegistry::load(&BuiltinAssets));

        game.request_tilt();
        game.on_start_game();
        assert!(game.is_start_pending());
        assert_eq!(game.phase(), Phase::Ready);

        clock.advance(1.0);
        game.frame();
        assert_eq!(calls.borrow().started, 0);

        clock.advance(1.0);
        game.frame();
        assert_eq!(calls.borrow().started, 1);
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.input().tilt_permission(), TiltPermission::Denied);
    }

    #[test]
    fn test_tilt_granted_starts_on_next_frame() {
        let clock = ManualClock::new();
        let mut game = Game::new(
            5,
            Settings::default(),
            Tuning::default(),
            Box::new(clock.clone()),
        );
        game.assets_loaded(AssetRegistry::load(&BuiltinAssets));
        game.request_tilt();
        game.on_start_game();

        game.input_mut().resolve_tilt(true);
        game.frame();
        assert_eq!(game.phase(), Phase::Running);

        game.input_mut().set_tilt(20.0);
        game.frame();
        // gamma 20 maps to 20 / 80 * 140
        let x = game.state().unwrap().player.pos.x;
        assert!((x - 35.0).abs() < 1e-4);
    }

    #[test]
    fn test_held_key_overrides_tilt() {
        let clock = ManualClock::new();
        let mut game = Game::new(
            5,
            Settings::default(),
            Tuning::default(),
            Box::new(clock.clone()),
        );
        game.assets_loaded(AssetRegistry::load(&BuiltinAssets));
        game.request_tilt();
        game.input_mut().resolve_tilt(true);
        game.on_start_game();

        game.input_mut().set_tilt(10.0);
        game.frame();
        let x = game.state().unwrap().player.pos.x;
        assert!((x - 17.5).abs() < 1e-4);

        game.input_mut().set_held(Key::ArrowRight, true);
        for _ in 0..300 {
            game.frame();
        }
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.state().unwrap().player.pos.x, crate::consts::PLAYER_MAX_X);
    }

    #[test]
    fn test_resize_keeps_state() {
        let (mut game, _clock, _calls) = ready_game(Tuning::default());
        game.on_start_game();
        game.frame();
        game.frame();
        let ticks = game.state().unwrap().time_ticks;
        let enemies = game.state().unwrap().enemies_remaining();

        game.update_size(0.0, -10.0, f32::NAN);
        assert_eq!(game.camera().width, 1.0);
        game.update_size(1280.0, 720.0, 2.0);
        assert_eq!(game.camera().physical_size(), (2560, 1440));

        let state = game.state().unwrap();
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.enemies_remaining(), enemies);
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn test_rebinding_delegate() {
        let (mut game, _clock, first) = ready_game(Tuning::default());
        let second = Recorder::default();
        let second_calls = second.0.clone();
        game.set_delegate(Box::new(second));

        game.on_start_game();
        assert_eq!(first.borrow().started, 0);
        assert_eq!(second_calls.borrow().started, 1);
    }

    #[test]
    fn test_dispose_tears_down_once() {
        let (mut game, _clock, _calls) = ready_game(Tuning::default());
        let teardowns = Rc::new(RefCell::new(0));
        for _ in 0..3 {
            let teardowns = teardowns.clone();
            game.input_mut()
                .attach_listener(move || *teardowns.borrow_mut() += 1);
        }
        game.on_start_game();
        assert!(game.frame());

        game.dispose();
        game.dispose();
        assert_eq!(*teardowns.borrow(), 3);
        assert!(!game.frame());
        assert!(!game.is_alive());
        assert!(game.state().is_none());
    }

    #[test]
    fn test_scene_available_while_running() {
        let (mut game, _clock, _calls) = ready_game(Tuning::default());
        assert!(game.scene().is_none());
        game.on_start_game();
        game.frame();
        let scene = game.scene().unwrap();
        assert_eq!(scene.stars.len(), 100);
        assert!(!scene.instances.is_empty());
    }
}
