//! Notifications from the game controller to the host application
//!
//! Every callback has a no-op default, so a host implements only what it
//! shows. `on_score_changed` is the one every HUD needs.

/// Event sink for game lifecycle and score changes
pub trait ControlDelegate {
    /// Called on every score mutation
    fn on_score_changed(&mut self, score: u64, old_score: u64);

    /// The game entered `Running` (new game or restart)
    fn on_start_game(&mut self) {}

    /// A formation reached the deadline
    fn on_game_over(&mut self, _score: u64, _reason: &str) {}

    fn on_paused(&mut self) {}

    fn on_resumed(&mut self) {}

    /// All waves of a finite campaign were cleared
    fn on_complete(&mut self) {}
}

/// Delegate that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDelegate;

impl ControlDelegate for NoopDelegate {
    fn on_score_changed(&mut self, _score: u64, _old_score: u64) {}
}
