//! Best score persistence
//!
//! A single best score, stored by the host in LocalStorage. The game core
//! never reads or writes it; the host records each finished run.

use serde::{Deserialize, Serialize};

/// Best score across runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "magento_destroyers_highscore";

    pub fn new() -> Self {
        Self { best: 0 }
    }

    /// Record a finished run. Returns true if it set a new best.
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Best score, if any run has scored
    pub fn top_score(&self) -> Option<u64> {
        (self.best > 0).then_some(self.best)
    }

    /// Parse the stored value: a bare integer, or the JSON object form
    pub fn parse(stored: &str) -> Option<Self> {
        let stored = stored.trim();
        if let Ok(best) = stored.parse::<u64>() {
            return Some(Self { best });
        }
        serde_json::from_str(stored).ok()
    }

    /// Load the best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(stored)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(high) = Self::parse(&stored) {
                    log::info!("Loaded best score {}", high.best);
                    return high;
                }
                log::warn!("Ignoring unreadable best score");
            }
        }

        log::info!("No best score found, starting fresh");
        Self::new()
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.best.to_string());
            log::info!("Best score saved ({})", self.best);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Zero-padded score, as shown on the HUD
pub fn format_score(score: u64) -> String {
    format!("{:08}", score)
}
