//! Input state tracking
//!
//! Raw device events are reduced to two kinds of logical input:
//! - Held actions (movement, fire) repeat every frame while the key is down
//! - One-shot actions (pause, level skip) fire once per key-down-to-up
//!
//! The handler also keeps the latest device tilt reading and the state of
//! the tilt permission request. Hosts register a teardown callback for
//! every listener they install; `destroy` runs them exactly once.

use std::collections::{BTreeSet, HashMap};

use crate::consts::*;

/// Physical inputs the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    KeyA,
    KeyD,
    Space,
    Escape,
    KeyL,
    /// A touch start anywhere on the game surface
    Touch,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "a" | "A" => Some(Key::KeyA),
            "d" | "D" => Some(Key::KeyD),
            " " | "Spacebar" => Some(Key::Space),
            "Escape" | "Esc" => Some(Key::Escape),
            "l" | "L" => Some(Key::KeyL),
            _ => None,
        }
    }
}

/// Logical game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Shoot,
    TogglePause,
    SkipWave,
}

/// Key to action mapping
#[derive(Debug, Clone)]
pub struct KeyBindings {
    held: HashMap<Key, Action>,
    once: HashMap<Key, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let held = HashMap::from([
            (Key::ArrowLeft, Action::MoveLeft),
            (Key::KeyA, Action::MoveLeft),
            (Key::ArrowRight, Action::MoveRight),
            (Key::KeyD, Action::MoveRight),
            (Key::Space, Action::Shoot),
        ]);
        let once = HashMap::from([
            (Key::Escape, Action::TogglePause),
            (Key::KeyL, Action::SkipWave),
            (Key::Touch, Action::Shoot),
        ]);
        Self { held, once }
    }
}

impl KeyBindings {
    pub fn bind_held(&mut self, key: Key, action: Action) {
        self.once.remove(&key);
        self.held.insert(key, action);
    }

    pub fn bind_once(&mut self, key: Key, action: Action) {
        self.held.remove(&key);
        self.once.insert(key, action);
    }
}

/// Device tilt permission negotiation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TiltPermission {
    /// Never asked (or no tilt sensor); discrete input only
    NotRequested,
    /// Waiting on the host since the given clock time
    Pending { since: f64 },
    Granted,
    Denied,
}

/// Per-game input state
pub struct InputHandler {
    bindings: KeyBindings,
    pressed: BTreeSet<Key>,
    triggered: Vec<Action>,
    /// Latest tilt reading (degrees, left/right)
    tilt: Option<f32>,
    permission: TiltPermission,
    tilt_enabled: bool,
    listeners: Vec<Box<dyn FnOnce()>>,
    destroyed: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl std::fmt::Debug for InputHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputHandler")
            .field("pressed", &self.pressed)
            .field("triggered", &self.triggered)
            .field("tilt", &self.tilt)
            .field("permission", &self.permission)
            .field("listeners", &self.listeners.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl InputHandler {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            pressed: BTreeSet::new(),
            triggered: Vec::new(),
            tilt: None,
            permission: TiltPermission::NotRequested,
            tilt_enabled: true,
            listeners: Vec::new(),
            destroyed: false,
        }
    }

    /// Record a key going down or up
    ///
    /// Releasing a key bound to a one-shot action triggers it, but only if
    /// the key was actually down.
    pub fn set_held(&mut self, key: Key, down: bool) {
        if self.destroyed {
            return;
        }
        if down {
            self.pressed.insert(key);
        } else if self.pressed.remove(&key) {
            if let Some(action) = self.bindings.once.get(&key) {
                self.triggered.push(*action);
            }
        }
    }

    /// Trigger a one-shot key directly (touch, on-screen buttons)
    pub fn trigger_once(&mut self, key: Key) {
        if self.destroyed {
            return;
        }
        if let Some(action) = self.bindings.once.get(&key) {
            self.triggered.push(*action);
        }
    }

    /// Held actions for this frame. Can be polled any number of times.
    pub fn poll(&self) -> impl Iterator<Item = Action> + '_ {
        self.pressed
            .iter()
            .filter_map(|key| self.bindings.held.get(key).copied())
    }

    /// Net horizontal direction from held movement keys
    pub fn move_direction(&self) -> f32 {
        self.poll().fold(0.0f32, |dir, action| match action {
            Action::MoveLeft => dir - 1.0,
            Action::MoveRight => dir + 1.0,
            _ => dir,
        })
        .clamp(-1.0, 1.0)
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.poll().any(|a| a == action)
    }

    /// One-shot actions since the last call
    pub fn take_triggered(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.triggered)
    }

    pub fn set_tilt_enabled(&mut self, enabled: bool) {
        self.tilt_enabled = enabled;
        if !enabled {
            self.tilt = None;
        }
    }

    /// Start waiting on the tilt permission
    pub fn request_tilt(&mut self, now: f64) {
        if self.permission == TiltPermission::NotRequested {
            self.permission = TiltPermission::Pending { since: now };
        }
    }

    /// Host reports the outcome of the permission request
    pub fn resolve_tilt(&mut self, granted: bool) {
        self.permission = if granted {
            TiltPermission::Granted
        } else {
            log::warn!("Tilt permission denied, using keyboard/touch only");
            TiltPermission::Denied
        };
    }

    /// Whether the permission request has finished
    ///
    /// A request pending longer than `TILT_PERMISSION_TIMEOUT` is treated as
    /// denied.
    pub fn tilt_settled(&mut self, now: f64) -> bool {
        match self.permission {
            TiltPermission::Pending { since } => {
                if now - since >= TILT_PERMISSION_TIMEOUT {
                    log::warn!("Tilt permission timed out, continuing without it");
                    self.permission = TiltPermission::Denied;
                    true
                } else {
                    false
                }
            }
            _ => true,
        }
    }

    pub fn tilt_permission(&self) -> TiltPermission {
        self.permission
    }

    /// Record a device orientation reading (gamma, degrees)
    pub fn set_tilt(&mut self, gamma: f32) {
        if self.destroyed || !self.tilt_enabled || self.permission != TiltPermission::Granted {
            return;
        }
        if gamma.is_finite() && gamma != 0.0 {
            self.tilt = Some(gamma);
        }
    }

    /// Consume the latest tilt reading as a ship X
    ///
    /// Each reading places the ship once. Between readings the ship is left
    /// to the discrete controls.
    pub fn take_tilt(&mut self) -> Option<f32> {
        let x = self.tilt_x();
        self.tilt = None;
        x
    }

    /// Ship X implied by the current tilt, if any
    pub fn tilt_x(&self) -> Option<f32> {
        self.tilt.map(|gamma| {
            let normalized = gamma.clamp(-TILT_CLAMP_DEG, TILT_CLAMP_DEG) / (2.0 * TILT_CLAMP_DEG);
            (normalized * TILT_RANGE).clamp(PLAYER_MIN_X, PLAYER_MAX_X)
        })
    }

    /// Forget all pressed keys and pending actions (new game)
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.triggered.clear();
        self.tilt = None;
    }

    /// Register the teardown for a listener installed by the host
    pub fn attach_listener(&mut self, teardown: impl FnOnce() + 'static) {
        if self.destroyed {
            teardown();
            return;
        }
        self.listeners.push(Box::new(teardown));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Unregister every listener. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for teardown in self.listeners.drain(..) {
            teardown();
        }
        self.reset();
    }
}

impl Drop for InputHandler {
    fn drop(&mut self) {
        self.destroy();
    }
}
