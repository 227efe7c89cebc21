//! Magento Destroyers entry point
//!
//! On the web this is the host: it wires DOM events into the controller,
//! runs the requestAnimationFrame loop and draws the scene on a 2D canvas.
//! Natively it plays a short headless game and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::{JsFuture, spawn_local};
    use web_sys::{CanvasRenderingContext2d, Document, EventTarget, HtmlCanvasElement};

    use magento_destroyers::assets::{AssetRegistry, BuiltinAssets};
    use magento_destroyers::highscores::format_score;
    use magento_destroyers::renderer::{Camera, InstanceKind, Scene};
    use magento_destroyers::renderer::instance::colors;
    use magento_destroyers::sim::{Key, SystemClock, TiltPermission};
    use magento_destroyers::{ControlDelegate, Game, HighScore, Phase, Settings, Tuning};

    // iOS asks for motion access from a user gesture; elsewhere it is implied
    #[wasm_bindgen(inline_js = "
        export function request_orientation_permission() {
            if (typeof DeviceOrientationEvent === 'undefined') {
                return Promise.resolve(false);
            }
            if (typeof DeviceOrientationEvent.requestPermission !== 'function') {
                return Promise.resolve(true);
            }
            return DeviceOrientationEvent.requestPermission()
                .then(state => state === 'granted')
                .catch(() => false);
        }
    ")]
    extern "C" {
        fn request_orientation_permission() -> js_sys::Promise;
    }

    /// HUD updates and best score bookkeeping
    struct DomDelegate {
        document: Document,
        high_score: HighScore,
        last_score: u64,
    }

    impl DomDelegate {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }

        fn finish_run(&mut self, score: u64) {
            if self.high_score.record(score) {
                self.high_score.save();
                log::info!("New best score: {}", score);
            }
            self.set_text("final-score", &format_score(score));
            self.set_text("best-score", &format_score(self.high_score.best));
            self.set_visible("hud", false);
        }
    }

    impl ControlDelegate for DomDelegate {
        fn on_score_changed(&mut self, score: u64, _old_score: u64) {
            self.last_score = score;
            self.set_text("score", &format_score(score));
        }

        fn on_start_game(&mut self) {
            self.last_score = 0;
            self.set_text("score", &format_score(0));
            self.set_visible("start-screen", false);
            self.set_visible("game-over", false);
            self.set_visible("complete", false);
            self.set_visible("hud", true);
        }

        fn on_game_over(&mut self, score: u64, reason: &str) {
            self.finish_run(score);
            self.set_text("game-over-reason", reason);
            self.set_visible("game-over", true);
        }

        fn on_paused(&mut self) {
            self.set_visible("pause-menu", true);
        }

        fn on_resumed(&mut self) {
            self.set_visible("pause-menu", false);
        }

        fn on_complete(&mut self) {
            self.finish_run(self.last_score);
            self.set_visible("complete", true);
        }
    }

    /// 2D canvas target
    struct Surface {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    }

    impl Surface {
        fn resize(&self, game: &mut Game) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let width = self.canvas.client_width() as f32;
            let height = self.canvas.client_height() as f32;
            game.update_size(width, height, window.device_pixel_ratio() as f32);

            let (w, h) = game.camera().physical_size();
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }

        fn draw(&self, scene: Option<&Scene>, camera: &Camera) {
            let ctx = &self.ctx;
            let ratio = camera.pixel_ratio as f64;
            let _ = ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
            let (w, h) = (camera.width as f64, camera.height as f64);

            ctx.set_fill_style_str(&css(colors::BACKGROUND));
            ctx.fill_rect(0.0, 0.0, w, h);

            let Some(scene) = scene else {
                return;
            };

            ctx.set_fill_style_str(&css(colors::STAR));
            for star in scene.star_points(camera) {
                ctx.fill_rect(star.x as f64, star.y as f64, 1.5, 1.5);
            }

            for sprite in scene.sprites(camera) {
                let color = css(sprite.color);
                if let Some(bloom) = scene.bloom {
                    if sprite.kind != InstanceKind::Deadline {
                        ctx.set_shadow_color(&color);
                        ctx.set_shadow_blur(12.0 * bloom.strength as f64);
                    }
                }
                ctx.save();
                let _ = ctx.translate(sprite.center.x as f64, sprite.center.y as f64);
                let _ = ctx.rotate(sprite.angle as f64);
                ctx.set_fill_style_str(&color);
                let (hx, hy) = (sprite.half_size.x as f64, sprite.half_size.y as f64);
                ctx.fill_rect(-hx, -hy, hx * 2.0, hy * 2.0);
                ctx.restore();
                ctx.set_shadow_blur(0.0);
            }

            if let Some(crt) = scene.crt {
                let lines = (h / 3.0) as u32;
                for i in 0..lines {
                    let y = i as f64 * 3.0;
                    let alpha = (0.12 + crt.scanline_offset((y / h) as f32)) * crt.opacity;
                    ctx.set_fill_style_str(&format!("rgba(0,0,0,{:.3})", alpha.max(0.0)));
                    ctx.fill_rect(0.0, y, w, 1.0);
                }
            }
        }
    }

    fn css(color: [f32; 4]) -> String {
        format!(
            "rgba({},{},{},{})",
            (color[0] * 255.0) as u8,
            (color[1] * 255.0) as u8,
            (color[2] * 255.0) as u8,
            color[3]
        )
    }

    /// Add a DOM listener whose teardown is owned by the game's input handler
    fn listen(
        game: &Rc<RefCell<Game>>,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        if target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("Could not listen for {}", kind);
            return;
        }
        let target = target.clone();
        game.borrow_mut().input_mut().attach_listener(move || {
            let _ = target.remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        });
    }

    /// Begin (or restart) a game, negotiating tilt access on the first start
    fn start_game(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        if g.settings().tilt_input && g.input().tilt_permission() == TiltPermission::NotRequested {
            g.request_tilt();
            let promise = request_orientation_permission();
            let game = game.clone();
            spawn_local(async move {
                let granted = JsFuture::from(promise)
                    .await
                    .ok()
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                game.borrow_mut().input_mut().resolve_tilt(granted);
            });
        }
        g.on_start_game();
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Magento Destroyers starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");
        let surface = Rc::new(Surface { canvas, ctx });

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            Settings::load(),
            Tuning::load(),
            Box::new(SystemClock::new()),
        )));
        let high_score = HighScore::load();
        game.borrow_mut().set_delegate(Box::new(DomDelegate {
            document: document.clone(),
            high_score,
            last_score: 0,
        }));
        surface.resize(&mut game.borrow_mut());
        if let Some(el) = document.get_element_by_id("best-score") {
            el.set_text_content(Some(&format_score(high_score.best)));
        }

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&game, &window, &document);
        setup_screens(&game, &document);

        {
            let g = game.clone();
            let surface = surface.clone();
            listen(&game, &window, "resize", move |_event| {
                surface.resize(&mut g.borrow_mut());
            });
        }

        // Assets resolve before anything can start
        {
            let game = game.clone();
            let document = document.clone();
            spawn_local(async move {
                game.borrow_mut()
                    .assets_loaded(AssetRegistry::load(&BuiltinAssets));
                if game.borrow().phase() == Phase::Ready {
                    if let Some(loading) = document.get_element_by_id("loading") {
                        let _ = loading.set_attribute("class", "hidden");
                    }
                    if let Some(start) = document.get_element_by_id("start-screen") {
                        let _ = start.set_attribute("class", "");
                    }
                }
            });
        }

        // Tear everything down when the page goes away
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().dispose();
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        request_animation_frame(game, surface);

        log::info!("Magento Destroyers running!");
    }

    fn setup_input_handlers(game: &Rc<RefCell<Game>>, window: &web_sys::Window, document: &Document) {
        // Keyboard
        {
            let g = game.clone();
            listen(game, window, "keydown", move |event| {
                let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                    return;
                };
                if event.key() == "Enter" {
                    let phase = g.borrow().phase();
                    if matches!(phase, Phase::Ready | Phase::GameOver) {
                        start_game(&g);
                    }
                    return;
                }
                if let Some(key) = Key::from_dom_key(&event.key()) {
                    if matches!(key, Key::Space | Key::ArrowLeft | Key::ArrowRight) {
                        event.prevent_default();
                    }
                    g.borrow_mut().input_mut().set_held(key, true);
                }
            });
        }
        {
            let g = game.clone();
            listen(game, window, "keyup", move |event| {
                let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                    return;
                };
                if let Some(key) = Key::from_dom_key(&event.key()) {
                    g.borrow_mut().input_mut().set_held(key, false);
                }
            });
        }

        // Touch: shoot while playing, start otherwise
        {
            let g = game.clone();
            listen(game, window, "touchstart", move |_event| {
                let phase = g.borrow().phase();
                match phase {
                    Phase::Running => g.borrow_mut().input_mut().trigger_once(Key::Touch),
                    Phase::Ready | Phase::GameOver => start_game(&g),
                    _ => {}
                }
            });
        }

        // Device tilt
        {
            let g = game.clone();
            listen(game, window, "deviceorientation", move |event| {
                let Some(event) = event.dyn_ref::<web_sys::DeviceOrientationEvent>() else {
                    return;
                };
                if let Some(gamma) = event.gamma() {
                    g.borrow_mut().input_mut().set_tilt(gamma as f32);
                }
            });
        }

        // Auto-pause when the tab is hidden
        {
            let g = game.clone();
            let doc = document.clone();
            listen(game, document, "visibilitychange", move |_event| {
                if doc.visibility_state() == web_sys::VisibilityState::Hidden
                    && g.borrow_mut().pause()
                {
                    log::info!("Auto-paused (tab hidden)");
                }
            });
        }
    }

    fn setup_screens(game: &Rc<RefCell<Game>>, document: &Document) {
        for id in ["start-btn", "restart-btn", "complete-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let g = game.clone();
                listen(game, &btn, "click", move |_event| start_game(&g));
            }
        }
        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let g = game.clone();
            listen(game, &btn, "click", move |_event| {
                g.borrow_mut().resume();
            });
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, surface: Rc<Surface>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game, surface);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, surface: Rc<Surface>) {
        let alive = {
            let mut g = game.borrow_mut();
            let alive = g.frame();
            if alive {
                surface.draw(g.scene().as_ref(), g.camera());
            }
            alive
        };

        // A disposed game stops rescheduling itself
        if alive {
            request_animation_frame(game, surface);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Magento Destroyers (native) starting...");
    log::info!("Rendering needs a browser - build for wasm32 for the playable version");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// A scripted game without a display: sweep left and right while firing
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use magento_destroyers::assets::{AssetRegistry, BuiltinAssets};
    use magento_destroyers::highscores::format_score;
    use magento_destroyers::sim::{Key, ManualClock};
    use magento_destroyers::{ControlDelegate, Game, HighScore, Phase, Settings, Tuning};

    const FRAME_SECS: f64 = 1.0 / 60.0;
    const MAX_FRAMES: u32 = 20_000;

    struct LogDelegate;

    impl ControlDelegate for LogDelegate {
        fn on_score_changed(&mut self, score: u64, _old_score: u64) {
            log::debug!("Score: {}", format_score(score));
        }

        fn on_start_game(&mut self) {
            log::info!("Game started");
        }

        fn on_game_over(&mut self, score: u64, reason: &str) {
            log::info!("Game over: {} ({})", reason, format_score(score));
        }

        fn on_complete(&mut self) {
            log::info!("All waves cleared");
        }
    }

    pub fn run() {
        let seed = std::env::args()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or(42);

        let clock = ManualClock::new();
        let settings = Settings {
            tilt_input: false,
            ..Settings::load()
        };
        let mut game = Game::new(seed, settings, Tuning::load(), Box::new(clock.clone()));
        game.set_delegate(Box::new(LogDelegate));
        game.update_size(1280.0, 720.0, 1.0);
        game.assets_loaded(AssetRegistry::load(&BuiltinAssets));
        game.on_start_game();
        if game.phase() != Phase::Running {
            log::error!("Game did not start");
            return;
        }

        game.input_mut().set_held(Key::Space, true);
        let mut frames = 0;
        let mut heading_right = true;
        while frames < MAX_FRAMES && game.phase() == Phase::Running {
            let x = game.state().map(|s| s.player.pos.x).unwrap_or(0.0);
            if heading_right && x >= 60.0 {
                heading_right = false;
            } else if !heading_right && x <= -60.0 {
                heading_right = true;
            }
            let input = game.input_mut();
            input.set_held(Key::ArrowRight, heading_right);
            input.set_held(Key::ArrowLeft, !heading_right);

            game.frame();
            clock.advance(FRAME_SECS);
            frames += 1;
        }

        let score = game.score();
        let waves = game.state().map(|s| s.waves_cleared).unwrap_or(0);
        let mut high = HighScore::load();
        if high.record(score) {
            high.save();
        }
        log::info!(
            "Finished after {} frames: score {}, {} waves cleared",
            frames,
            format_score(score),
            waves
        );
        println!("score {} waves {} frames {}", score, waves, frames);

        game.dispose();
    }
}
