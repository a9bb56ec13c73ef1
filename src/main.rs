//! Lane Rush entry point
//!
//! Browser: WebGPU canvas, DOM menus and a `requestAnimationFrame` scheduler.
//! Native: a headless autopilot run on the fixed-step scheduler.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, TouchEvent};

    use lane_rush::audio::{AudioManager, SoundEffect};
    use lane_rush::engine::{FrameStatus, FrameTicket, GameHost, GameLoopEngine};
    use lane_rush::highscores::{Leaderboard, ScoreEntry};
    use lane_rush::persistence::LocalStore;
    use lane_rush::platform;
    use lane_rush::renderer::{RenderState, ShapeBatch};
    use lane_rush::scheduler::FrameScheduler;
    use lane_rush::settings::Settings;
    use lane_rush::sim::{Autopilot, Control};
    use lane_rush::tuning::Tuning;

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if visible {
                classes.remove_1("hidden")
            } else {
                classes.add_1("hidden")
            };
        }
    }

    /// `requestAnimationFrame`-backed scheduler
    struct RafScheduler {
        app: Weak<RefCell<App>>,
        pending: Option<(FrameTicket, i32)>,
    }

    impl FrameScheduler for RafScheduler {
        fn request_frame(&mut self, ticket: FrameTicket) {
            let Some(window) = web_sys::window() else { return };
            let app = self.app.clone();
            let closure = Closure::once(move |_time: f64| {
                if let Some(app) = app.upgrade() {
                    on_frame(&app, ticket);
                }
            });
            match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
                Ok(id) => self.pending = Some((ticket, id)),
                Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
            }
            closure.forget();
        }

        fn cancel_frame(&mut self, ticket: FrameTicket) {
            if let Some((pending, id)) = self.pending
                && pending == ticket
            {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
                self.pending = None;
            }
        }
    }

    /// Engine callbacks: HUD text and sound
    struct BrowserHost {
        audio: AudioManager,
        result: Option<(u32, u32)>,
    }

    impl GameHost for BrowserHost {
        fn on_score_update(&mut self, score: u32, coins: u32) {
            if let Some(document) = document() {
                set_text(&document, "hud-score", &score.to_string());
                set_text(&document, "hud-coins", &coins.to_string());
            }
            self.audio.play(SoundEffect::Milestone);
        }

        fn on_game_over(&mut self, score: u32, coins: u32) {
            self.audio.play(SoundEffect::Crash);
            self.result = Some((score, coins));
        }

        fn on_coin_collected(&mut self, coins: u32) {
            if let Some(document) = document() {
                set_text(&document, "hud-coins", &coins.to_string());
            }
            self.audio.play(SoundEffect::CoinPickup);
        }
    }

    struct App {
        engine: GameLoopEngine,
        scheduler: RafScheduler,
        host: BrowserHost,
        batch: ShapeBatch,
        render_state: Option<RenderState>,
        leaderboard: Leaderboard<LocalStore>,
        settings: Settings,
        player_name: String,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
    }

    impl App {
        fn track_fps(&mut self, now: f64) -> Option<u32> {
            self.frame_times[self.frame_index] = now;
            self.frame_index = (self.frame_index + 1) % self.frame_times.len();
            let oldest = self.frame_times[self.frame_index];
            let elapsed = now - oldest;
            (oldest > 0.0 && elapsed > 0.0).then(|| (60_000.0 / elapsed).round() as u32)
        }

        fn present(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            match render_state.render(&self.batch) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (size, logical) = (render_state.size, render_state.logical_size);
                    render_state.resize(size, logical);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => log::error!("Out of memory!"),
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Resize the surface, keeping the pixel space a running session draws in
        fn sync_surface(&mut self, physical: (u32, u32)) {
            let Some(viewport) = self.engine.drawing_viewport() else {
                return;
            };
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(physical, (viewport.width, viewport.height));
            }
        }

        /// Flip mute and persist the choice
        fn toggle_mute(&mut self) {
            self.settings.toggle_mute(&mut LocalStore::new());
            self.host.audio.apply_settings(&self.settings);
            log::info!("Muted: {}", self.settings.muted);
        }

        fn start(&mut self) {
            let Some(document) = document() else { return };
            let name = document
                .get_element_by_id("name-input")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
                .unwrap_or_default();
            if name.trim().is_empty() {
                set_visible(&document, "name-error", true);
                return;
            }
            set_visible(&document, "name-error", false);
            self.player_name = name;

            self.engine.set_touch_sensitivity(self.settings.touch_sensitivity);
            self.engine.set_reduced_motion(!self.settings.effective_animation());
            match self.engine.start_session(&mut self.scheduler) {
                Ok(_) => {
                    // A resize while in the menu changes the new session's pixel space
                    if let Some(size) = self.render_state.as_ref().map(|r| r.size) {
                        self.sync_surface(size);
                    }
                    self.frame_times = [0.0; 60];
                    set_text(&document, "hud-score", "0");
                    set_text(&document, "hud-coins", "0");
                    set_visible(&document, "menu", false);
                    set_visible(&document, "game-over", false);
                    set_visible(&document, "scores", false);
                    set_visible(&document, "hud", true);
                    self.host.audio.resume();
                    self.host.audio.play(SoundEffect::Start);
                }
                Err(e) => log::error!("Cannot start session: {}", e),
            }
        }

        fn finish(&mut self, score: u32, coins: u32) {
            let Some(document) = document() else { return };
            if self.leaderboard.qualifies(score) {
                self.host.audio.play(SoundEffect::HighScore);
            }
            let entries = self.leaderboard.add_score(&self.player_name, score);

            set_text(&document, "final-score", &score.to_string());
            set_text(&document, "final-coins", &coins.to_string());
            render_leaderboard(&document, &entries);
            set_visible(&document, "hud", false);
            set_visible(&document, "scores", true);
            set_visible(&document, "game-over", true);
        }

        fn back_to_menu(&mut self) {
            self.engine.return_to_menu(&mut self.scheduler);
            if let Some(size) = self.render_state.as_ref().map(|r| r.size) {
                self.sync_surface(size);
            }
            if let Some(document) = document() {
                render_leaderboard(&document, &self.leaderboard.get_all());
                set_visible(&document, "game-over", false);
                set_visible(&document, "hud", false);
                set_visible(&document, "scores", true);
                set_visible(&document, "menu", true);
            }
        }
    }

    fn render_leaderboard(document: &Document, entries: &[ScoreEntry]) {
        let Some(list) = document.get_element_by_id("leaderboard") else {
            return;
        };
        list.set_inner_html("");
        for (rank, entry) in entries.iter().enumerate() {
            if let Ok(item) = document.create_element("li") {
                item.set_text_content(Some(&format!(
                    "{}. {} {}",
                    rank + 1,
                    entry.name,
                    entry.score
                )));
                let _ = list.append_child(&item);
            }
        }
    }

    /// The frame callback scheduled through `RafScheduler`
    fn on_frame(app: &Rc<RefCell<App>>, ticket: FrameTicket) {
        let mut guard = app.borrow_mut();
        let app = &mut *guard;
        let now = platform::now_ms();

        let status = app.engine.run_frame(
            ticket,
            now,
            &mut app.batch,
            &mut app.host,
            &mut app.scheduler,
        );
        match status {
            FrameStatus::Ignored | FrameStatus::Halted => return,
            FrameStatus::Scheduled | FrameStatus::GameOver { .. } => app.present(),
        }

        if app.settings.show_fps
            && let Some(fps) = app.track_fps(now)
            && let Some(document) = document()
        {
            set_text(&document, "hud-fps", &fps.to_string());
        }

        if let Some((score, coins)) = app.host.result.take() {
            app.finish(score, coins);
        }
    }

    /// Canvas size in logical and physical pixels
    fn canvas_size(canvas: &HtmlCanvasElement) -> ((f32, f32), (u32, u32)) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let logical = (canvas.client_width() as f32, canvas.client_height() as f32);
        let physical = (
            (logical.0 as f64 * dpr) as u32,
            (logical.1 as f64 * dpr) as u32,
        );
        canvas.set_width(physical.0);
        canvas.set_height(physical.1);
        (logical, physical)
    }

    async fn create_render_state(
        canvas: &HtmlCanvasElement,
        logical: (f32, f32),
        physical: (u32, u32),
    ) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("No suitable GPU adapter: {}", e);
                return None;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, physical, logical).await {
            Ok(state) => Some(state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                None
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Lane Rush starting...");

        let Some(document) = document() else {
            log::error!("No document");
            return;
        };
        set_visible(&document, "loading", false);

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        let store = LocalStore::new();
        let settings = Settings::load(&store);
        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);

        let (logical, physical) = canvas_size(&canvas);
        let render_state = create_render_state(&canvas, logical, physical).await;

        let seed = platform::clock_seed();
        let mut engine = GameLoopEngine::with_seed(Tuning::default(), seed);
        // Without a surface the engine refuses to start
        if render_state.is_some() {
            engine.set_viewport(logical.0, logical.1);
        }

        let app = Rc::new_cyclic(|weak: &Weak<RefCell<App>>| {
            RefCell::new(App {
                engine,
                scheduler: RafScheduler {
                    app: weak.clone(),
                    pending: None,
                },
                host: BrowserHost {
                    audio,
                    result: None,
                },
                batch: ShapeBatch::new(),
                render_state,
                leaderboard: Leaderboard::new(store),
                settings,
                player_name: String::new(),
                frame_times: [0.0; 60],
                frame_index: 0,
            })
        });

        {
            let a = app.borrow();
            render_leaderboard(&document, &a.leaderboard.get_all());
            set_visible(&document, "hud-fps-item", a.settings.show_fps);
        }
        set_visible(&document, "scores", true);
        set_visible(&document, "menu", true);

        setup_buttons(&document, app.clone());
        setup_keyboard(app.clone());
        setup_touch(&canvas, app.clone());
        setup_resize(canvas.clone(), app);

        log::info!("Lane Rush ready (seed {})", seed);
    }

    fn on_click(document: &Document, id: &str, app: Rc<RefCell<App>>, action: fn(&mut App)) {
        let Some(btn) = document.get_element_by_id(id) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            action(&mut app.borrow_mut());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        on_click(document, "start-btn", app.clone(), App::start);
        on_click(document, "menu-btn", app, App::back_to_menu);
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };

        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut a = app.borrow_mut();
                if let Some(control) = Control::from_key(&key) {
                    event.prevent_default();
                    a.engine.key_event(control, true);
                    return;
                }
                // Letters typed into the name field are not hotkeys
                let typing = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some();
                match key.as_str() {
                    "Enter" if a.engine.session().is_none() => a.start(),
                    _ if typing => {}
                    "i" | "I" => {
                        let enable = !a.engine.autopilot_enabled();
                        a.engine
                            .set_autopilot(enable.then(Autopilot::default));
                        log::info!("Autopilot: {}", enable);
                    }
                    "m" | "M" => a.toggle_mute(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(control) = Control::from_key(&event.key()) {
                    app.borrow_mut().engine.key_event(control, false);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Held keys would stick across a focus change
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().engine.release_keys();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// X of the first touch relative to the canvas
    fn touch_x(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<f32> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some(touch.client_x() as f32 - rect.left() as f32)
    }

    fn setup_touch(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(x) = touch_x(&canvas_clone, &event) {
                    app.borrow_mut().engine.touch_start(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(x) = touch_x(&canvas_clone, &event) {
                    app.borrow_mut().engine.touch_move(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                app.borrow_mut().engine.touch_end();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (logical, physical) = canvas_size(&canvas);
            let mut a = app.borrow_mut();
            if a.render_state.is_none() {
                return;
            }
            a.engine.set_viewport(logical.0, logical.1);
            a.sync_surface(physical);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use lane_rush::engine::{FrameStatus, GameHost, GameLoopEngine};
    use lane_rush::highscores::Leaderboard;
    use lane_rush::persistence::MemoryStore;
    use lane_rush::platform;
    use lane_rush::renderer::ShapeBatch;
    use lane_rush::scheduler::StepScheduler;
    use lane_rush::sim::Autopilot;
    use lane_rush::tuning::Tuning;

    /// Ten minutes of play at 60 Hz
    const DEMO_FRAMES: u64 = 60 * 60 * 10;

    #[derive(Default)]
    struct LogHost {
        coins: u32,
    }

    impl GameHost for LogHost {
        fn on_score_update(&mut self, score: u32, coins: u32) {
            log::debug!("Score {} ({} coins)", score, coins);
        }

        fn on_game_over(&mut self, score: u32, coins: u32) {
            log::info!("Crashed with score {} and {} coins", score, coins);
        }

        fn on_coin_collected(&mut self, coins: u32) {
            self.coins = coins;
        }
    }

    fn load_tuning() -> Tuning {
        let Ok(path) = std::env::var("LANE_RUSH_TUNING") else {
            return Tuning::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => match Tuning::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides from {}", path);
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {}", path, e);
                    Tuning::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}", path, e);
                Tuning::default()
            }
        }
    }

    pub fn run() {
        let seed = platform::clock_seed();
        let mut engine = GameLoopEngine::with_seed(load_tuning(), seed);
        engine.set_viewport(800.0, 600.0);
        engine.set_autopilot(Some(Autopilot::default()));

        let mut scheduler = StepScheduler::new();
        if let Err(e) = engine.start_session(&mut scheduler) {
            log::error!("Cannot start demo session: {}", e);
            return;
        }

        let mut host = LogHost::default();
        let mut canvas = ShapeBatch::new();
        let status = scheduler.run(&mut engine, &mut canvas, &mut host, DEMO_FRAMES);

        let (score, coins) = match status {
            Some(FrameStatus::GameOver { score, coins }) => (score, coins),
            _ => {
                let score = engine.session().map_or(0, |s| s.floored_score());
                log::info!("Demo survived {} frames", scheduler.frames());
                (score, host.coins)
            }
        };

        let mut leaderboard = Leaderboard::new(MemoryStore::new());
        let entries = leaderboard.add_score("autopilot", score);
        for (rank, entry) in entries.iter().enumerate() {
            println!("{:>2}. {:<10} {:>6}  ({} coins)", rank + 1, entry.name, entry.score, coins);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lane Rush (native) starting headless autopilot demo...");
    log::info!("Run with `trunk serve` for the playable web version");
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}
