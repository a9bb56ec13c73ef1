//! Game loop engine
//!
//! Owns the session state and the single pending frame callback. The host
//! owns the phase machine and the drawing surface; the engine mirrors the
//! phase, runs one tick per frame while playing, and reports score and
//! game-over events back through [`GameHost`].

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::renderer::Canvas;
use crate::scheduler::FrameScheduler;
use crate::sim::{
    Autopilot, Control, FrameContext, GameEvent, GamePhase, SimulationState, TickOutcome,
    Viewport, tick,
};
use crate::tuning::Tuning;

/// Default touch-drag sensitivity (lane units per pixel)
pub const DEFAULT_TOUCH_SENSITIVITY: f32 = 0.01;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("no rendering surface attached")]
    NoSurface,
    #[error("a session is already running")]
    AlreadyPlaying,
}

/// Handle for one requested animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTicket(u64);

impl FrameTicket {
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// What a call to [`GameLoopEngine::run_frame`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Tick ran and the next frame was requested
    Scheduled,
    /// Tick ran and ended the session
    GameOver { score: u32, coins: u32 },
    /// Stale or unexpected ticket; nothing happened
    Ignored,
    /// Surface went away mid-session; no tick ran and no frame was requested
    Halted,
}

/// Callbacks from the engine to the presentation host
pub trait GameHost {
    /// Fired at most once per tick, when the floored score crosses a scoring interval
    fn on_score_update(&mut self, score: u32, coins: u32);

    /// Fired exactly once per session, on the first obstacle hit
    fn on_game_over(&mut self, score: u32, coins: u32);

    /// Fired for every coin picked up
    fn on_coin_collected(&mut self, _coins: u32) {}
}

/// The per-frame driver for one play session at a time
pub struct GameLoopEngine<R: Rng = Pcg32> {
    tuning: Tuning,
    rng: R,
    phase: GamePhase,
    viewport: Option<Viewport>,
    session: Option<SimulationState>,
    pending: Option<FrameTicket>,
    next_ticket: u64,
    autopilot: Option<Autopilot>,
    touch_sensitivity: f32,
    animate: bool,
    events: Vec<GameEvent>,
}

impl GameLoopEngine<Pcg32> {
    /// Engine with a PCG generator seeded from `seed`
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        log::info!("Engine seed: {}", seed);
        Self::new(tuning, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> GameLoopEngine<R> {
    pub fn new(tuning: Tuning, rng: R) -> Self {
        Self {
            tuning: tuning.sanitized(),
            rng,
            phase: GamePhase::Menu,
            viewport: None,
            session: None,
            pending: None,
            next_ticket: 0,
            autopilot: None,
            touch_sensitivity: DEFAULT_TOUCH_SENSITIVITY,
            animate: true,
            events: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Current session, if one has been started
    pub fn session(&self) -> Option<&SimulationState> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut SimulationState> {
        self.session.as_mut()
    }

    pub fn pending_frame(&self) -> Option<FrameTicket> {
        self.pending
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Pixel space frames are painted in: the running session's viewport,
    /// otherwise the attached surface size
    pub fn drawing_viewport(&self) -> Option<Viewport> {
        match &self.session {
            Some(session) => Some(session.viewport),
            None => self.viewport,
        }
    }

    /// Attach or resize the drawing surface. A running session keeps its
    /// horizon; the new size applies from the next session.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            log::warn!("Ignoring degenerate viewport {}x{}", width, height);
            return;
        }
        self.viewport = Some(Viewport::new(width, height));
    }

    pub fn detach_surface(&mut self) {
        self.viewport = None;
    }

    /// Enter `Playing` with a fresh session and request the first frame
    pub fn start_session<S: FrameScheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
    ) -> Result<FrameTicket, EngineError> {
        if self.phase == GamePhase::Playing {
            return Err(EngineError::AlreadyPlaying);
        }
        let viewport = self.viewport.ok_or(EngineError::NoSurface)?;

        self.cancel_pending(scheduler);
        self.events.clear();
        self.session = Some(SimulationState::new(viewport, &self.tuning, &mut self.rng));
        self.phase = GamePhase::Playing;
        log::info!(
            "Session started ({}x{})",
            viewport.width,
            viewport.height
        );

        Ok(self.request_next(scheduler))
    }

    /// The frame callback. Runs one tick if `ticket` is the pending frame.
    pub fn run_frame<C, H, S>(
        &mut self,
        ticket: FrameTicket,
        now_ms: f64,
        canvas: &mut C,
        host: &mut H,
        scheduler: &mut S,
    ) -> FrameStatus
    where
        C: Canvas + ?Sized,
        H: GameHost + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        if self.pending != Some(ticket) {
            return FrameStatus::Ignored;
        }
        self.pending = None;

        if self.phase != GamePhase::Playing {
            return FrameStatus::Ignored;
        }
        if self.viewport.is_none() {
            log::error!("Rendering surface lost, frame loop halted");
            return FrameStatus::Halted;
        }
        let Some(session) = self.session.as_mut() else {
            return FrameStatus::Ignored;
        };

        if let Some(autopilot) = &self.autopilot {
            let mut input = session.input.clone();
            autopilot.drive(session, &self.tuning, &mut input);
            session.input = input;
        }

        let frame = FrameContext {
            time_ms: now_ms,
            animate: self.animate,
        };
        self.events.clear();
        let outcome = tick(
            session,
            &self.tuning,
            &frame,
            &mut self.rng,
            canvas,
            &mut self.events,
        );

        let mut status = FrameStatus::Scheduled;
        for event in self.events.drain(..) {
            match event {
                GameEvent::ScoreMilestone { score, coins } => host.on_score_update(score, coins),
                GameEvent::CoinCollected { coins } => host.on_coin_collected(coins),
                GameEvent::Crashed { score, coins } => {
                    self.phase = GamePhase::GameOver;
                    log::info!("Game over: score {}, coins {}", score, coins);
                    host.on_game_over(score, coins);
                    status = FrameStatus::GameOver { score, coins };
                }
            }
        }

        if outcome == TickOutcome::Running {
            self.request_next(scheduler);
        }
        status
    }

    /// Host-driven reset: drop the session and any pending frame
    pub fn return_to_menu<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        self.cancel_pending(scheduler);
        self.session = None;
        self.phase = GamePhase::Menu;
    }

    pub fn key_event(&mut self, control: Control, pressed: bool) {
        if let Some(session) = self.session.as_mut() {
            session.input.set_pressed(control, pressed);
        }
    }

    /// Release held keys (focus loss)
    pub fn release_keys(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.input.release_all();
        }
    }

    pub fn touch_start(&mut self, x: f32) {
        if let Some(session) = self.session.as_mut() {
            session.input.touch_start(x);
        }
    }

    pub fn touch_move(&mut self, x: f32) {
        let sensitivity = self.touch_sensitivity;
        if let Some(session) = self.session.as_mut() {
            session.input.touch_move(x, &mut session.car_x, sensitivity);
        }
    }

    pub fn touch_end(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.input.touch_end();
        }
    }

    pub fn set_touch_sensitivity(&mut self, sensitivity: f32) {
        if sensitivity.is_finite() {
            self.touch_sensitivity = sensitivity;
        }
    }

    /// Freeze time-driven animation (coin spin, curb bands)
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.animate = !reduced;
    }

    pub fn set_autopilot(&mut self, autopilot: Option<Autopilot>) {
        if autopilot.is_none() {
            self.release_keys();
        }
        self.autopilot = autopilot;
    }

    pub fn autopilot_enabled(&self) -> bool {
        self.autopilot.is_some()
    }

    fn request_next<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> FrameTicket {
        self.next_ticket += 1;
        let ticket = FrameTicket(self.next_ticket);
        self.pending = Some(ticket);
        scheduler.request_frame(ticket);
        ticket
    }

    fn cancel_pending<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(ticket) = self.pending.take() {
            scheduler.cancel_frame(ticket);
        }
    }
}
