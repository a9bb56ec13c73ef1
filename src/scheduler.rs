//! Frame scheduling
//!
//! The engine never loops on its own. After each tick it asks a
//! [`FrameScheduler`] for one more frame, and cancels that request when the
//! session ends. Browsers back this with `requestAnimationFrame`; headless
//! runs use [`StepScheduler`].

use rand::Rng;

use crate::consts::FRAME_INTERVAL_MS;
use crate::engine::{FrameStatus, FrameTicket, GameHost, GameLoopEngine};
use crate::renderer::Canvas;

pub trait FrameScheduler {
    /// Arrange for `run_frame(ticket, ..)` to be called at the next frame
    fn request_frame(&mut self, ticket: FrameTicket);

    /// Withdraw a previously requested frame
    fn cancel_frame(&mut self, ticket: FrameTicket);
}

/// Fixed-step scheduler on a virtual 60 Hz clock
#[derive(Debug, Default)]
pub struct StepScheduler {
    pending: Option<FrameTicket>,
    clock_ms: f64,
    frames: u64,
}

impl StepScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<FrameTicket> {
        self.pending
    }

    /// Virtual time of the next frame (ms)
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Frames delivered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Deliver pending frames until none is requested or `max_frames` have run.
    /// Returns the status of the last frame delivered.
    pub fn run<R, C, H>(
        &mut self,
        engine: &mut GameLoopEngine<R>,
        canvas: &mut C,
        host: &mut H,
        max_frames: u64,
    ) -> Option<FrameStatus>
    where
        R: Rng,
        C: Canvas + ?Sized,
        H: GameHost + ?Sized,
    {
        let mut last = None;
        for _ in 0..max_frames {
            let Some(ticket) = self.pending.take() else {
                break;
            };
            let now = self.clock_ms;
            self.clock_ms += FRAME_INTERVAL_MS;
            self.frames += 1;
            last = Some(engine.run_frame(ticket, now, canvas, host, self));
        }
        last
    }
}

impl FrameScheduler for StepScheduler {
    fn request_frame(&mut self, ticket: FrameTicket) {
        self.pending = Some(ticket);
    }

    fn cancel_frame(&mut self, ticket: FrameTicket) {
        if self.pending == Some(ticket) {
            self.pending = None;
        }
    }
}
