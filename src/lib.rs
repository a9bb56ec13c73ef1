//! Lane Rush - An endless pseudo-3D arcade driving game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (projection, spawning, collisions, scoring)
//! - `engine`: Session lifecycle and the rescheduled frame callback
//! - `scheduler`: Frame scheduling abstraction (headless fixed-step runner)
//! - `renderer`: Canvas trait, CPU tessellation and the WebGPU pipeline
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Key-value storage backends
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod engine;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use engine::{EngineError, FrameStatus, FrameTicket, GameHost, GameLoopEngine};
pub use highscores::{Leaderboard, ScoreEntry};
pub use scheduler::{FrameScheduler, StepScheduler};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal display refresh used by the headless scheduler (ms per frame)
    pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

    /// Storage key for the leaderboard
    pub const LEADERBOARD_KEY: &str = "lane_rush_highscores";
    /// Storage key for player settings
    pub const SETTINGS_KEY: &str = "lane_rush_settings";

    /// Longest display name kept on the leaderboard (characters)
    pub const MAX_NAME_LEN: usize = 10;
    /// Name stored when the player leaves the field empty
    pub const PLACEHOLDER_NAME: &str = "PLAYER";
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
