//! Simulation module
//!
//! All gameplay logic lives here:
//! - Seeded, injectable RNG only
//! - One tick per animation frame
//! - Drawing goes through the `Canvas` trait, never a concrete backend

pub mod autopilot;
pub mod collision;
pub mod input;
pub mod projection;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use collision::ScreenBox;
pub use input::{Control, InputState};
pub use projection::{MAX_PERSPECTIVE, Projected, Projector};
pub use state::{
    GameEvent, GamePhase, ObjectKind, RoadLine, RoadObject, SimulationState, Viewport,
};
pub use tick::{FrameContext, TickOutcome, draw_order, tick};
