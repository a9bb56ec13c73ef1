//! Simulation state and core types
//!
//! A `SimulationState` lives for exactly one play session. It is rebuilt from
//! scratch by [`SimulationState::new`] every time the game enters `Playing`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::input::InputState;
use crate::renderer::colors;
use crate::tuning::Tuning;

/// Phase of the game, owned by the host and mirrored by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Menu / name entry, engine inert
    #[default]
    Menu,
    /// Tick loop running
    Playing,
    /// Crashed, waiting for the host to return to the menu
    GameOver,
}

/// Events produced by a tick, dispatched to the host by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Floored score crossed a multiple of the score interval
    ScoreMilestone { score: u32, coins: u32 },
    /// A coin was picked up (`coins` is the new total)
    CoinCollected { coins: u32 },
    /// The car hit an obstacle; the session is over
    Crashed { score: u32, coins: u32 },
}

/// Road object variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Obstacle,
    Coin,
    Scenery,
}

/// Something on or beside the road
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadObject {
    /// Lane coordinate (0 = road center, ±2 = road edges)
    pub x: f32,
    /// Depth coordinate, increases toward the viewer (screen pixels)
    pub y: f32,
    /// Base width at perspective 1.0
    pub width: f32,
    /// Base height at perspective 1.0
    pub height: f32,
    pub color: [f32; 4],
    pub kind: ObjectKind,
    /// Lit-window bitmask (scenery only)
    #[serde(default)]
    pub lights: u32,
}

impl RoadObject {
    pub fn obstacle<R: Rng>(x: f32, y: f32, tuning: &Tuning, rng: &mut R) -> Self {
        let color = colors::OBSTACLE_PALETTE[rng.random_range(0..colors::OBSTACLE_PALETTE.len())];
        Self {
            x,
            y,
            width: tuning.obstacle_size[0],
            height: tuning.obstacle_size[1],
            color,
            kind: ObjectKind::Obstacle,
            lights: 0,
        }
    }

    pub fn coin(x: f32, y: f32, tuning: &Tuning) -> Self {
        Self {
            x,
            y,
            width: tuning.coin_size[0],
            height: tuning.coin_size[1],
            color: colors::COIN,
            kind: ObjectKind::Coin,
            lights: 0,
        }
    }

    /// Roadside building on the given side (-1 left, +1 right)
    pub fn scenery<R: Rng>(side: f32, y: f32, tuning: &Tuning, rng: &mut R) -> Self {
        let x = side * rng.random_range(2.6..3.4);
        let color = colors::SCENERY_PALETTE[rng.random_range(0..colors::SCENERY_PALETTE.len())];
        Self {
            x,
            y,
            width: tuning.scenery_size[0],
            height: tuning.scenery_size[1],
            color,
            kind: ObjectKind::Scenery,
            lights: rng.random(),
        }
    }
}

/// A road-line marker (center dash plus curbs), recycled at the bottom edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadLine {
    pub y: f32,
}

/// Drawing surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }
}

/// Complete per-session simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub viewport: Viewport,
    /// Screen Y of the horizon, fixed for the session
    pub horizon_y: f32,
    /// Player lateral position (lane units)
    pub car_x: f32,
    /// Signed horizontal bend of the road at the horizon (pixels)
    pub curvature: f32,
    /// Current curve target direction (-1, 0 or 1)
    pub curve_direction: f32,
    /// Ticks until the next curve retarget
    pub curve_timer: u32,
    pub score: f64,
    pub coins: u32,
    /// Scroll rate (depth units per tick)
    pub speed: f32,
    pub obstacles: Vec<RoadObject>,
    pub coin_pickups: Vec<RoadObject>,
    pub scenery: Vec<RoadObject>,
    pub road_lines: Vec<RoadLine>,
    pub input: InputState,
    /// Ticks simulated this session
    pub time_ticks: u64,
    /// Last score milestone reported to the host (floored score / interval)
    pub last_milestone: u32,
}

impl SimulationState {
    /// Build a fresh session for the given viewport
    pub fn new<R: Rng>(viewport: Viewport, tuning: &Tuning, rng: &mut R) -> Self {
        let horizon_y = viewport.height * tuning.horizon_ratio;
        let road_depth = viewport.height - horizon_y;

        let line_count = tuning.road_line_count.max(1);
        let spacing = road_depth / line_count as f32;
        let road_lines = (0..line_count)
            .map(|i| RoadLine {
                y: horizon_y + i as f32 * spacing,
            })
            .collect();

        let scenery = (0..tuning.scenery_count)
            .map(|i| {
                let side = if i % 2 == 0 { -1.0 } else { 1.0 };
                let y = horizon_y + rng.random::<f32>() * road_depth;
                RoadObject::scenery(side, y, tuning, rng)
            })
            .collect();

        Self {
            viewport,
            horizon_y,
            car_x: 0.0,
            curvature: 0.0,
            curve_direction: 0.0,
            curve_timer: tuning.curve_min_ticks,
            score: 0.0,
            coins: 0,
            speed: tuning.base_speed,
            obstacles: Vec::new(),
            coin_pickups: Vec::new(),
            scenery,
            road_lines,
            input: InputState::default(),
            time_ticks: 0,
            last_milestone: 0,
        }
    }

    /// Score as reported to the host
    pub fn floored_score(&self) -> u32 {
        self.score.max(0.0).floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_session_layout() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let state = SimulationState::new(Viewport::new(800.0, 600.0), &tuning, &mut rng);

        assert_eq!(state.horizon_y, 240.0);
        assert_eq!(state.road_lines.len(), 12);
        assert_eq!(state.scenery.len(), tuning.scenery_count);
        assert!(state.obstacles.is_empty());
        assert!(state.coin_pickups.is_empty());
        assert_eq!(state.car_x, 0.0);
        assert_eq!(state.curvature, 0.0);
        assert_eq!(state.speed, tuning.base_speed);

        // Evenly spaced from the horizon down
        let spacing = state.road_lines[1].y - state.road_lines[0].y;
        assert!((spacing - 30.0).abs() < 1e-4);
        assert_eq!(state.road_lines[0].y, state.horizon_y);
    }

    #[test]
    fn test_scenery_on_both_roadsides() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let state = SimulationState::new(Viewport::new(800.0, 600.0), &tuning, &mut rng);

        assert!(state.scenery.iter().any(|s| s.x < -2.0));
        assert!(state.scenery.iter().any(|s| s.x > 2.0));
        for s in &state.scenery {
            assert_eq!(s.kind, ObjectKind::Scenery);
            assert!(s.y >= state.horizon_y && s.y <= 600.0);
        }
    }

    #[test]
    fn test_sessions_do_not_share_state() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut first = SimulationState::new(Viewport::new(800.0, 600.0), &tuning, &mut rng);
        first.score = 99.0;
        first.car_x = 1.5;
        first.obstacles.push(RoadObject::coin(0.0, 300.0, &tuning));

        let second = SimulationState::new(Viewport::new(800.0, 600.0), &tuning, &mut rng);
        assert_eq!(second.score, 0.0);
        assert_eq!(second.car_x, 0.0);
        assert!(second.obstacles.is_empty());
    }
}
