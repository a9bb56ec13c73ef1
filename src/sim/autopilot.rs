//! Demo-mode driver
//!
//! Looks at what is coming down the road in lane coordinates and decides
//! which steering key to hold: dodge the nearest obstacle in its path,
//! otherwise chase the nearest coin.

use super::input::{Control, InputState};
use super::state::SimulationState;
use crate::tuning::Tuning;

/// Lane distance at which an obstacle counts as being in the car's path
const DANGER_WIDTH: f32 = 0.7;
/// Lateral clearance to aim for when passing an obstacle
const DODGE_CLEARANCE: f32 = 0.9;

#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// How far ahead of the car (pixels of depth) to react
    pub look_ahead: f32,
    /// Lane error tolerated before steering
    pub dead_zone: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            look_ahead: 160.0,
            dead_zone: 0.06,
        }
    }
}

impl Autopilot {
    /// Lane the car should head for this tick, if any
    pub fn target_lane(&self, state: &SimulationState, tuning: &Tuning) -> Option<f32> {
        let car_y = state.viewport.height - tuning.car_bottom_offset;
        let window = (car_y - self.look_ahead)..=(car_y + tuning.obstacle_band);
        let car_x = state.car_x;

        // Nearest (deepest) obstacle in the lane window
        let threat = state
            .obstacles
            .iter()
            .filter(|o| window.contains(&o.y) && (o.x - car_x).abs() < DANGER_WIDTH)
            .max_by(|a, b| a.y.total_cmp(&b.y));

        if let Some(obstacle) = threat {
            let limit = tuning.max_lateral;
            let escape = [obstacle.x - DODGE_CLEARANCE, obstacle.x + DODGE_CLEARANCE]
                .into_iter()
                .filter(|lane| lane.abs() <= limit)
                .min_by(|a, b| (a - car_x).abs().total_cmp(&(b - car_x).abs()));
            return Some(escape.unwrap_or(if obstacle.x > 0.0 { -limit } else { limit }));
        }

        state
            .coin_pickups
            .iter()
            .filter(|c| window.contains(&c.y))
            .max_by(|a, b| a.y.total_cmp(&b.y))
            .map(|coin| coin.x.clamp(-tuning.max_lateral, tuning.max_lateral))
    }

    /// Hold the steering keys that move the car toward the target lane
    pub fn drive(&self, state: &SimulationState, tuning: &Tuning, input: &mut InputState) {
        input.release_all();
        let Some(target) = self.target_lane(state, tuning) else {
            return;
        };
        let error = target - state.car_x;
        if error > self.dead_zone {
            input.set_pressed(Control::Right, true);
        } else if error < -self.dead_zone {
            input.set_pressed(Control::Left, true);
        }
    }
}
