//! Pseudo-3D projection
//!
//! Depth is a screen-space Y that grows toward the viewer. Normalizing it
//! between the horizon and the bottom edge gives the perspective factor that
//! scales road width, object size and how much the curve bends the road.

use super::collision::ScreenBox;
use super::state::{RoadObject, SimulationState, Viewport};
use crate::lerp;
use crate::tuning::Tuning;

/// Objects beyond this perspective have already passed the viewer
pub const MAX_PERSPECTIVE: f32 = 1.2;

/// Screen-space placement of a road object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Horizontal center
    pub x: f32,
    /// Top edge (equal to the object's depth)
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub perspective: f32,
}

impl Projected {
    pub fn bounds(&self) -> ScreenBox {
        ScreenBox::new(self.x - self.width / 2.0, self.y, self.width, self.height)
    }
}

/// Snapshot of everything projection depends on for one tick
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    pub viewport: Viewport,
    pub horizon_y: f32,
    pub curvature: f32,
    road_top_ratio: f32,
    road_bottom_ratio: f32,
    lane_scale: f32,
}

impl Projector {
    pub fn new(state: &SimulationState, tuning: &Tuning) -> Self {
        Self {
            viewport: state.viewport,
            horizon_y: state.horizon_y,
            curvature: state.curvature,
            road_top_ratio: tuning.road_top_ratio,
            road_bottom_ratio: tuning.road_bottom_ratio,
            lane_scale: tuning.lane_scale,
        }
    }

    /// Normalized depth: 0 at the horizon, 1 at the bottom edge
    pub fn perspective(&self, depth: f32) -> f32 {
        let span = self.viewport.height - self.horizon_y;
        if span <= 0.0 {
            return 0.0;
        }
        (depth - self.horizon_y) / span
    }

    /// Road width in pixels at a perspective factor
    pub fn road_width_at(&self, perspective: f32) -> f32 {
        self.viewport.width * lerp(self.road_top_ratio, self.road_bottom_ratio, perspective)
    }

    /// Road centerline X at a perspective factor; the curve bends the far road most
    pub fn road_center_at(&self, perspective: f32) -> f32 {
        self.viewport.center_x() + self.curvature * (1.0 - perspective)
    }

    /// Road width at the bottom edge, used to place the player car
    pub fn base_road_width(&self) -> f32 {
        self.viewport.width * self.road_bottom_ratio
    }

    pub fn lane_scale(&self) -> f32 {
        self.lane_scale
    }

    /// Project an object, or `None` when it is behind the horizon or past the viewer
    pub fn project(&self, object: &RoadObject) -> Option<Projected> {
        let perspective = self.perspective(object.y);
        if !(0.0..=MAX_PERSPECTIVE).contains(&perspective) {
            return None;
        }

        let road_width = self.road_width_at(perspective);
        let x = self.viewport.center_x()
            + road_width * object.x * self.lane_scale
            + self.curvature * (1.0 - perspective);

        Some(Projected {
            x,
            y: object.y,
            width: object.width * perspective,
            height: object.height * perspective,
            perspective,
        })
    }
}
