//! Draw procedures for the road scene
//!
//! Everything here is pure painting: callers decide what is visible and in
//! which order.

use glam::Vec2;

use super::Canvas;
use super::colors::{self, shade};
use crate::sim::collision::ScreenBox;
use crate::sim::projection::{Projected, Projector};
use crate::sim::state::{ObjectKind, RoadLine, RoadObject};

/// Depth span of one curb color band
const CURB_SEGMENT_LENGTH: f32 = 40.0;
/// Milliseconds between curb color flips
const CURB_PHASE_MS: f64 = 150.0;
/// Coin spin rate (radians per ms)
const COIN_SPIN_RATE: f64 = 0.005;

/// Sky and ground bands split at the horizon
pub fn draw_backdrop<C: Canvas + ?Sized>(canvas: &mut C, projector: &Projector) {
    let viewport = projector.viewport;
    let horizon_y = projector.horizon_y;
    canvas.clear(colors::SKY);
    canvas.fill_rect(0.0, 0.0, viewport.width, horizon_y, colors::SKY);
    canvas.fill_rect(
        0.0,
        horizon_y,
        viewport.width,
        viewport.height - horizon_y,
        colors::GROUND,
    );
}

/// Road trapezoid; only the horizon edge is shifted by the curve
pub fn draw_road<C: Canvas + ?Sized>(canvas: &mut C, projector: &Projector) {
    let top_half = projector.road_width_at(0.0) / 2.0;
    let bottom_half = projector.road_width_at(1.0) / 2.0;
    let top_center = projector.viewport.center_x() + projector.curvature;
    let bottom_center = projector.viewport.center_x();
    let bottom = projector.viewport.height;

    canvas.fill_polygon(
        &[
            Vec2::new(top_center - top_half, projector.horizon_y),
            Vec2::new(top_center + top_half, projector.horizon_y),
            Vec2::new(bottom_center + bottom_half, bottom),
            Vec2::new(bottom_center - bottom_half, bottom),
        ],
        colors::ROAD,
    );
}

/// Curb band color from a moving time phase and a depth segment index
pub fn curb_color(depth: f32, time_ms: f64, animate: bool) -> [f32; 4] {
    let segment = (depth / CURB_SEGMENT_LENGTH).floor() as i64;
    let phase = if animate {
        (time_ms / CURB_PHASE_MS).floor() as i64
    } else {
        0
    };
    if (segment + phase).rem_euclid(2) == 0 {
        colors::CURB_RED
    } else {
        colors::CURB_WHITE
    }
}

/// Center dash plus left/right curb pieces for one marker
pub fn draw_road_line<C: Canvas + ?Sized>(
    canvas: &mut C,
    projector: &Projector,
    line: &RoadLine,
    time_ms: f64,
    animate: bool,
) {
    let p = projector.perspective(line.y);
    if !(0.0..=1.0).contains(&p) {
        return;
    }

    let center = projector.road_center_at(p);
    let road_half = projector.road_width_at(p) / 2.0;
    let length = 4.0 + 26.0 * p;

    let dash_width = 2.0 + 6.0 * p;
    canvas.fill_rect(
        center - dash_width / 2.0,
        line.y,
        dash_width,
        length,
        colors::LANE_DASH,
    );

    let curb_width = 2.0 + 14.0 * p;
    let color = curb_color(line.y, time_ms, animate);
    canvas.fill_rect(center - road_half - curb_width, line.y, curb_width, length, color);
    canvas.fill_rect(center + road_half, line.y, curb_width, length, color);
}

/// Dispatch to the per-variant draw procedure
pub fn draw_object<C: Canvas + ?Sized>(
    canvas: &mut C,
    object: &RoadObject,
    projected: &Projected,
    time_ms: f64,
    animate: bool,
) {
    match object.kind {
        ObjectKind::Obstacle => draw_obstacle(canvas, projected, object.color),
        ObjectKind::Coin => draw_coin(canvas, projected, time_ms, animate),
        ObjectKind::Scenery => draw_scenery(canvas, projected, object.color, object.lights),
    }
}

/// Boxy traffic car seen from behind, with tail-lights
fn draw_obstacle<C: Canvas + ?Sized>(canvas: &mut C, p: &Projected, color: [f32; 4]) {
    let left = p.x - p.width / 2.0;
    let (w, h) = (p.width, p.height);

    canvas.fill_rect(left, p.y, w, h, color);
    // Roof / rear window
    canvas.fill_rect(left + w * 0.15, p.y + h * 0.1, w * 0.7, h * 0.35, shade(color, 0.6));
    // Tail-lights
    let light_w = w * 0.18;
    let light_h = h * 0.14;
    let light_y = p.y + h * 0.7;
    canvas.fill_rect(left + w * 0.06, light_y, light_w, light_h, colors::TAIL_LIGHT);
    canvas.fill_rect(
        left + w - w * 0.06 - light_w,
        light_y,
        light_w,
        light_h,
        colors::TAIL_LIGHT,
    );
}

/// Spinning coin: the horizontal radius follows |sin(t)| to fake rotation
fn draw_coin<C: Canvas + ?Sized>(canvas: &mut C, p: &Projected, time_ms: f64, animate: bool) {
    let r = p.width / 2.0;
    let center = Vec2::new(p.x, p.y + p.height / 2.0);
    let spin = if animate {
        (time_ms * COIN_SPIN_RATE).sin().abs() as f32
    } else {
        1.0
    };
    let rx = r * spin.max(0.08);

    canvas.fill_ellipse(center, rx, r, colors::COIN);
    canvas.fill_ellipse(center, rx * 0.75, r * 0.75, shade(colors::COIN, 0.85));

    // Currency glyph, hidden while the coin is edge-on
    if spin > 0.35 {
        let stroke = (r * 0.12).max(1.0);
        let half = rx * 0.35;
        let bar = (r * 0.1).max(1.0);
        canvas.fill_rect(center.x - bar / 2.0, center.y - r * 0.6, bar, r * 1.2, colors::COIN_GLYPH);
        for dy in [-r * 0.4, 0.0, r * 0.4] {
            canvas.fill_rect(
                center.x - half,
                center.y + dy - stroke / 2.0,
                half * 2.0,
                stroke,
                colors::COIN_GLYPH,
            );
        }
        // Upper-left and lower-right uprights turn the strokes into an S
        canvas.fill_rect(center.x - half, center.y - r * 0.4, stroke, r * 0.4, colors::COIN_GLYPH);
        canvas.fill_rect(center.x + half - stroke, center.y, stroke, r * 0.4, colors::COIN_GLYPH);
    }
}

/// Roadside building with a 2x4 grid of windows lit by `lights` bits
fn draw_scenery<C: Canvas + ?Sized>(canvas: &mut C, p: &Projected, color: [f32; 4], lights: u32) {
    let left = p.x - p.width / 2.0;
    let (w, h) = (p.width, p.height);
    canvas.fill_rect(left, p.y, w, h, color);

    let win_w = w * 0.25;
    let win_h = h * 0.12;
    for row in 0..4u32 {
        for col in 0..2u32 {
            let lit = (lights >> (row * 2 + col)) & 1 == 1;
            let window = if lit {
                colors::WINDOW_LIT
            } else {
                colors::WINDOW_DARK
            };
            canvas.fill_rect(
                left + w * 0.15 + col as f32 * w * 0.45,
                p.y + h * 0.1 + row as f32 * h * 0.2,
                win_w,
                win_h,
                window,
            );
        }
    }
}

/// Player car inside its screen box
pub fn draw_player<C: Canvas + ?Sized>(canvas: &mut C, car: &ScreenBox) {
    let (x, y, w, h) = (car.x, car.y, car.width, car.height);

    let wheel_w = w * 0.18;
    let wheel_h = h * 0.22;
    for wy in [y + h * 0.08, y + h * 0.68] {
        canvas.fill_rect(x - wheel_w * 0.5, wy, wheel_w, wheel_h, colors::WHEEL);
        canvas.fill_rect(x + w - wheel_w * 0.5, wy, wheel_w, wheel_h, colors::WHEEL);
    }

    canvas.fill_rect(x, y, w, h, colors::PLAYER_BODY);
    canvas.fill_rect(x + w * 0.15, y + h * 0.2, w * 0.7, h * 0.22, colors::PLAYER_WINDOW);
    canvas.fill_rect(x + w * 0.2, y + h * 0.62, w * 0.6, h * 0.14, colors::PLAYER_WINDOW);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curb_bands_alternate_with_depth() {
        let a = curb_color(0.0, 0.0, true);
        let b = curb_color(CURB_SEGMENT_LENGTH, 0.0, true);
        assert_ne!(a, b);
    }

    #[test]
    fn test_curb_bands_move_with_time() {
        let before = curb_color(10.0, 0.0, true);
        let after = curb_color(10.0, CURB_PHASE_MS, true);
        assert_ne!(before, after);

        // Reduced motion freezes the pattern
        assert_eq!(curb_color(10.0, 0.0, false), curb_color(10.0, CURB_PHASE_MS, false));
    }
}
