//! Input aggregation
//!
//! Keyboard state is level-triggered and polled once per tick. Touch drags
//! are applied to the car immediately as incremental deltas.

use serde::{Deserialize, Serialize};

/// Logical steering controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Left,
    Right,
}

impl Control {
    /// Map a DOM `KeyboardEvent.key` value to a control
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Control::Left),
            "ArrowRight" | "d" | "D" => Some(Control::Right),
            _ => None,
        }
    }
}

/// Current input state for a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputState {
    left: bool,
    right: bool,
    /// X of the last touch point while a drag is active
    touch_origin: Option<f32>,
}

impl InputState {
    pub fn set_pressed(&mut self, control: Control, pressed: bool) {
        match control {
            Control::Left => self.left = pressed,
            Control::Right => self.right = pressed,
        }
    }

    pub fn is_pressed(&self, control: Control) -> bool {
        match control {
            Control::Left => self.left,
            Control::Right => self.right,
        }
    }

    /// Release every key (e.g. when the window loses focus)
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
    }

    /// Net steering direction from held keys (-1, 0 or 1)
    pub fn steer_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.left {
            axis -= 1.0;
        }
        if self.right {
            axis += 1.0;
        }
        axis
    }

    pub fn touch_start(&mut self, x: f32) {
        self.touch_origin = Some(x);
    }

    /// Apply a drag to `car_x` and rebase the origin. Clamping happens downstream.
    pub fn touch_move(&mut self, x: f32, car_x: &mut f32, sensitivity: f32) {
        if let Some(origin) = self.touch_origin {
            *car_x += (x - origin) * sensitivity;
            self.touch_origin = Some(x);
        }
    }

    pub fn touch_end(&mut self) {
        self.touch_origin = None;
    }

    pub fn touch_origin(&self) -> Option<f32> {
        self.touch_origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Control::from_key("ArrowLeft"), Some(Control::Left));
        assert_eq!(Control::from_key("d"), Some(Control::Right));
        assert_eq!(Control::from_key("Enter"), None);
    }

    #[test]
    fn test_both_keys_cancel_out() {
        let mut input = InputState::default();
        input.set_pressed(Control::Left, true);
        assert_eq!(input.steer_axis(), -1.0);
        input.set_pressed(Control::Right, true);
        assert_eq!(input.steer_axis(), 0.0);
        input.set_pressed(Control::Left, false);
        assert_eq!(input.steer_axis(), 1.0);
    }

    #[test]
    fn test_touch_drag_rebases_origin() {
        let mut input = InputState::default();
        let mut car_x = 0.0;

        // Move without a start is ignored
        input.touch_move(50.0, &mut car_x, 0.01);
        assert_eq!(car_x, 0.0);

        input.touch_start(100.0);
        input.touch_move(150.0, &mut car_x, 0.01);
        assert!((car_x - 0.5).abs() < 1e-6);
        assert_eq!(input.touch_origin(), Some(150.0));

        input.touch_move(130.0, &mut car_x, 0.01);
        assert!((car_x - 0.3).abs() < 1e-6);

        input.touch_end();
        assert_eq!(input.touch_origin(), None);
    }
}
