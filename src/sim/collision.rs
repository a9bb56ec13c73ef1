//! Collision detection in screen space
//!
//! Hits are resolved on projected boxes: an object must sit inside a vertical
//! band around the car's screen Y, and the horizontal intervals must overlap.
//! Obstacles test against a padded (forgiving) car box, coins against the
//! full box.

use super::projection::Projected;

/// Axis-aligned screen rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Shrink inward by `padding` on the left and right
    pub fn inset_horizontal(&self, padding: f32) -> Self {
        Self::new(
            self.x + padding,
            self.y,
            (self.width - 2.0 * padding).max(0.0),
            self.height,
        )
    }

    /// Open-interval overlap of the horizontal extents
    pub fn overlaps_horizontally(&self, other: &ScreenBox) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }
}

/// Whether `y` lies strictly inside `reference ± band`
#[inline]
pub fn within_band(reference: f32, y: f32, band: f32) -> bool {
    y > reference - band && y < reference + band
}

/// Obstacle hit test against the padded car box
pub fn obstacle_hit(car: &ScreenBox, obstacle: &Projected, band: f32, padding: f32) -> bool {
    within_band(car.y, obstacle.y, band)
        && car
            .inset_horizontal(padding)
            .overlaps_horizontally(&obstacle.bounds())
}

/// Coin pickup test against the full car box
pub fn coin_hit(car: &ScreenBox, coin: &Projected, band: f32) -> bool {
    within_band(car.y, coin.y, band) && car.overlaps_horizontally(&coin.bounds())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projected(x: f32, y: f32, width: f32) -> Projected {
        Projected {
            x,
            y,
            width,
            height: 20.0,
            perspective: 0.6,
        }
    }

    const CAR: ScreenBox = ScreenBox::new(375.0, 470.0, 50.0, 80.0);

    #[test]
    fn test_obstacle_padding_is_forgiving() {
        // Obstacle right edge at 380: overlaps raw box (375..425) but not padded (385..415)
        let grazing = projected(370.0, 470.0, 20.0);
        assert!(!obstacle_hit(&CAR, &grazing, 20.0, 10.0));
        assert!(coin_hit(&CAR, &grazing, 30.0));

        let head_on = projected(400.0, 470.0, 20.0);
        assert!(obstacle_hit(&CAR, &head_on, 20.0, 10.0));
    }

    #[test]
    fn test_no_hit_outside_band() {
        let above = projected(400.0, 449.0, 40.0);
        assert!(!obstacle_hit(&CAR, &above, 20.0, 10.0));
        // The wider coin band still reaches it
        assert!(coin_hit(&CAR, &above, 30.0));

        let edge = projected(400.0, 490.0, 40.0);
        assert!(!obstacle_hit(&CAR, &edge, 20.0, 10.0));
    }

    #[test]
    fn test_inset_never_goes_negative() {
        let narrow = ScreenBox::new(0.0, 0.0, 10.0, 10.0).inset_horizontal(20.0);
        assert_eq!(narrow.width, 0.0);
    }
}
