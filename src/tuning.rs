//! Data-driven game balance
//!
//! Every gameplay constant lives here so tests can pin behavior (e.g. zero
//! spawn chances) and the native binary can load overrides from JSON.

use serde::{Deserialize, Serialize};

/// Gameplay tuning knobs. Distances are in pixels, rates are per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Road geometry ===
    /// Horizon line as a fraction of viewport height
    pub horizon_ratio: f32,
    /// Road width at the horizon as a fraction of viewport width
    pub road_top_ratio: f32,
    /// Road width at the bottom edge as a fraction of viewport width
    pub road_bottom_ratio: f32,
    /// Lane coordinate to road-width multiplier
    pub lane_scale: f32,
    /// Number of recycled road-line markers
    pub road_line_count: usize,
    /// Number of recycled roadside scenery objects
    pub scenery_count: usize,

    // === Motion ===
    /// Scroll rate (depth units per tick)
    pub base_speed: f32,
    /// Lateral limit for the player car (lane units)
    pub max_lateral: f32,
    /// Lateral step per tick while a steering key is held
    pub steer_step: f32,

    // === Spawning / cleanup ===
    pub obstacle_spawn_chance: f64,
    pub coin_spawn_chance: f64,
    pub max_obstacles: usize,
    /// How far behind the horizon new objects appear
    pub spawn_depth_offset: f32,
    /// Obstacles and coins are dropped this far past the bottom edge
    pub despawn_margin: f32,
    /// Scenery is recycled this far past the bottom edge
    pub scenery_recycle_margin: f32,
    /// Random depth spread for recycled scenery
    pub scenery_respawn_spread: f32,

    // === Collision ===
    /// Vertical band (± pixels) for obstacle hits
    pub obstacle_band: f32,
    /// Vertical band (± pixels) for coin pickups
    pub coin_band: f32,
    /// Inward padding on each side of the car for obstacle hits
    pub hitbox_padding: f32,

    // === Scoring ===
    pub score_per_tick: f64,
    pub coin_bonus: f64,
    /// Score update callback fires every time the floored score crosses a multiple of this
    pub score_interval: u32,

    // === Curvature ===
    pub curve_amplitude: f32,
    /// Fraction of the remaining distance to the target covered per tick
    pub curve_easing: f32,
    pub curve_min_ticks: u32,
    pub curve_max_ticks: u32,
    /// Lateral drift per tick per pixel of curvature
    pub centrifugal: f32,

    // === Sizes ===
    pub car_width: f32,
    pub car_height: f32,
    /// Distance from the bottom edge to the top of the player car
    pub car_bottom_offset: f32,
    pub obstacle_size: [f32; 2],
    pub coin_size: [f32; 2],
    pub scenery_size: [f32; 2],
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            horizon_ratio: 0.4,
            road_top_ratio: 0.1,
            road_bottom_ratio: 0.9,
            lane_scale: 0.25,
            road_line_count: 12,
            scenery_count: 10,

            base_speed: 6.0,
            max_lateral: 1.8,
            steer_step: 0.05,

            obstacle_spawn_chance: 0.02,
            coin_spawn_chance: 0.015,
            max_obstacles: 5,
            spawn_depth_offset: 20.0,
            despawn_margin: 100.0,
            scenery_recycle_margin: 200.0,
            scenery_respawn_spread: 150.0,

            obstacle_band: 20.0,
            coin_band: 30.0,
            hitbox_padding: 10.0,

            score_per_tick: 0.1,
            coin_bonus: 5.0,
            score_interval: 10,

            curve_amplitude: 150.0,
            curve_easing: 0.02,
            curve_min_ticks: 120,
            curve_max_ticks: 300,
            centrifugal: 0.0001,

            car_width: 50.0,
            car_height: 80.0,
            car_bottom_offset: 130.0,
            obstacle_size: [70.0, 55.0],
            coin_size: [36.0, 36.0],
            scenery_size: [90.0, 140.0],
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Clamp values into ranges the tick step can rely on
    pub fn sanitized(mut self) -> Self {
        let defaults = Tuning::default();

        // Non-finite floats fall back to their defaults
        macro_rules! finite_or_default {
            ($($field:ident),* $(,)?) => {
                $(
                    if !self.$field.is_finite() {
                        self.$field = defaults.$field;
                    }
                )*
            };
        }
        finite_or_default!(
            horizon_ratio,
            road_top_ratio,
            road_bottom_ratio,
            lane_scale,
            base_speed,
            max_lateral,
            steer_step,
            obstacle_spawn_chance,
            coin_spawn_chance,
            spawn_depth_offset,
            despawn_margin,
            scenery_recycle_margin,
            scenery_respawn_spread,
            obstacle_band,
            coin_band,
            hitbox_padding,
            score_per_tick,
            coin_bonus,
            curve_amplitude,
            curve_easing,
            centrifugal,
            car_width,
            car_height,
            car_bottom_offset,
        );
        for (size, default) in [
            (&mut self.obstacle_size, defaults.obstacle_size),
            (&mut self.coin_size, defaults.coin_size),
            (&mut self.scenery_size, defaults.scenery_size),
        ] {
            if !size.iter().all(|v| v.is_finite() && *v >= 0.0) {
                *size = default;
            }
        }

        // Objects must keep scrolling toward the viewer or cleanup never runs
        if self.base_speed <= 0.0 {
            self.base_speed = defaults.base_speed;
        }
        self.score_per_tick = self.score_per_tick.max(0.0);
        self.coin_bonus = self.coin_bonus.max(0.0);
        self.steer_step = self.steer_step.abs();
        self.despawn_margin = self.despawn_margin.max(0.0);
        self.scenery_recycle_margin = self.scenery_recycle_margin.max(0.0);
        self.scenery_respawn_spread = self.scenery_respawn_spread.max(0.0);
        self.obstacle_band = self.obstacle_band.max(0.0);
        self.coin_band = self.coin_band.max(0.0);

        self.obstacle_spawn_chance = self.obstacle_spawn_chance.clamp(0.0, 1.0);
        self.coin_spawn_chance = self.coin_spawn_chance.clamp(0.0, 1.0);
        self.horizon_ratio = self.horizon_ratio.clamp(0.05, 0.95);
        self.curve_easing = self.curve_easing.clamp(0.0, 1.0);
        self.road_line_count = self.road_line_count.max(1);
        self.score_interval = self.score_interval.max(1);
        self.curve_min_ticks = self.curve_min_ticks.max(1);
        if self.curve_max_ticks < self.curve_min_ticks {
            self.curve_max_ticks = self.curve_min_ticks;
        }
        self.max_lateral = self.max_lateral.abs();
        self
    }

    /// Tuning with both spawn chances forced to zero (empty road)
    pub fn without_spawns(mut self) -> Self {
        self.obstacle_spawn_chance = 0.0;
        self.coin_spawn_chance = 0.0;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "base_speed": 9.0, "max_obstacles": 2 }"#).unwrap();
        assert_eq!(tuning.base_speed, 9.0);
        assert_eq!(tuning.max_obstacles, 2);
        assert_eq!(tuning.road_line_count, Tuning::default().road_line_count);
    }

    #[test]
    fn test_sanitize_clamps_probabilities() {
        let tuning = Tuning::from_json(
            r#"{ "obstacle_spawn_chance": 3.0, "coin_spawn_chance": -1.0, "curve_min_ticks": 50, "curve_max_ticks": 10 }"#,
        )
        .unwrap();
        assert_eq!(tuning.obstacle_spawn_chance, 1.0);
        assert_eq!(tuning.coin_spawn_chance, 0.0);
        assert_eq!(tuning.curve_max_ticks, 50);
    }

    #[test]
    fn test_sanitize_repairs_unusable_values() {
        let tuning = Tuning {
            max_lateral: f32::NAN,
            base_speed: 0.0,
            score_per_tick: -1.0,
            coin_bonus: -5.0,
            curve_easing: f32::INFINITY,
            coin_size: [f32::NAN, 10.0],
            ..Tuning::default()
        }
        .sanitized();
        let defaults = Tuning::default();

        assert_eq!(tuning.max_lateral, defaults.max_lateral);
        assert_eq!(tuning.base_speed, defaults.base_speed);
        assert_eq!(tuning.score_per_tick, 0.0);
        assert_eq!(tuning.coin_bonus, 0.0);
        assert_eq!(tuning.curve_easing, defaults.curve_easing);
        assert_eq!(tuning.coin_size, defaults.coin_size);

        let reversed = Tuning {
            base_speed: -3.0,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(reversed.base_speed, defaults.base_speed);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }
}
