//! Per-frame simulation tick
//!
//! One call advances the session by a single animation frame and paints it.
//! The order of effects matters: objects are drawn before spawning and
//! collision, and an obstacle hit ends the tick before coins, steering,
//! curvature or scoring are touched.

use rand::Rng;

use super::collision::{self, ScreenBox};
use super::projection::Projector;
use super::state::{GameEvent, RoadObject, SimulationState};
use crate::renderer::{Canvas, scene};
use crate::tuning::Tuning;

/// Lane range for spawned obstacles and coins
const SPAWN_LANE_RANGE: f32 = 2.0;

/// Per-frame values that come from outside the simulation
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Wall-clock time in ms (drives coin spin and curb animation)
    pub time_ms: f64,
    /// False when reduced motion is requested
    pub animate: bool,
}

impl FrameContext {
    pub fn new(time_ms: f64) -> Self {
        Self {
            time_ms,
            animate: true,
        }
    }
}

/// Result of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// The car hit an obstacle; nothing after collision ran this tick
    Crashed,
}

/// Advance the session by one frame and render it to `canvas`
pub fn tick<R: Rng, C: Canvas + ?Sized>(
    state: &mut SimulationState,
    tuning: &Tuning,
    frame: &FrameContext,
    rng: &mut R,
    canvas: &mut C,
    events: &mut Vec<GameEvent>,
) -> TickOutcome {
    state.time_ticks += 1;
    let projector = Projector::new(state, tuning);

    // Backdrop and road surface
    scene::draw_backdrop(canvas, &projector);
    scene::draw_road(canvas, &projector);

    // Road-line markers
    advance_road_lines(state);
    for line in &state.road_lines {
        scene::draw_road_line(canvas, &projector, line, frame.time_ms, frame.animate);
    }

    // Scroll everything toward the viewer, then paint back-to-front
    advance_objects(state);
    for object in draw_order(state) {
        if let Some(projected) = projector.project(object) {
            scene::draw_object(canvas, object, &projected, frame.time_ms, frame.animate);
        }
    }

    let car = player_box(state, &projector, tuning);
    scene::draw_player(canvas, &car);

    spawn_objects(state, tuning, rng);
    cleanup_objects(state, tuning, rng);

    if detect_crash(state, &projector, &car, tuning) {
        events.push(GameEvent::Crashed {
            score: state.floored_score(),
            coins: state.coins,
        });
        return TickOutcome::Crashed;
    }

    collect_coins(state, &projector, &car, tuning, events);
    apply_steering(state, tuning);
    update_curvature(state, tuning, rng);
    accrue_score(state, tuning, events);

    TickOutcome::Running
}

/// Move markers toward the viewer, wrapping past the bottom edge back to the horizon
fn advance_road_lines(state: &mut SimulationState) {
    let bottom = state.viewport.height;
    let span = bottom - state.horizon_y;
    let speed = state.speed;
    for line in &mut state.road_lines {
        line.y += speed;
        if span > 0.0 {
            while line.y > bottom {
                line.y -= span;
            }
        }
    }
}

fn advance_objects(state: &mut SimulationState) {
    let speed = state.speed;
    for object in state
        .obstacles
        .iter_mut()
        .chain(state.coin_pickups.iter_mut())
        .chain(state.scenery.iter_mut())
    {
        object.y += speed;
    }
}

/// All road objects sorted far-to-near (painter's algorithm)
pub fn draw_order(state: &SimulationState) -> Vec<&RoadObject> {
    let mut objects: Vec<&RoadObject> = state
        .obstacles
        .iter()
        .chain(&state.coin_pickups)
        .chain(&state.scenery)
        .collect();
    objects.sort_by(|a, b| a.y.total_cmp(&b.y));
    objects
}

/// Clamp the car and compute its screen box for this tick
pub fn player_box(state: &mut SimulationState, projector: &Projector, tuning: &Tuning) -> ScreenBox {
    state.car_x = state.car_x.clamp(-tuning.max_lateral, tuning.max_lateral);
    let center = projector.viewport.center_x()
        + state.car_x * projector.base_road_width() * projector.lane_scale();
    ScreenBox::new(
        center - tuning.car_width / 2.0,
        state.viewport.height - tuning.car_bottom_offset,
        tuning.car_width,
        tuning.car_height,
    )
}

/// Roll for a new obstacle (under the cap) and a new coin just behind the horizon
pub fn spawn_objects<R: Rng>(state: &mut SimulationState, tuning: &Tuning, rng: &mut R) {
    let spawn_y = state.horizon_y - tuning.spawn_depth_offset;

    if state.obstacles.len() < tuning.max_obstacles
        && rng.random::<f64>() < tuning.obstacle_spawn_chance
    {
        let x = rng.random_range(-SPAWN_LANE_RANGE..=SPAWN_LANE_RANGE);
        state
            .obstacles
            .push(RoadObject::obstacle(x, spawn_y, tuning, rng));
    }

    if rng.random::<f64>() < tuning.coin_spawn_chance {
        let x = rng.random_range(-SPAWN_LANE_RANGE..=SPAWN_LANE_RANGE);
        state.coin_pickups.push(RoadObject::coin(x, spawn_y, tuning));
    }
}

/// Drop passed obstacles/coins; send passed scenery back behind the horizon
pub fn cleanup_objects<R: Rng>(state: &mut SimulationState, tuning: &Tuning, rng: &mut R) {
    let despawn_y = state.viewport.height + tuning.despawn_margin;
    state.obstacles.retain(|o| o.y <= despawn_y);
    state.coin_pickups.retain(|c| c.y <= despawn_y);

    let recycle_y = state.viewport.height + tuning.scenery_recycle_margin;
    let horizon_y = state.horizon_y;
    for item in &mut state.scenery {
        if item.y > recycle_y {
            let side = if item.x < 0.0 { -1.0 } else { 1.0 };
            let y = horizon_y - rng.random::<f32>() * tuning.scenery_respawn_spread;
            *item = RoadObject::scenery(side, y, tuning, rng);
        }
    }
}

fn detect_crash(
    state: &SimulationState,
    projector: &Projector,
    car: &ScreenBox,
    tuning: &Tuning,
) -> bool {
    state.obstacles.iter().any(|obstacle| {
        projector.project(obstacle).is_some_and(|p| {
            collision::obstacle_hit(car, &p, tuning.obstacle_band, tuning.hitbox_padding)
        })
    })
}

/// Pick up every coin touching the car; survivors keep their order
fn collect_coins(
    state: &mut SimulationState,
    projector: &Projector,
    car: &ScreenBox,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) {
    let mut collected = 0u32;
    state.coin_pickups.retain(|coin| {
        let hit = projector
            .project(coin)
            .is_some_and(|p| collision::coin_hit(car, &p, tuning.coin_band));
        if hit {
            collected += 1;
        }
        !hit
    });

    for _ in 0..collected {
        state.coins += 1;
        state.score += tuning.coin_bonus;
        events.push(GameEvent::CoinCollected { coins: state.coins });
    }
}

fn apply_steering(state: &mut SimulationState, tuning: &Tuning) {
    state.car_x += state.input.steer_axis() * tuning.steer_step;
}

/// Retarget on timer expiry, ease toward the target, and drift the car outward
pub fn update_curvature<R: Rng>(state: &mut SimulationState, tuning: &Tuning, rng: &mut R) {
    state.curve_timer = state.curve_timer.saturating_sub(1);
    if state.curve_timer == 0 {
        state.curve_direction = rng.random_range(-1i32..=1) as f32;
        state.curve_timer = rng.random_range(tuning.curve_min_ticks..=tuning.curve_max_ticks);
        log::debug!(
            "Curve retarget: direction {} for {} ticks",
            state.curve_direction,
            state.curve_timer
        );
    }

    let target = state.curve_direction * tuning.curve_amplitude;
    state.curvature += (target - state.curvature) * tuning.curve_easing;
    state.car_x -= state.curvature * tuning.centrifugal;
}

fn accrue_score(state: &mut SimulationState, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    state.score += tuning.score_per_tick;
    let milestone = state.floored_score() / tuning.score_interval.max(1);
    if milestone > state.last_milestone {
        state.last_milestone = milestone;
        events.push(GameEvent::ScoreMilestone {
            score: state.floored_score(),
            coins: state.coins,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::ShapeBatch;
    use crate::sim::input::Control;
    use crate::sim::state::{ObjectKind, Viewport};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(tuning: &Tuning, seed: u64) -> (SimulationState, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = SimulationState::new(Viewport::new(800.0, 600.0), tuning, &mut rng);
        (state, rng)
    }

    fn run(
        state: &mut SimulationState,
        tuning: &Tuning,
        rng: &mut Pcg32,
        ticks: u32,
    ) -> (Vec<GameEvent>, TickOutcome) {
        let mut batch = ShapeBatch::new();
        let mut events = Vec::new();
        let mut outcome = TickOutcome::Running;
        for i in 0..ticks {
            let frame = FrameContext::new(i as f64 * 16.0);
            outcome = tick(state, tuning, &frame, rng, &mut batch, &mut events);
            if outcome == TickOutcome::Crashed {
                break;
            }
        }
        (events, outcome)
    }

    /// Depth that lands exactly on the car's screen Y after one tick
    fn car_depth(state: &SimulationState, tuning: &Tuning) -> f32 {
        state.viewport.height - tuning.car_bottom_offset - state.speed
    }

    #[test]
    fn test_frame_is_painted() {
        let tuning = Tuning::default();
        let (mut state, mut rng) = setup(&tuning, 1);
        let mut batch = ShapeBatch::new();
        let mut events = Vec::new();
        tick(
            &mut state,
            &tuning,
            &FrameContext::new(0.0),
            &mut rng,
            &mut batch,
            &mut events,
        );
        assert!(!batch.is_empty());
        assert_eq!(batch.clear_color(), crate::renderer::colors::SKY);
    }

    #[test]
    fn test_road_lines_wrap_to_horizon() {
        let tuning = Tuning::default().without_spawns();
        let (mut state, mut rng) = setup(&tuning, 2);
        run(&mut state, &tuning, &mut rng, 500);

        assert_eq!(state.road_lines.len(), tuning.road_line_count);
        for line in &state.road_lines {
            assert!(line.y >= state.horizon_y && line.y <= state.viewport.height);
        }
    }

    #[test]
    fn test_spawn_respects_obstacle_cap() {
        let mut tuning = Tuning::default();
        tuning.obstacle_spawn_chance = 1.0;
        tuning.coin_spawn_chance = 1.0;
        let (mut state, mut rng) = setup(&tuning, 3);

        for _ in 0..20 {
            spawn_objects(&mut state, &tuning, &mut rng);
        }
        assert_eq!(state.obstacles.len(), tuning.max_obstacles);
        assert_eq!(state.coin_pickups.len(), 20);
        for o in state.obstacles.iter().chain(&state.coin_pickups) {
            assert!(o.x >= -2.0 && o.x <= 2.0);
            assert!(o.y < state.horizon_y);
        }
    }

    #[test]
    fn test_cleanup_drops_passed_objects_and_recycles_scenery() {
        let tuning = Tuning::default();
        let (mut state, mut rng) = setup(&tuning, 4);
        let bottom = state.viewport.height;

        state.obstacles.push(RoadObject::obstacle(0.0, bottom + 101.0, &tuning, &mut rng));
        state.obstacles.push(RoadObject::obstacle(0.0, bottom + 50.0, &tuning, &mut rng));
        state.coin_pickups.push(RoadObject::coin(0.0, bottom + 150.0, &tuning));
        state.scenery[0].y = bottom + 250.0;
        let left_side = state.scenery[0].x < 0.0;

        cleanup_objects(&mut state, &tuning, &mut rng);

        assert_eq!(state.obstacles.len(), 1);
        assert!(state.coin_pickups.is_empty());
        assert_eq!(state.scenery.len(), tuning.scenery_count);
        assert!(state.scenery[0].y <= state.horizon_y);
        assert_eq!(state.scenery[0].x < 0.0, left_side);
        assert_eq!(state.scenery[0].kind, ObjectKind::Scenery);
    }

    #[test]
    fn test_crash_ends_tick_early() {
        let tuning = Tuning::default().without_spawns();
        let (mut state, mut rng) = setup(&tuning, 5);
        let y = car_depth(&state, &tuning);
        state.obstacles.push(RoadObject::obstacle(0.0, y, &tuning, &mut rng));
        state.coin_pickups.push(RoadObject::coin(0.0, y, &tuning));
        state.input.set_pressed(Control::Right, true);

        let (events, outcome) = run(&mut state, &tuning, &mut rng, 1);

        assert_eq!(outcome, TickOutcome::Crashed);
        assert_eq!(events, vec![GameEvent::Crashed { score: 0, coins: 0 }]);
        // Coins, steering and scoring were skipped
        assert_eq!(state.coins, 0);
        assert_eq!(state.coin_pickups.len(), 1);
        assert_eq!(state.car_x, 0.0);
        assert_eq!(state.score, 0.0);
    }

    #[test]
    fn test_obstacle_in_other_lane_is_harmless() {
        let tuning = Tuning::default().without_spawns();
        let (mut state, mut rng) = setup(&tuning, 6);
        let y = car_depth(&state, &tuning);
        state.obstacles.push(RoadObject::obstacle(1.8, y, &tuning, &mut rng));

        let (_, outcome) = run(&mut state, &tuning, &mut rng, 1);
        assert_eq!(outcome, TickOutcome::Running);
    }

    #[test]
    fn test_multiple_coins_in_one_tick() {
        let tuning = Tuning::default().without_spawns();
        let (mut state, mut rng) = setup(&tuning, 7);
        let y = car_depth(&state, &tuning);
        state.coin_pickups.push(RoadObject::coin(0.0, y, &tuning));
        state.coin_pickups.push(RoadObject::coin(1.8, y, &tuning));
        state.coin_pickups.push(RoadObject::coin(0.05, y - 4.0, &tuning));
        state.coin_pickups.push(RoadObject::coin(-1.8, y, &tuning));

        let (events, _) = run(&mut state, &tuning, &mut rng, 1);

        assert_eq!(state.coins, 2);
        assert!((state.score - (2.0 * tuning.coin_bonus + tuning.score_per_tick)).abs() < 1e-9);
        let lanes: Vec<f32> = state.coin_pickups.iter().map(|c| c.x).collect();
        assert_eq!(lanes, vec![1.8, -1.8]);
        let pickups = events
            .iter()
            .filter(|e| matches!(e, GameEvent::CoinCollected { .. }))
            .count();
        assert_eq!(pickups, 2);
    }

    #[test]
    fn test_score_accrues_per_tick() {
        let tuning = Tuning::default().without_spawns();
        let (mut state, mut rng) = setup(&tuning, 8);

        let (events, outcome) = run(&mut state, &tuning, &mut rng, 1005);

        assert_eq!(outcome, TickOutcome::Running);
        assert!((state.score - 1005.0 * tuning.score_per_tick).abs() < 1e-6);
        let milestones: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ScoreMilestone { score, .. } => Some(*score),
                _ => None,
            })
            .collect();
        assert_eq!(milestones, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    }

    #[test]
    fn test_steering_is_clamped() {
        let tuning = Tuning::default().without_spawns();
        let (mut state, mut rng) = setup(&tuning, 9);
        state.input.set_pressed(Control::Left, true);

        run(&mut state, &tuning, &mut rng, 200);
        let projector = Projector::new(&state, &tuning);
        player_box(&mut state, &projector, &tuning);
        assert!(state.car_x >= -tuning.max_lateral);
        assert!(state.car_x < -1.5);
    }

    #[test]
    fn test_curvature_eases_toward_target() {
        let tuning = Tuning::default();
        let (mut state, mut rng) = setup(&tuning, 10);
        state.curve_direction = 1.0;
        state.curve_timer = 1_000;

        update_curvature(&mut state, &tuning, &mut rng);
        let expected = tuning.curve_amplitude * tuning.curve_easing;
        assert!((state.curvature - expected).abs() < 1e-4);
        // Centrifugal pull goes against the bend
        assert!(state.car_x < 0.0);
    }

    #[test]
    fn test_curve_retargets_on_expiry() {
        let tuning = Tuning::default();
        let (mut state, mut rng) = setup(&tuning, 11);
        state.curve_timer = 1;

        update_curvature(&mut state, &tuning, &mut rng);
        assert!(state.curve_timer >= tuning.curve_min_ticks);
        assert!(state.curve_timer <= tuning.curve_max_ticks);
        assert!([-1.0, 0.0, 1.0].contains(&state.curve_direction));
    }

    #[test]
    fn test_draw_order_is_back_to_front() {
        let tuning = Tuning::default();
        let (mut state, _) = setup(&tuning, 12);
        state.coin_pickups.push(RoadObject::coin(0.0, 500.0, &tuning));
        state.coin_pickups.push(RoadObject::coin(0.0, 250.0, &tuning));

        let order = draw_order(&state);
        assert_eq!(order.len(), state.scenery.len() + 2);
        assert!(order.windows(2).all(|w| w[0].y <= w[1].y));
    }
}
