//! Full sessions driven through the public engine API

use lane_rush::engine::{EngineError, FrameStatus, GameHost, GameLoopEngine};
use lane_rush::highscores::Leaderboard;
use lane_rush::persistence::MemoryStore;
use lane_rush::renderer::ShapeBatch;
use lane_rush::scheduler::{FrameScheduler, StepScheduler};
use lane_rush::sim::{Autopilot, Control, GamePhase, RoadObject};
use lane_rush::tuning::Tuning;
use rand::SeedableRng;
use rand_pcg::Pcg32;

#[derive(Default)]
struct Recorder {
    updates: Vec<(u32, u32)>,
    game_overs: Vec<(u32, u32)>,
}

impl GameHost for Recorder {
    fn on_score_update(&mut self, score: u32, coins: u32) {
        self.updates.push((score, coins));
    }

    fn on_game_over(&mut self, score: u32, coins: u32) {
        self.game_overs.push((score, coins));
    }
}

fn quiet_engine(seed: u64) -> GameLoopEngine {
    let mut engine = GameLoopEngine::with_seed(Tuning::default().without_spawns(), seed);
    engine.set_viewport(800.0, 600.0);
    engine
}

#[test]
fn test_quiet_road_scores_every_interval() {
    let mut engine = quiet_engine(1);
    let mut scheduler = StepScheduler::new();
    let mut host = Recorder::default();
    engine.start_session(&mut scheduler).unwrap();

    let status = scheduler.run(&mut engine, &mut ShapeBatch::new(), &mut host, 1005);

    assert_eq!(status, Some(FrameStatus::Scheduled));
    assert_eq!(engine.phase(), GamePhase::Playing);
    let session = engine.session().unwrap();
    assert!((session.score - 100.5).abs() < 1e-6);
    let scores: Vec<u32> = host.updates.iter().map(|(s, _)| *s).collect();
    assert_eq!(scores, (1..=10).map(|i| i * 10).collect::<Vec<_>>());
    assert!(host.game_overs.is_empty());
}

#[test]
fn test_crash_stops_the_loop() {
    let mut engine = quiet_engine(2);
    let mut scheduler = StepScheduler::new();
    let mut host = Recorder::default();
    engine.start_session(&mut scheduler).unwrap();

    // Obstacle dead ahead, a few frames away
    let tuning = engine.tuning().clone();
    let session = engine.session_mut().unwrap();
    let depth = session.viewport.height - tuning.car_bottom_offset - 5.0 * session.speed;
    let obstacle = RoadObject::obstacle(0.0, depth, &tuning, &mut Pcg32::seed_from_u64(9));
    session.obstacles.push(obstacle);

    let status = scheduler.run(&mut engine, &mut ShapeBatch::new(), &mut host, 100);

    assert!(matches!(status, Some(FrameStatus::GameOver { .. })));
    assert_eq!(engine.phase(), GamePhase::GameOver);
    assert_eq!(host.game_overs.len(), 1);
    assert!(scheduler.pending().is_none());
    assert!(scheduler.frames() < 10);
}

#[test]
fn test_restart_from_game_over() {
    let mut engine = quiet_engine(3);
    let mut scheduler = StepScheduler::new();
    let mut host = Recorder::default();
    engine.start_session(&mut scheduler).unwrap();
    scheduler.run(&mut engine, &mut ShapeBatch::new(), &mut host, 50);

    engine.return_to_menu(&mut scheduler);
    assert_eq!(engine.phase(), GamePhase::Menu);
    assert!(scheduler.pending().is_none());

    engine.start_session(&mut scheduler).unwrap();
    assert_eq!(engine.session().unwrap().time_ticks, 0);
    assert!(scheduler.pending().is_some());
}

#[test]
fn test_no_surface_never_schedules() {
    let mut engine = GameLoopEngine::with_seed(Tuning::default(), 4);
    let mut scheduler = StepScheduler::new();
    assert_eq!(
        engine.start_session(&mut scheduler),
        Err(EngineError::NoSurface)
    );
    let status = scheduler.run(&mut engine, &mut ShapeBatch::new(), &mut Recorder::default(), 10);
    assert_eq!(status, None);
}

#[test]
fn test_held_key_steers_until_released() {
    let mut engine = quiet_engine(5);
    let mut scheduler = StepScheduler::new();
    let mut host = Recorder::default();
    let mut canvas = ShapeBatch::new();
    engine.start_session(&mut scheduler).unwrap();

    engine.key_event(Control::Right, true);
    scheduler.run(&mut engine, &mut canvas, &mut host, 10);
    let moved = engine.session().unwrap().car_x;
    assert!(moved > 0.4);

    engine.key_event(Control::Right, false);
    scheduler.run(&mut engine, &mut canvas, &mut host, 10);
    let after = engine.session().unwrap().car_x;
    // Only the curve drift remains
    assert!((after - moved).abs() < 0.01);
}

#[test]
fn test_cancelled_frame_is_never_delivered() {
    let mut engine = quiet_engine(6);
    let mut scheduler = StepScheduler::new();
    let ticket = engine.start_session(&mut scheduler).unwrap();
    scheduler.cancel_frame(ticket);

    let status = scheduler.run(&mut engine, &mut ShapeBatch::new(), &mut Recorder::default(), 5);
    assert_eq!(status, None);
    assert_eq!(engine.session().unwrap().time_ticks, 0);
}

#[test]
fn test_autopilot_demo_records_result() {
    let mut engine = GameLoopEngine::with_seed(Tuning::default(), 7);
    engine.set_viewport(800.0, 600.0);
    engine.set_autopilot(Some(Autopilot::default()));
    let mut scheduler = StepScheduler::new();
    let mut host = Recorder::default();
    engine.start_session(&mut scheduler).unwrap();

    scheduler.run(&mut engine, &mut ShapeBatch::new(), &mut host, 3_000);

    let score = host
        .game_overs
        .first()
        .map(|(s, _)| *s)
        .unwrap_or_else(|| engine.session().unwrap().floored_score());
    let mut board = Leaderboard::new(MemoryStore::new());
    let entries = board.add_score("demo", score);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "DEMO");
    assert!(host.game_overs.len() <= 1);
}

#[test]
fn test_unusable_tuning_is_repaired() {
    let tuning = Tuning {
        max_lateral: f32::NAN,
        base_speed: 0.0,
        ..Tuning::default()
    };
    let mut engine = GameLoopEngine::with_seed(tuning, 8);
    engine.set_viewport(800.0, 600.0);
    let mut scheduler = StepScheduler::new();
    engine.start_session(&mut scheduler).unwrap();
    engine.key_event(Control::Left, true);

    scheduler.run(&mut engine, &mut ShapeBatch::new(), &mut Recorder::default(), 600);

    let session = engine.session().unwrap();
    assert!(session.speed > 0.0);
    assert!(session.car_x.is_finite());
    assert!(session.car_x >= -Tuning::default().max_lateral - 0.1);
    assert!(session.coin_pickups.len() < 50);
}
