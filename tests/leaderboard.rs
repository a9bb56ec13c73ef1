//! Leaderboard contract against an in-memory store

use lane_rush::consts::{LEADERBOARD_KEY, MAX_NAME_LEN, PLACEHOLDER_NAME};
use lane_rush::highscores::{Leaderboard, MAX_HIGH_SCORES};
use lane_rush::persistence::{KeyValueStore, MemoryStore};

#[test]
fn test_empty_name_uses_placeholder() {
    let mut board = Leaderboard::new(MemoryStore::new());
    let entries = board.add_score("", 100);
    assert_eq!(entries[0].name, PLACEHOLDER_NAME);
    assert_eq!(entries[0].score, 100);
}

#[test]
fn test_add_then_get_all() {
    let mut board = Leaderboard::new(MemoryStore::new());
    board.add_score("zed", 300);
    board.add_score("amy", 700);
    board.add_score("verylongplayername", 500);

    let all = board.get_all();
    let rows: Vec<(&str, u32)> = all.iter().map(|e| (e.name.as_str(), e.score)).collect();
    assert_eq!(rows, vec![("AMY", 700), ("VERYLONGPL", 500), ("ZED", 300)]);
}

#[test]
fn test_full_board_rejects_low_score() {
    let mut board = Leaderboard::new(MemoryStore::new());
    for i in 1..=MAX_HIGH_SCORES as u32 {
        board.add_score("p", i * 100);
    }
    let before = board.get_all();

    let after = board.add_score("low", 1);
    assert_eq!(after.len(), MAX_HIGH_SCORES);
    assert_eq!(
        after.iter().map(|e| &e.id).collect::<Vec<_>>(),
        before.iter().map(|e| &e.id).collect::<Vec<_>>()
    );
}

#[test]
fn test_ids_are_unique() {
    let mut board = Leaderboard::new(MemoryStore::new());
    for _ in 0..5 {
        board.add_score_at("same", 10, 1_700_000_000_000.0);
    }
    let mut ids: Vec<String> = board.get_all().into_iter().map(|e| e.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

#[test]
fn test_stored_as_json_array() {
    let mut board = Leaderboard::new(MemoryStore::new());
    board.add_score_at("ace", 42, 5.0);
    let raw = board.store().get(LEADERBOARD_KEY).unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed[0]["name"], "ACE");
    assert_eq!(parsed[0]["score"], 42);
}

#[test]
fn test_expanding_uppercase_stays_within_limit() {
    let mut board = Leaderboard::new(MemoryStore::new());
    board.add_score(&"ß".repeat(10), 20);
    board.add_score(&"\u{FB03}".repeat(10), 10);

    for entry in board.get_all() {
        assert!(entry.name.chars().count() <= MAX_NAME_LEN, "{}", entry.name);
    }
    let names: Vec<String> = board.get_all().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["SSSSSSSSSS", "FFIFFIFFIF"]);
}
