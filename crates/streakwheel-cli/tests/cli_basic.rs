//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command in `home` and return (stdout, stderr, exit code).
fn run_cli(home: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_streakwheel"))
        .args(args)
        .env("STREAKWHEEL_HOME", home.path())
        .env_remove("STREAKWHEEL_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(home: &TempDir, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn run_json(home: &TempDir, args: &[&str]) -> serde_json::Value {
    let stdout = run_ok(home, args);
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

/// Daily habit `id` completed on the seven days ending 2025-03-12.
fn week_long_habit(home: &TempDir, id: &str) {
    run_ok(home, &["habit", "add", id]);
    for day in 6..=12 {
        let date = format!("2025-03-{day:02}");
        run_ok(home, &["habit", "complete", id, "--today", &date]);
    }
}

#[test]
fn test_habit_streak_builds_up() {
    let home = TempDir::new().unwrap();
    week_long_habit(&home, "read");

    let habits = run_json(&home, &["habit", "list", "--json", "--today", "2025-03-12"]);
    assert_eq!(habits[0]["id"], "read");
    assert_eq!(habits[0]["streak"], 7);
}

#[test]
fn test_habit_streak_resets_after_gap() {
    let home = TempDir::new().unwrap();
    week_long_habit(&home, "read");

    let stdout = run_ok(&home, &["habit", "refresh", "--today", "2025-03-15"]);
    assert!(stdout.contains("read"));
    let habits = run_json(&home, &["habit", "list", "--json", "--today", "2025-03-15"]);
    assert_eq!(habits[0]["streak"], 0);
}

#[test]
fn test_weekly_habit_with_target() {
    let home = TempDir::new().unwrap();
    run_ok(&home, &["habit", "add", "gym", "--frequency", "weekly", "--target", "2"]);
    for date in ["2025-03-03", "2025-03-05", "2025-03-10", "2025-03-11"] {
        run_ok(&home, &["habit", "complete", "gym", "--date", date, "--today", "2025-03-12"]);
    }

    let habits = run_json(&home, &["habit", "list", "--json", "--today", "2025-03-12"]);
    assert_eq!(habits[0]["streak"], 2);
}

#[test]
fn test_invalid_frequency_is_rejected() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&home, &["habit", "add", "x", "--frequency", "hourly"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid frequency"));
}

#[test]
fn test_unknown_habit_fails() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&home, &["habit", "complete", "ghost"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown habit: ghost"));
}

#[test]
fn test_bad_today_is_rejected() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&home, &["habit", "list", "--today", "12/03/2025"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid date"));
}

#[test]
fn test_config_get_set() {
    let home = TempDir::new().unwrap();
    assert_eq!(run_ok(&home, &["config", "get", "wheel.cooldown_hours"]).trim(), "24");

    run_ok(&home, &["config", "set", "wheel.cooldown_hours", "6"]);
    assert_eq!(run_ok(&home, &["config", "get", "wheel.cooldown_hours"]).trim(), "6");

    run_ok(&home, &["config", "reset"]);
    assert_eq!(run_ok(&home, &["config", "get", "wheel.cooldown_hours"]).trim(), "24");
}

#[test]
fn test_config_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&home, &["config", "set", "wheel.colour", "red"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown configuration key"));
}

#[test]
fn test_config_list() {
    let home = TempDir::new().unwrap();
    let stdout = run_ok(&home, &["config", "list"]);
    assert!(stdout.contains("wheel.mode = cooldown"));
    assert!(stdout.contains("streak.aggregation = highest"));
}

#[test]
fn test_milestone_odds_are_normalized() {
    let home = TempDir::new().unwrap();
    run_ok(&home, &["milestone", "set", "10", "30", "30", "30", "--label", "ten"]);

    let rows = run_json(&home, &["milestone", "list", "--json"]);
    let rows = rows.as_array().unwrap();
    let ten = rows.iter().find(|r| r["days"] == 10).unwrap();
    assert_eq!(ten["small_chance"], 33.3);
    assert_eq!(ten["medium_chance"], 33.3);
    let sum = ten["small_chance"].as_f64().unwrap()
        + ten["medium_chance"].as_f64().unwrap()
        + ten["large_chance"].as_f64().unwrap();
    assert!((sum - 100.0).abs() < 1e-9);
    // Listed in threshold order.
    assert_eq!(rows[0]["days"], 7);
    assert_eq!(rows[1]["days"], 10);
}

#[test]
fn test_demo_spin_claims_nothing() {
    let home = TempDir::new().unwrap();
    let outcome = run_json(&home, &["wheel", "spin", "--demo", "--seed", "1"]);
    assert_eq!(outcome["demo"], true);
    assert_eq!(outcome["reward"]["claimed"], false);

    let stats = run_json(&home, &["reward", "stats"]);
    assert_eq!(stats["claimed"], 0);
}

#[test]
fn test_seeded_demo_spin_is_reproducible() {
    let home = TempDir::new().unwrap();
    let first = run_json(&home, &["wheel", "spin", "--demo", "--seed", "42"]);
    let second = run_json(&home, &["wheel", "spin", "--demo", "--seed", "42"]);
    assert_eq!(first["reward"]["id"], second["reward"]["id"]);
}

#[test]
fn test_spin_requires_streak() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&home, &["wheel", "spin"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Spin not allowed"));
}

#[test]
fn test_spin_then_cooldown() {
    let home = TempDir::new().unwrap();
    week_long_habit(&home, "read");

    let status = run_json(&home, &["wheel", "status", "--json", "--today", "2025-03-12"]);
    assert_eq!(status["can_spin"], true);
    assert_eq!(status["streak"], 7);

    let outcome = run_json(&home, &["wheel", "spin", "--seed", "3", "--today", "2025-03-12"]);
    assert_eq!(outcome["reward"]["claimed"], true);

    let status = run_json(&home, &["wheel", "status", "--json", "--today", "2025-03-12"]);
    assert_eq!(status["can_spin"], false);
    assert_eq!(status["status"]["status"], "cooling_down");
    assert!(status["cooldown_remaining"].as_str().unwrap().contains('h'));

    let (_, stderr, code) = run_cli(&home, &["wheel", "spin", "--today", "2025-03-12"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("cooldown"));
}

#[test]
fn test_once_per_milestone_mode() {
    let home = TempDir::new().unwrap();
    week_long_habit(&home, "read");
    run_ok(&home, &["wheel", "mode", "once_per_milestone"]);

    run_ok(&home, &["wheel", "spin", "--seed", "5", "--today", "2025-03-12"]);
    let status = run_json(&home, &["wheel", "status", "--json", "--today", "2025-03-12"]);
    assert_eq!(status["can_spin"], false);
    assert_eq!(status["mode"], "once_per_milestone");
    assert!(status["message"].as_str().unwrap().contains("14 days"));
}

#[test]
fn test_segments_cover_full_circle() {
    let home = TempDir::new().unwrap();
    let segments = run_json(&home, &["wheel", "segments"]);
    let total: f64 = segments
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["angle"].as_f64().unwrap())
        .sum();
    assert!((total - 360.0).abs() < 1e-6);
}

#[test]
fn test_reward_add_and_filter() {
    let home = TempDir::new().unwrap();
    run_ok(&home, &["reward", "add", "concert", "Concert tickets", "--tier", "large"]);

    let large = run_json(&home, &["reward", "list", "--tier", "large", "--json"]);
    assert_eq!(large.as_array().unwrap().len(), 6);

    let (_, _, code) = run_cli(&home, &["reward", "add", "x", "X", "--tier", "huge"]);
    assert_eq!(code, 1);
}

#[test]
fn test_stats_commands() {
    let home = TempDir::new().unwrap();
    week_long_habit(&home, "read");

    let overall = run_json(&home, &["stats", "overall", "--today", "2025-03-12"]);
    assert_eq!(overall["total_habits"], 1);
    assert_eq!(overall["longest_streak"], 7);
    assert_eq!(overall["milestones_reached"], 1);

    let habit = run_json(&home, &["stats", "habit", "read", "--days", "7", "--today", "2025-03-12"]);
    assert_eq!(habit["current_streak"], 7);
    assert_eq!(habit["days_to_next_milestone"], 7);
    assert_eq!(habit["completion_rate"], 100.0);
    assert_eq!(habit["trend"], "up");
    // 7 * 10 + 7 * 5 + 7 * 2
    assert_eq!(habit["score"], 119);
}

#[test]
fn test_stats_leaders() {
    let home = TempDir::new().unwrap();
    week_long_habit(&home, "read");
    run_ok(&home, &["habit", "add", "walk"]);
    run_ok(&home, &["habit", "complete", "walk", "--today", "2025-03-12"]);

    let leaders = run_json(&home, &["stats", "leaders", "--limit", "1", "--today", "2025-03-12"]);
    let leaders = leaders.as_array().unwrap();
    assert_eq!(leaders.len(), 1);
    assert_eq!(leaders[0]["id"], "read");
    assert_eq!(leaders[0]["streak"], 7);
}

#[test]
fn test_stats_huge_window_does_not_crash() {
    let home = TempDir::new().unwrap();
    week_long_habit(&home, "read");
    let habit = run_json(
        &home,
        &["stats", "habit", "read", "--days", "4000000000", "--today", "2025-03-12"],
    );
    assert!(habit["completion_rate"].as_f64().unwrap() < 1e-6);
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    let stdout = run_ok(&home, &["completions", "bash"]);
    assert!(stdout.contains("streakwheel"));
}
