//! End-to-end tests for the `wt` binary against a temporary state file.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn state_path(dir: &TempDir) -> PathBuf {
    dir.path().join("game_state.json")
}

/// `wt` pointed at a state file inside `dir`, with a fixed seed.
fn wt(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("wt").unwrap();
    cmd.env_remove("WT_LOG")
        .arg("--state")
        .arg(state_path(dir))
        .arg("--seed")
        .arg("42");
    cmd
}

fn read_state(dir: &TempDir) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(state_path(dir)).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// add / list / remove
// ---------------------------------------------------------------------------

#[test]
fn add_and_list() {
    let dir = TempDir::new().unwrap();
    wt(&dir)
        .args(["add", "Dinner,100", "Badminton,5,unlimited"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A1 Dinner"))
        .stdout(predicate::str::contains("12.50%"))
        .stdout(predicate::str::contains("A2 Badminton"));

    wt(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dinner"))
        .stdout(predicate::str::contains("unlimited"))
        .stdout(predicate::str::contains("2 prizes"));

    let state = read_state(&dir);
    assert_eq!(state["prize_pool"].as_array().unwrap().len(), 2);
    assert_eq!(state["prize_id_counter"], 3);
}

#[test]
fn add_reports_bad_items_and_keeps_good_ones() {
    let dir = TempDir::new().unwrap();
    wt(&dir)
        .args(["add", "Coffee,20", "Coffee,30", "Broken"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("A1 Coffee"))
        .stdout(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("2 of 3 items failed"));

    let state = read_state(&dir);
    assert_eq!(state["prize_pool"].as_array().unwrap().len(), 1);
}

#[test]
fn list_empty_pool() {
    let dir = TempDir::new().unwrap();
    wt(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("empty"));
    assert!(!state_path(&dir).exists());
}

#[test]
fn remove_unknown_id_fails_without_changes() {
    let dir = TempDir::new().unwrap();
    wt(&dir).args(["add", "Coffee,20"]).assert().success();
    let before = fs::read_to_string(state_path(&dir)).unwrap();

    wt(&dir)
        .args(["remove", "Z9"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("not found"));

    assert_eq!(fs::read_to_string(state_path(&dir)).unwrap(), before);
}

#[test]
fn remove_keeps_ids_unique() {
    let dir = TempDir::new().unwrap();
    wt(&dir).args(["add", "Coffee,20", "Tea,10"]).assert().success();
    wt(&dir).args(["remove", "A2"]).assert().success();
    wt(&dir)
        .args(["add", "Cake,15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A3 Cake"));
}

// ---------------------------------------------------------------------------
// modify
// ---------------------------------------------------------------------------

#[test]
fn modify_value_and_limit() {
    let dir = TempDir::new().unwrap();
    wt(&dir).args(["add", "Dinner,100"]).assert().success();
    wt(&dir)
        .args(["modify", "A1", "--value", "50", "--limit", "unlimited"])
        .assert()
        .success()
        .stdout(predicate::str::contains("limit unlimited"))
        .stdout(predicate::str::contains("25.00%"));

    let state = read_state(&dir);
    assert_eq!(state["prize_pool"][0]["limit_value"], serde_json::Value::Null);
}

#[test]
fn modify_without_changes_fails() {
    let dir = TempDir::new().unwrap();
    wt(&dir).args(["add", "Dinner,100"]).assert().success();
    wt(&dir)
        .args(["modify", "A1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to change"));
}

// ---------------------------------------------------------------------------
// draw
// ---------------------------------------------------------------------------

#[test]
fn draw_on_empty_pool_records_nothing() {
    let dir = TempDir::new().unwrap();
    wt(&dir)
        .arg("draw")
        .assert()
        .success()
        .stdout(predicate::str::contains("empty"));
    assert!(!state_path(&dir).exists());
}

#[test]
fn draw_with_zero_budget_hands_out_consolation() {
    let dir = TempDir::new().unwrap();
    wt(&dir).args(["add", "Coffee,20"]).assert().success();
    wt(&dir).args(["consolation", "add", "Yoga"]).assert().success();
    wt(&dir).args(["config", "--budget", "0"]).assert().success();

    wt(&dir)
        .args(["draw", "-n", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Consolation: Yoga"));

    let state = read_state(&dir);
    assert_eq!(state["draw_history"].as_array().unwrap().len(), 3);
    assert_eq!(state["draw_history"][0]["result"], "consolation");
}

#[test]
fn certain_win_retires_prize() {
    let dir = TempDir::new().unwrap();
    wt(&dir)
        .args(["config", "--budget", "1000000"])
        .assert()
        .success();
    wt(&dir).args(["add", "Coffee,20"]).assert().success();

    wt(&dir)
        .arg("draw")
        .assert()
        .success()
        .stdout(predicate::str::contains("Won"))
        .stdout(predicate::str::contains("leaves the pool"));

    let state = read_state(&dir);
    assert!(state["prize_pool"].as_array().unwrap().is_empty());
    assert_eq!(state["total_won_value"], 20.0);

    wt(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Win: Coffee (1/1"))
        .stdout(predicate::str::contains("1 draws, 1 wins"));
}

#[test]
fn fragments_show_partial_progress() {
    let dir = TempDir::new().unwrap();
    wt(&dir)
        .args(["config", "--budget", "1000000"])
        .assert()
        .success();
    wt(&dir).args(["add", "Shoes,600"]).assert().success();
    wt(&dir).args(["draw", "-n", "2"]).assert().success();

    wt(&dir)
        .arg("fragments")
        .assert()
        .success()
        .stdout(predicate::str::contains("Shoes"))
        .stdout(predicate::str::contains("2/4"))
        .stdout(predicate::str::contains("300.00"));
}

// ---------------------------------------------------------------------------
// odds / history / stats
// ---------------------------------------------------------------------------

#[test]
fn odds_chart() {
    let dir = TempDir::new().unwrap();
    wt(&dir).args(["add", "Dinner,100"]).assert().success();
    wt(&dir)
        .arg("odds")
        .assert()
        .success()
        .stdout(predicate::str::contains("A1 Dinner"))
        .stdout(predicate::str::contains("12.50%"))
        .stdout(predicate::str::contains("No win"))
        .stdout(predicate::str::contains("87.50%"));
}

#[test]
fn history_formats() {
    let dir = TempDir::new().unwrap();
    wt(&dir).args(["add", "Coffee,20"]).assert().success();
    wt(&dir).args(["config", "--budget", "0"]).assert().success();
    wt(&dir).arg("draw").assert().success();

    wt(&dir)
        .args(["history", "--format", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Draw History"));
    wt(&dir)
        .args(["history", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"result\": \"no_consolation\""));
    wt(&dir)
        .args(["history", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported format"));
}

#[test]
fn stats_show_budget() {
    let dir = TempDir::new().unwrap();
    wt(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("3000.00"))
        .stdout(predicate::str::contains("12.50"));
}

// ---------------------------------------------------------------------------
// consolation
// ---------------------------------------------------------------------------

#[test]
fn consolation_lifecycle() {
    let dir = TempDir::new().unwrap();
    wt(&dir)
        .args(["consolation", "add", "Yoga", "Walk"])
        .assert()
        .success();
    wt(&dir)
        .args(["consolation", "edit", "2", "Long walk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Walk\" -> \"Long walk\""));
    wt(&dir)
        .args(["consolation", "remove", "1"])
        .assert()
        .success();
    wt(&dir)
        .args(["consolation", "remove", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
    wt(&dir)
        .args(["consolation", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Long walk"))
        .stdout(predicate::str::contains("Yoga").not());
}

#[test]
fn consolation_duplicate_rejected() {
    let dir = TempDir::new().unwrap();
    wt(&dir)
        .args(["consolation", "add", "Yoga", "Yoga"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("already exists"));
}

// ---------------------------------------------------------------------------
// config / state file
// ---------------------------------------------------------------------------

#[test]
fn config_changes_persist() {
    let dir = TempDir::new().unwrap();
    wt(&dir)
        .args([
            "config",
            "--draws-per-day",
            "4",
            "--formula",
            "log-damped",
            "--no-win",
            "0.618",
            "--consolation",
            "2.5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("log-damped"))
        .stdout(predicate::str::contains("gate 0.618"))
        .stdout(predicate::str::contains("voucher 2.5"));

    let state = read_state(&dir);
    assert_eq!(state["draws_per_day"], 4);
    assert_eq!(state["odds_formula"], "log_damped");
    assert_eq!(state["no_win_rule"]["kind"], "gate");
    assert_eq!(state["consolation_policy"]["amount"], 2.5);
}

#[test]
fn config_rejects_unknown_formula() {
    let dir = TempDir::new().unwrap();
    wt(&dir)
        .args(["config", "--formula", "quadratic", "--budget", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown formula"));
    assert!(!state_path(&dir).exists());
}

#[test]
fn config_with_one_bad_flag_saves_nothing() {
    let dir = TempDir::new().unwrap();
    wt(&dir).args(["add", "Coffee,20"]).assert().success();

    for bad in [
        ["--budget", "100", "--consolation=nan"],
        ["--budget", "100", "--consolation=-2"],
        ["--budget", "100", "--no-win=1.5"],
        ["--draws-per-day", "2", "--budget=inf"],
    ] {
        wt(&dir).arg("config").args(bad).assert().failure();
        let state = read_state(&dir);
        assert_eq!(state["total_pool_value"], 3000.0, "{bad:?}");
        assert_eq!(state["draws_per_day"], 8, "{bad:?}");
    }
}

#[test]
fn negative_budget_disables_odds() {
    let dir = TempDir::new().unwrap();
    wt(&dir)
        .args(["config", "--budget", "-5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning:"));
}

#[test]
fn corrupt_state_file_is_reinitialized() {
    let dir = TempDir::new().unwrap();
    fs::write(state_path(&dir), "{ not json").unwrap();
    wt(&dir)
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("starting from defaults"))
        .stdout(predicate::str::contains("empty"));
}

#[test]
fn state_path_from_env() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.json");
    Command::cargo_bin("wt")
        .unwrap()
        .env("WT_STATE", &path)
        .args(["add", "Coffee,20"])
        .assert()
        .success();
    assert!(path.exists());
}

#[test]
fn reads_legacy_state_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        state_path(&dir),
        r#"{
    "prize_pool": [
        {"id": "A1", "name": "Book", "total_value": 300, "total_fragments": 2,
         "limit_value": "无限", "probability": 0.04, "cooldown": 0}
    ],
    "total_won_value": 150,
    "total_pool_value": 3000,
    "draws_per_day": 8,
    "prize_id_counter": 2,
    "letter_counter": 0,
    "draw_history": [
        {"result": "中奖", "prize": "Book", "fragment_won": 1, "total_fragments": 2,
         "value": 150, "date": "2024-09-30"}
    ],
    "consolation_rewards": ["Walk"]
}"#,
    )
    .unwrap();

    wt(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Book"))
        .stdout(predicate::str::contains("unlimited"));
    wt(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-09-30 - Win: Book"));
}
