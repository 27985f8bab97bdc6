//! Integration tests for the heist CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn heist() -> Command {
    Command::cargo_bin("heist").unwrap()
}

/// Run `simulate --json` with the given extra args and parse the output.
fn simulate_json(args: &[&str]) -> Value {
    let output = heist()
        .args(["simulate", "--json", "--window-ms", "1000"])
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn crew_member<'a>(report: &'a Value, user: &str) -> &'a Value {
    report["report"]["crew"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["user"] == user)
        .unwrap()
}

// ---------------------------------------------------------------------------
// catalog
// ---------------------------------------------------------------------------

#[test]
fn catalog_lists_locations_roles_and_equipment() {
    heist()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bank"))
        .stdout(predicate::str::contains("Underground Lab"))
        .stdout(predicate::str::contains("Lookout"))
        .stdout(predicate::str::contains("Thermal Drill"))
        .stdout(predicate::str::contains("+8% success (hacker)"));
}

// ---------------------------------------------------------------------------
// odds
// ---------------------------------------------------------------------------

#[test]
fn odds_for_a_full_crew() {
    heist()
        .args(["odds", "--location", "bank", "--posture", "aggressive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bank"))
        .stdout(predicate::str::contains("Success chance"))
        .stdout(predicate::str::contains("Clean Getaway"))
        .stdout(predicate::str::contains("Total Bust"));
}

#[test]
fn odds_with_failures_and_gear() {
    heist()
        .args([
            "odds", "--location", "casino", "--crew", "3", "--fail", "hacker", "--timeout",
            "driver", "--gear", "leader=mask",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Timeout"))
        .stdout(predicate::str::contains("Mask"));
}

#[test]
fn odds_unknown_location() {
    heist()
        .args(["odds", "--location", "vault"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: unknown location: vault"));
}

#[test]
fn odds_gear_for_missing_role() {
    heist()
        .args(["odds", "--location", "bank", "--crew", "3", "--gear", "muscle=armor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no Muscle in a crew of 3"));
}

#[test]
fn odds_invalid_posture() {
    heist()
        .args(["odds", "--location", "bank", "--posture", "reckless"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid posture"));
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_prints_crew_and_wallets() {
    heist()
        .args(["simulate", "--location", "museum", "--seed", "5", "--window-ms", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Museum"))
        .stdout(predicate::str::contains("Crew"))
        .stdout(predicate::str::contains("Wallets"))
        .stdout(predicate::str::contains("@ace"));
}

#[test]
fn simulate_json_report() {
    let out = simulate_json(&["--location", "bank", "--seed", "7"]);

    assert_eq!(out["seed"], 7);
    assert_eq!(out["report"]["location"], "bank");
    let crew = out["report"]["crew"].as_array().unwrap();
    assert_eq!(crew.len(), 3);
    for member in crew {
        assert_eq!(member["task"]["status"], "success");
    }
    let tier = out["report"]["resolution"]["tier"].as_str().unwrap();
    assert!(
        ["clean_success", "messy_success", "ambush", "total_bust"].contains(&tier),
        "{tier}"
    );
    for user in ["ace", "wheels", "ghost"] {
        assert!(out["wallets"][user].is_object(), "{user}");
    }
}

#[test]
fn simulate_same_seed_same_roll() {
    let a = simulate_json(&["--location", "lab", "--seed", "99", "--crew", "4"]);
    let b = simulate_json(&["--location", "lab", "--seed", "99", "--crew", "4"]);
    assert_eq!(a["report"]["resolution"], b["report"]["resolution"]);
}

#[test]
fn simulate_afk_member_times_out() {
    let out = simulate_json(&["--location", "truck", "--seed", "3", "--afk", "hacker"]);

    let ghost = crew_member(&out, "ghost");
    assert_eq!(ghost["task"]["status"], "timeout");
    assert_eq!(ghost["task"]["score"], 0);
    assert_eq!(crew_member(&out, "wheels")["task"]["status"], "success");
}

#[test]
fn simulate_buys_gear_before_launch() {
    let out = simulate_json(&[
        "--location", "jewelry", "--seed", "11", "--balance", "1000", "--gear", "hacker=drill",
    ]);

    let ghost = crew_member(&out, "ghost");
    assert_eq!(ghost["equipment"], serde_json::json!(["drill"]));

    let paid: i64 = out["report"]["resolution"]["payouts"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| p["user"] == "ghost")
        .map(|p| p["amount"].as_i64().unwrap())
        .sum();
    assert_eq!(out["wallets"]["ghost"]["balance"], 600 + paid);
}

#[test]
fn simulate_insufficient_funds() {
    heist()
        .args([
            "simulate", "--location", "bank", "--balance", "100", "--gear", "driver=fastcar",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("insufficient funds: need 500, have 100"));
}

#[test]
fn simulate_crew_size_is_bounded() {
    heist()
        .args(["simulate", "--location", "bank", "--crew", "6"])
        .assert()
        .failure();
}

#[test]
fn simulate_verbose_logs_crew_setup() {
    heist()
        .env_remove("RUST_LOG")
        .args([
            "simulate", "--location", "bank", "--seed", "4", "--window-ms", "1000", "--gear",
            "hacker=drill", "--verbose",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("heist created"))
        .stderr(predicate::str::contains("bot joined"))
        .stderr(predicate::str::contains("gear bought"))
        .stderr(predicate::str::contains("heist resolved"));
}

#[test]
fn simulate_is_quiet_without_verbose() {
    heist()
        .env_remove("RUST_LOG")
        .args(["simulate", "--location", "bank", "--seed", "4", "--window-ms", "1000"])
        .assert()
        .success()
        .stderr(predicate::str::contains("bot joined").not());
}

#[test]
fn simulate_reads_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("heist.toml");
    fs::write(&path, "seed = 21\ntask_window_ms = 1000\n").unwrap();

    let output = heist()
        .args(["simulate", "--location", "casino", "--json", "--config"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let out: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(out["seed"], 21);
}

#[test]
fn simulate_bad_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("heist.toml");
    fs::write(&path, "task_window_ms = \"soon\"\n").unwrap();

    heist()
        .args(["simulate", "--location", "casino", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("heist.toml"));
}
