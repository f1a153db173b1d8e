//! Integration tests for the `critter` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to drive the calendar, day,
//! format-time, intake and offerings subcommands through the real binary, including
//! stdin piping, file output, config loading and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn critter() -> Command {
    Command::cargo_bin("critter").unwrap()
}

fn stdout_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout must be valid JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// Calendar subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn calendar_text_marks_each_kind_of_day() {
    critter()
        .args(["calendar", "-i", &fixture("submission.json"), "--month", "2024-03"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("March 2024"))
        .stdout(predicate::str::contains(" Sun  Mon  Tue  Wed  Thu  Fri  Sat"))
        // Friday the 1st is a regular working day.
        .stdout(predicate::str::contains("  1*"))
        .stdout(predicate::str::contains(" 11x"))
        .stdout(predicate::str::contains(" 16+"))
        .stdout(predicate::str::contains("Mon Mar 11  day off"))
        .stdout(predicate::str::contains("10AM-2PM"))
        .stdout(predicate::str::contains("(extra)"))
        .stdout(predicate::str::contains("9AM-1:30PM"))
        .stdout(predicate::str::contains("Walking, Overnights"));
}

#[test]
fn calendar_reads_stdin() {
    let input = std::fs::read_to_string(fixture("submission.json")).unwrap();
    critter()
        .args(["calendar", "--month", "March", "--year", "2024"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("March 2024"));
}

#[test]
fn calendar_json_grid() {
    let output = critter()
        .args([
            "calendar",
            "-i",
            &fixture("submission.json"),
            "--month",
            "2024-02",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let grid = stdout_json(&output.stdout);
    assert_eq!(grid["year"], 2024);
    assert_eq!(grid["month"], 2);
    // February 1st 2024 is a Thursday.
    assert_eq!(grid["leadingBlanks"], 4);
    assert_eq!(grid["days"].as_array().unwrap().len(), 29);
    assert_eq!(grid["days"][0]["kind"], "regular");
    assert_eq!(grid["days"][2]["kind"], "unscheduled");
}

#[test]
fn calendar_writes_output_file() {
    let path = std::env::temp_dir().join(format!("critter-cli-cal-{}.txt", std::process::id()));
    critter()
        .args([
            "calendar",
            "-i",
            &fixture("submission.json"),
            "--month",
            "2024-03",
            "-o",
            path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("March 2024"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn calendar_rejects_bad_month() {
    critter()
        .args(["calendar", "-i", &fixture("submission.json"), "--month", "2024-13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Month must be 1-12"));

    critter()
        .args(["calendar", "-i", &fixture("submission.json"), "--month", "Smarch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid month"));
}

#[test]
fn calendar_rejects_non_json_input() {
    critter()
        .args(["calendar", "--month", "2024-03"])
        .write_stdin("definitely not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to parse availability profile JSON",
        ));
}

#[test]
fn missing_input_file_is_reported() {
    critter()
        .args(["calendar", "-i", "/nonexistent/profile.json", "--month", "2024-03"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Day subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn day_off_wins() {
    let output = critter()
        .args(["day", "-i", &fixture("submission.json"), "--date", "2024-03-11"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let day = stdout_json(&output.stdout);
    assert_eq!(day["date"], "2024-03-11");
    assert_eq!(day["available"], false);
    assert_eq!(day["kind"], "dayOff");
    assert!(day.get("window").is_none());
    assert_eq!(day["activeServices"].as_array().unwrap().len(), 0);
}

#[test]
fn additional_day_uses_its_own_window() {
    let output = critter()
        .args(["day", "-i", &fixture("submission.json"), "--date", "2024-03-16"])
        .output()
        .unwrap();
    let day = stdout_json(&output.stdout);
    assert_eq!(day["available"], true);
    assert_eq!(day["kind"], "additionalWorkDay");
    assert_eq!(day["window"]["start"], "10:00");
    assert_eq!(day["window"]["end"], "14:00");
    assert_eq!(
        day["activeServices"],
        serde_json::json!(["walking", "overnights"])
    );
}

#[test]
fn config_supplies_default_window() {
    let output = critter()
        .args([
            "--config",
            &fixture("config.json"),
            "day",
            "-i",
            &fixture("sparse_profile.json"),
            "--date",
            "2024-03-10",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let day = stdout_json(&output.stdout);
    assert_eq!(day["window"]["start"], "07:00");
    assert_eq!(day["window"]["end"], "11:00");
}

#[test]
fn default_window_without_config() {
    let output = critter()
        .args(["day", "-i", &fixture("sparse_profile.json"), "--date", "2024-03-10"])
        .output()
        .unwrap();
    let day = stdout_json(&output.stdout);
    assert_eq!(day["window"]["start"], "09:00");
    assert_eq!(day["window"]["end"], "17:00");
}

#[test]
fn missing_config_file_is_reported() {
    critter()
        .args([
            "--config",
            "/nonexistent/critter.json",
            "format-time",
            "09:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn day_rejects_bad_date() {
    critter()
        .args(["day", "-i", &fixture("submission.json"), "--date", "03/11/2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Format-time subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn format_time_converts_each_argument() {
    critter()
        .args(["format-time", "09:00", "13:30", "00:15", "12:00"])
        .assert()
        .success()
        .stdout("9AM\n1:30PM\n12:15AM\n12PM\n");
}

#[test]
fn format_time_rejects_garbage() {
    critter()
        .args(["format-time", "25:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time '25:00'"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Intake subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn intake_normalizes_exception_years() {
    let output = critter()
        .args(["intake", "-i", &fixture("intake.json"), "--year", "2024"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let intake = stdout_json(&output.stdout);
    let days_off = intake["daysOff"].as_array().unwrap();
    // The unreadable date is dropped.
    assert_eq!(days_off.len(), 1);
    assert_eq!(days_off[0]["date"], "2024-12-25");
    assert_eq!(days_off[0]["available"], false);

    let extra = &intake["additionalWorkDays"][0];
    assert_eq!(extra["date"], "2024-12-27");
    assert_eq!(extra["available"], true);

    assert_eq!(intake["services"]["sitting"]["selected"], true);
    assert_eq!(intake["schedule"]["Friday"]["endTime"], "12:00");
}

#[test]
fn intake_logs_dropped_dates_to_stderr() {
    critter()
        .args(["intake", "-i", &fixture("intake.json"), "--year", "2024"])
        .assert()
        .success()
        .stderr(predicate::str::contains("sometime in spring"));
}

#[test]
fn intake_lists_every_structural_problem() {
    critter()
        .args(["intake", "-i", &fixture("bad_intake.json"), "--year", "2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Model response rejected"))
        .stderr(predicate::str::contains("Missing service: overnights"))
        .stderr(predicate::str::contains("Missing service: homeBoarding"))
        .stderr(predicate::str::contains("Missing schedule for Tuesday"))
        .stderr(predicate::str::contains("Missing schedule for Sunday"))
        .stderr(predicate::str::contains("daysOff must be an array"))
        .stderr(predicate::str::contains("additionalWorkDays").not());
}

#[test]
fn intake_rejects_empty_object() {
    critter()
        .arg("intake")
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing services object"))
        .stderr(predicate::str::contains("Missing schedule object"));
}

#[test]
fn intake_without_year_uses_the_current_year() {
    let year = chrono::Local::now().format("%Y").to_string();
    let output = critter()
        .args(["intake", "-i", &fixture("intake.json")])
        .output()
        .unwrap();
    assert!(output.status.success());

    let intake = stdout_json(&output.stdout);
    assert_eq!(intake["daysOff"][0]["date"], format!("{}-12-25", year));
}

// ─────────────────────────────────────────────────────────────────────────────
// Offerings subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn offerings_table_lists_selected_services() {
    critter()
        .args(["offerings", "-i", &fixture("offerings.json")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Walking"))
        .stdout(predicate::str::contains("30 minutes: $30; 60 minutes: $45"))
        .stdout(predicate::str::contains("Size: Up to 60 pounds"))
        .stdout(predicate::str::contains("Overnights"))
        .stdout(predicate::str::contains("Dogs; Cats"))
        .stdout(predicate::str::contains("CancellationPolicy: 48 hours notice"))
        .stdout(predicate::str::contains("Service Area: 60015 (Deerfield, IL)"))
        .stdout(predicate::str::contains("Travel Fee: $7.50 for distances over 5 miles"))
        .stdout(predicate::str::contains("Comments: Photo updates after every visit."))
        .stdout(predicate::str::contains("Sitting").not());
}

#[test]
fn offerings_json_carries_summary_rows() {
    let input = std::fs::read_to_string(fixture("offerings.json")).unwrap();
    let output = critter()
        .args(["offerings", "--json"])
        .write_stdin(input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let body = stdout_json(&output.stdout);
    assert_eq!(body["details"]["services"], serde_json::json!(["walking", "overnights"]));
    assert_eq!(body["summary"][1]["label"], "Overnights");
    assert_eq!(body["summary"][1]["durations"][0]["cost"], 85.0);
    assert_eq!(body["genericLogistics"].as_array().unwrap().len(), 2);
}

#[test]
fn offerings_lists_every_problem() {
    critter()
        .args(["offerings", "-i", &fixture("bad_offerings.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Service offerings rejected"))
        .stderr(predicate::str::contains("Unknown service: grooming"))
        .stderr(predicate::str::contains(
            "durationsAndCosts: walking.durations must be an array",
        ))
        .stderr(predicate::str::contains(
            "petTypes: walking.acceptedPets must be an array of strings",
        ))
        .stderr(predicate::str::contains("Missing logistics"));
}

// ─────────────────────────────────────────────────────────────────────────────
// General
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    critter()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("calendar"))
        .stdout(predicate::str::contains("day"))
        .stdout(predicate::str::contains("format-time"))
        .stdout(predicate::str::contains("intake"))
        .stdout(predicate::str::contains("offerings"));
}

#[test]
fn no_subcommand_fails() {
    critter().assert().failure();
}
