use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("linkedin-prospector").unwrap();
        cmd.current_dir(self.dir.path())
            .env("PROSPECTOR_LOG_FILE", self.dir.path().join("prospector.log"))
            .env_remove("LINKEDIN_SESSION_COOKIE")
            .env_remove("PROSPECTOR_ENV")
            .env_remove("ENVIRONMENT")
            .env_remove("RUST_LOG");
        cmd
    }
}

#[test]
fn no_arguments_prints_help() {
    let env = TestEnv::new();
    env.cmd()
        .assert()
        .success()
        .stdout(contains("Usage").and(contains("--update-status")));
}

#[test]
fn mock_search_lists_requested_number_of_results() {
    let env = TestEnv::new();
    env.cmd()
        .args(["AI CTO France", "--num-results", "5"])
        .assert()
        .success()
        .stdout(
            contains("Searching LinkedIn for: AI CTO France")
                .and(contains("Search Results:"))
                .and(contains("5. Person 5"))
                .and(contains("Status: Not Contacted"))
                .and(contains("6. Person 6").not()),
        );
}

#[test]
fn status_update_applies_to_search_results() {
    let env = TestEnv::new();
    env.cmd()
        .args(["AI CTO France", "--num-results", "3"])
        .args(["--update-status", "1", "Contacted", "2025-08-02"])
        .assert()
        .success()
        .stdout(
            contains("Updated contact status for Person 1 to Contacted")
                .and(contains("Status: Contacted"))
                .and(contains("Date: 2025-08-02")),
        );
}

#[test]
fn non_numeric_index_stops_before_search() {
    let env = TestEnv::new();
    env.cmd()
        .args(["AI CTO France", "--update-status", "first", "Contacted", "None"])
        .assert()
        .success()
        .stdout(contains("Invalid index").and(contains("Search Results").not()));
}

#[test]
fn out_of_range_index_is_reported_and_search_continues() {
    let env = TestEnv::new();
    env.cmd()
        .args(["rust", "--num-results", "2", "--update-status", "9", "Contacted", "None"])
        .assert()
        .success()
        .stdout(
            contains("Invalid index: 8. Must be between 0 and 1")
                .and(contains("2. Person 2")),
        );
}

#[test]
fn csv_export_writes_header_and_rows() {
    let env = TestEnv::new();
    let csv_path = env.dir.path().join("exports").join("leads.csv");

    env.cmd()
        .args(["AI CTO France", "--num-results", "3", "--csv"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(contains("Results saved to CSV file"));

    let content = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "Name,Role,Company,Profile URL,Contact Status,Message Date"
    );
    assert_eq!(
        lines[1],
        "Person 1,AI Engineer at Company 1,Company 1,https://www.linkedin.com/in/person-1,Not Contacted,"
    );
}

#[test]
fn sheet_export_requires_both_flags() {
    let env = TestEnv::new();
    env.cmd()
        .args(["rust", "--num-results", "1", "--sheet-name", "Leads"])
        .assert()
        .success()
        .stdout(contains("Skipping Google Sheets export"));
}

#[test]
fn missing_credentials_file_keeps_results() {
    let env = TestEnv::new();
    env.cmd()
        .args(["rust", "--num-results", "2", "--sheet-name", "Leads"])
        .args(["--credentials", "missing.json"])
        .assert()
        .success()
        .stdout(
            contains("Export sink unavailable: credentials file not found")
                .and(contains("2. Person 2")),
        );
}

#[test]
fn json_output_is_parseable() {
    let env = TestEnv::new();
    let output = env
        .cmd()
        .args(["rust", "--num-results", "3", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid json output");
    let results = value.as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[2]["name"], "Person 3");
    assert_eq!(results[2]["contact_status"], "Not Contacted");
}

#[test]
fn linkedin_provider_without_session_is_reported() {
    let env = TestEnv::new();
    env.cmd()
        .args(["rust", "--provider", "linkedin"])
        .assert()
        .success()
        .stdout(contains("Search provider unavailable").and(contains("Search Results").not()));
}

#[test]
fn config_file_must_exist_when_given() {
    let env = TestEnv::new();
    env.cmd()
        .args(["rust", "--config", "nope.yaml"])
        .assert()
        .failure()
        .stderr(contains("Config file not found"));
}

#[test]
fn invalid_linkedin_base_url_fails_the_run() {
    let env = TestEnv::new();
    env.cmd()
        .env("LINKEDIN_SESSION_COOKIE", "cookie")
        .env("LINKEDIN_BASE_URL", "not a url")
        .args(["rust", "--provider", "linkedin"])
        .assert()
        .failure()
        .stderr(contains("Configuration error"));
}

#[test]
fn update_without_keywords_reports_empty_store() {
    let env = TestEnv::new();
    env.cmd()
        .args(["--update-status", "1", "Contacted", "None"])
        .assert()
        .success()
        .stdout(contains("There are no results to update").and(contains("Search Results").not()));
}

#[test]
fn lowest_possible_index_is_rejected_without_panicking() {
    let env = TestEnv::new();
    env.cmd()
        .args(["rust", "--num-results", "1"])
        .args(["--update-status", "-9223372036854775808", "Contacted", "None"])
        .assert()
        .success()
        .stdout(contains("Invalid index").and(contains("Search Results").not()));
}

#[test]
fn non_iso_date_is_stored_with_a_warning() {
    let env = TestEnv::new();
    env.cmd()
        .args(["rust", "--num-results", "2"])
        .args(["--update-status", "2", "Contacted", "02/08/2025"])
        .assert()
        .success()
        .stdout(
            contains("Warning: date '02/08/2025' is not in YYYY-MM-DD format")
                .and(contains("Updated contact status for Person 2 to Contacted"))
                .and(contains("Date: 02/08/2025")),
        );
}
