//! Tests for CLI argument parsing and the headless run

use assert_cmd::Command;
use clap::Parser;
use model_builder::builder::{
    Algorithm, ConditionMatch, DataSource, FilterOperator, GroupBy, ModelType, Objective,
};
use model_builder::cli::{run_headless, slug, Cli};
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["model-builder"]);

    assert!(!cli.no_confirm, "Default no_confirm should be false");
    assert_eq!(cli.model_type, None);
    assert!(cli.data_sources.is_empty());
    assert!(cli.filters.is_empty());
    assert_eq!(cli.condition_match, ConditionMatch::All);
    assert_eq!(cli.variables, None);
    assert!(!cli.auto_algorithm);
    assert!(!cli.no_retrain);
    assert!(!cli.no_notify);
    assert_eq!(cli.description, "");
}

#[test]
fn test_cli_choice_flags() {
    let cli = Cli::parse_from([
        "model-builder",
        "--model-type",
        "vertex",
        "--data-source",
        "csv,cloud",
        "--objective",
        "minimize",
        "--group-by",
        "case-type",
        "--algorithm",
        "xgboost",
        "--condition-match",
        "any",
    ]);

    assert_eq!(cli.model_type, Some(ModelType::Vertex));
    assert_eq!(cli.data_sources, vec![DataSource::Csv, DataSource::Cloud]);
    assert_eq!(cli.objective, Some(Objective::Minimize));
    assert_eq!(cli.group_by, Some(GroupBy::CaseType));
    assert_eq!(cli.algorithm, Some(Algorithm::XgBoost));
    assert_eq!(cli.condition_match, ConditionMatch::Any);
}

#[test]
fn test_cli_filter_parsing() {
    let cli = Cli::parse_from([
        "model-builder",
        "--filter",
        "Lead Source:contains:Web| Employee |Web",
        "--filter",
        "Status:not-equal",
    ]);

    assert_eq!(cli.filters.len(), 2);
    assert_eq!(cli.filters[0].field, "Lead Source");
    assert_eq!(cli.filters[0].operator, FilterOperator::Contains);
    assert_eq!(cli.filters[0].value, vec!["Web", "Employee"]);
    assert_eq!(cli.filters[1].operator, FilterOperator::NotEqual);
    assert!(cli.filters[1].value.is_empty());
}

#[test]
fn test_cli_rejects_bad_values() {
    assert!(Cli::try_parse_from(["model-builder", "--buckets", "5"]).is_err());
    assert!(Cli::try_parse_from(["model-builder", "--buckets", "101"]).is_err());
    assert!(Cli::try_parse_from(["model-builder", "--buckets", "many"]).is_err());
    assert!(Cli::try_parse_from(["model-builder", "--algorithm", "forest"]).is_err());
    assert!(Cli::try_parse_from(["model-builder", "--filter", "Lead Source"]).is_err());
    assert!(Cli::try_parse_from(["model-builder", "--filter", "Status:like:x"]).is_err());

    let cli = Cli::try_parse_from(["model-builder", "--buckets", "100"]).unwrap();
    assert_eq!(cli.buckets, Some(100));
}

#[test]
fn test_cli_output_path_derivation() {
    let cli = Cli::parse_from(["model-builder"]);
    assert_eq!(
        cli.output_path("Lead Scoring v2"),
        PathBuf::from("./lead_scoring_v2_model.json")
    );

    let cli = Cli::parse_from(["model-builder", "-o", "out/model.json"]);
    assert_eq!(cli.output_path("ignored"), PathBuf::from("out/model.json"));
}

#[test]
fn test_slug() {
    assert_eq!(slug("Churn"), "churn");
    assert_eq!(slug("  Lead -- Scoring!  "), "lead_scoring");
    assert_eq!(slug("???"), "model");
}

// ============================================================================
// Headless runs through the library
// ============================================================================

fn headless_args(extra: &[&str]) -> Vec<String> {
    let mut args = vec![
        "model-builder",
        "--no-confirm",
        "--model-type",
        "scratch",
        "--data-source",
        "csv",
        "--name",
        "Churn",
    ];
    args.extend_from_slice(extra);
    args.into_iter().map(String::from).collect()
}

#[test]
fn test_headless_run_with_defaults() {
    let cli = Cli::parse_from(headless_args(&[]));
    let summary = run_headless(&cli).unwrap();

    assert_eq!(summary.name, "Churn");
    assert_eq!(summary.model_type, ModelType::Scratch);
    assert_eq!(summary.algorithm, Algorithm::Glm);
    assert_eq!(summary.filter_conditions[0].field, "Lead Source");
    assert_eq!(summary.preparation.selected_variables.len(), 3);
    assert!(summary.auto_retrain);
}

#[test]
fn test_headless_run_applies_flags() {
    let cli = Cli::parse_from(headless_args(&[
        "--filter",
        "Company:starts-with:Acme",
        "--filter",
        "Status:equals:Open",
        "--variables",
        "Subject,Closed",
        "--buckets",
        "45",
        "--no-autopilot",
        "--algorithm",
        "gbm",
        "--no-retrain",
    ]));
    let summary = run_headless(&cli).unwrap();

    assert_eq!(summary.filter_conditions.len(), 2);
    assert_eq!(summary.filter_conditions[0].field, "Company");
    assert_eq!(summary.filter_conditions[0].value, vec!["Acme"]);
    assert_eq!(summary.filter_conditions[1].operator, FilterOperator::Equals);
    assert_eq!(summary.preparation.selected_variables, vec!["Subject", "Closed"]);
    assert_eq!(summary.preparation.buckets, 45);
    assert!(!summary.preparation.autopilot_enabled);
    assert_eq!(summary.algorithm, Algorithm::Gbm);
    assert!(!summary.auto_retrain);
}

#[test]
fn test_headless_auto_algorithm_overrides_pick() {
    let cli = Cli::parse_from(headless_args(&["--algorithm", "xgboost", "--auto-algorithm"]));
    let summary = run_headless(&cli).unwrap();
    assert_eq!(summary.algorithm, Algorithm::Glm);
    assert!(summary.automatic_selection);
}

#[test]
fn test_headless_reports_gate_rejection() {
    let cli = Cli::parse_from(["model-builder", "--no-confirm", "--name", "Churn"]);
    let err = run_headless(&cli).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Step 1 (Choose Type): Please select a model type to continue."
    );

    let cli = Cli::parse_from(headless_args(&["--variables", " , "]));
    let err = run_headless(&cli).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Step 5 (Prepare Data): Please select at least one variable to continue."
    );
}

#[test]
fn test_headless_requires_name() {
    let cli = Cli::parse_from([
        "model-builder",
        "--no-confirm",
        "--model-type",
        "scratch",
        "--data-source",
        "csv",
    ]);
    let err = run_headless(&cli).unwrap_err();
    assert_eq!(err.to_string(), "Please enter a model name");
}

#[test]
fn test_headless_goal_validation() {
    let cli = Cli::parse_from(headless_args(&["--predict-field", " "]));
    let err = run_headless(&cli).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Step 4 (Set Goal): Please select a field to predict."
    );
}

// ============================================================================
// Binary
// ============================================================================

#[test]
fn test_binary_headless_writes_summary() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("churn.json");

    Command::cargo_bin("model-builder")
        .unwrap()
        .env_remove("RUST_LOG")
        .args(&headless_args(&[])[1..])
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("MODEL SUMMARY"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["model"]["name"], "Churn");
}

#[test]
fn test_binary_headless_failure_message() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("never.json");

    Command::cargo_bin("model-builder")
        .unwrap()
        .env_remove("RUST_LOG")
        .args(["--no-confirm", "--model-type", "scratch", "--name", "Churn"])
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Please select at least one data source to continue.",
        ));

    assert!(!output.exists());
}

#[test]
fn test_binary_writes_log_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("churn.json");
    let log = temp_dir.path().join("builder.log");

    Command::cargo_bin("model-builder")
        .unwrap()
        .env_remove("RUST_LOG")
        .args(&headless_args(&["--verbose"])[1..])
        .arg("-o")
        .arg(&output)
        .arg("--log-file")
        .arg(&log)
        .assert()
        .success();

    let content = std::fs::read_to_string(&log).unwrap();
    assert!(content.contains("advanced"), "log was: {}", content);
}
