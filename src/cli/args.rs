//! Command-line argument definitions using clap

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::builder::catalog::{
    Algorithm, ConditionMatch, DataSource, FilterOperator, GroupBy, ModelType, Objective,
    ReplaceWith, Transformation, MAX_BUCKETS, MIN_BUCKETS,
};
use crate::builder::FilterCondition;

/// Model Builder - configure a predictive model step by step and submit it for training
#[derive(Parser, Debug)]
#[command(name = "model-builder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Skip the interactive wizard and build the model from the flags below.
    /// Fails with the wizard's validation message if a required choice is missing.
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Model type: scratch, sagemaker, vertex or databricks
    #[arg(short, long)]
    pub model_type: Option<ModelType>,

    /// Training data sources (comma-separated): csv, database, cloud
    #[arg(short = 'd', long = "data-source", value_delimiter = ',')]
    pub data_sources: Vec<DataSource>,

    /// Training data filter as FIELD:OPERATOR[:VALUE|VALUE...],
    /// e.g. "Lead Source:contains:Web|Employee". Repeat for more conditions.
    /// The first filter replaces the default "Lead Source" condition.
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<FilterCondition>,

    /// Whether all or any filter conditions must match
    #[arg(long, default_value = "all")]
    pub condition_match: ConditionMatch,

    /// Field the model predicts
    #[arg(long)]
    pub predict_field: Option<String>,

    /// Outcome value of the predicted field
    #[arg(long)]
    pub target_value: Option<String>,

    /// Whether to maximize or minimize the predicted outcome
    #[arg(long)]
    pub objective: Option<Objective>,

    /// Variables used for training (comma-separated).
    /// Defaults to Escalated, Duration and Number of Comments.
    #[arg(long, value_delimiter = ',')]
    pub variables: Option<Vec<String>>,

    /// Disable Autopilot variable selection
    #[arg(long, default_value = "false")]
    pub no_autopilot: bool,

    /// Missing value handling: replace-missing, remove-missing, leave-as-is
    #[arg(long)]
    pub transformation: Option<Transformation>,

    /// Replacement statistic for missing values: average, median, mode, zero
    #[arg(long)]
    pub replace_with: Option<ReplaceWith>,

    /// Grouping for replacement values: product, case-type, data-source, none
    #[arg(long)]
    pub group_by: Option<GroupBy>,

    /// Number of buckets for numeric variables (10 to 100)
    #[arg(long, value_parser = validate_buckets)]
    pub buckets: Option<u32>,

    /// Algorithm: glm, gbm or xgboost
    #[arg(short, long)]
    pub algorithm: Option<Algorithm>,

    /// Let the builder pick the algorithm (always GLM); overrides --algorithm
    #[arg(long, default_value = "false")]
    pub auto_algorithm: bool,

    /// Name of the model (required to train)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Optional model description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Do not retrain automatically when new data becomes available
    #[arg(long, default_value = "false")]
    pub no_retrain: bool,

    /// Do not notify when training completes
    #[arg(long, default_value = "false")]
    pub no_notify: bool,

    /// Output path for the model summary JSON.
    /// Defaults to the model name with a '_model.json' suffix in the current directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write logs to this file (the terminal is reserved for the wizard)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log wizard transitions at debug level
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

impl Cli {
    /// Get the output path, deriving it from the model name if not explicitly provided
    pub fn output_path(&self, model_name: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| Path::new(".").join(format!("{}_model.json", slug(model_name))))
    }
}

/// File-name friendly form of a model name: lowercase, runs of other
/// characters collapsed to a single underscore
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "model".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parser for --filter values
fn parse_filter(s: &str) -> Result<FilterCondition, String> {
    let mut parts = s.splitn(3, ':');
    let field = parts.next().unwrap_or("").trim();
    let operator = parts
        .next()
        .ok_or_else(|| format!("'{}' is not FIELD:OPERATOR[:VALUES]", s))?;
    let operator: FilterOperator = operator.parse().map_err(|e| format!("{}", e))?;

    let mut condition = FilterCondition::new(field, operator);
    if let Some(values) = parts.next() {
        for value in values.split('|') {
            condition.add_value(value);
        }
    }
    Ok(condition)
}

/// Validator for buckets parameter
fn validate_buckets(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(MIN_BUCKETS..=MAX_BUCKETS).contains(&value) {
        Err(format!(
            "buckets must be between {} and {}, got {}",
            MIN_BUCKETS, MAX_BUCKETS, value
        ))
    } else {
        Ok(value)
    }
}
