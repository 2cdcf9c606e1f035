//! Model summary export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::builder::ModelSummary;

/// Metadata about the export
#[derive(Serialize)]
pub struct ExportMetadata {
    /// Time of the export (ISO 8601 format)
    pub timestamp: String,
    /// Model builder version
    pub builder_version: String,
    /// One-line goal, e.g. "Maximize Opportunity Type is New Business"
    pub goal: String,
    /// Number of records used for training
    pub training_records: u32,
}

/// Complete model export with metadata
#[derive(Serialize)]
pub struct ModelExport<'a> {
    pub metadata: ExportMetadata,
    pub model: &'a ModelSummary,
}

/// Build the export document for a model summary
pub fn build_export(summary: &ModelSummary) -> ModelExport<'_> {
    ModelExport {
        metadata: ExportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            builder_version: env!("CARGO_PKG_VERSION").to_string(),
            goal: summary.goal.describe(),
            training_records: summary.filtered_records,
        },
        model: summary,
    }
}

/// Export a model summary to a pretty-printed JSON file
pub fn export_model_summary(summary: &ModelSummary, output_path: &Path) -> Result<()> {
    let export = build_export(summary);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize model summary to JSON")?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory {}", parent.display())
            })?;
        }
    }

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write model summary to {}", output_path.display()))?;

    Ok(())
}
