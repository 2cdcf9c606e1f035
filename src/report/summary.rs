//! Model summary report shown after the wizard finishes

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::builder::{CatalogEntry, ModelSummary};

fn yes_no(value: bool) -> Cell {
    if value {
        Cell::new("Yes").fg(Color::Green)
    } else {
        Cell::new("No").fg(Color::DarkGrey)
    }
}

/// Build the summary table for a model
pub fn summary_table(summary: &ModelSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Setting").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![
        Cell::new("Model name"),
        Cell::new(&summary.name).add_attribute(Attribute::Bold),
    ]);
    if let Some(description) = &summary.description {
        table.add_row(vec![Cell::new("Description"), Cell::new(description)]);
    }
    table.add_row(vec![
        Cell::new("Type"),
        Cell::new(summary.model_type.label()),
    ]);
    table.add_row(vec![
        Cell::new("Data"),
        Cell::new(
            summary
                .data_sources
                .iter()
                .map(|s| s.label())
                .collect::<Vec<_>>()
                .join(", "),
        ),
    ]);

    let excluded = summary.total_records.saturating_sub(summary.filtered_records);
    table.add_row(vec![
        Cell::new("Training records"),
        Cell::new(format!(
            "{} of {} ({} excluded)",
            summary.filtered_records, summary.total_records, excluded
        ))
        .fg(if excluded > 0 { Color::Yellow } else { Color::White }),
    ]);
    table.add_row(vec![
        Cell::new("Filters"),
        Cell::new(format!(
            "{} ({})",
            summary.filter_conditions.len(),
            summary.condition_match.label()
        )),
    ]);
    table.add_row(vec![
        Cell::new("Goal"),
        Cell::new(summary.goal.describe()).fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("Variables"),
        Cell::new(summary.preparation.selected_variables.join(", ")),
    ]);
    table.add_row(vec![
        Cell::new("Missing values"),
        Cell::new(format!(
            "{} ({}, grouped by {}, {} buckets)",
            summary.preparation.transformation,
            summary.preparation.replace_with,
            summary.preparation.group_by,
            summary.preparation.buckets
        )),
    ]);

    let algorithm = if summary.automatic_selection {
        format!("{} (automatic)", summary.algorithm.label())
    } else {
        summary.algorithm.label().to_string()
    };
    table.add_row(vec![
        Cell::new("Algorithm"),
        Cell::new(algorithm)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Autopilot"), yes_no(summary.preparation.autopilot_enabled)]);
    table.add_row(vec![Cell::new("Auto retrain"), yes_no(summary.auto_retrain)]);
    table.add_row(vec![
        Cell::new("Notify on completion"),
        yes_no(summary.notify_on_complete),
    ]);

    table
}

/// Print the model summary table
pub fn display_summary(summary: &ModelSummary) {
    println!();
    println!(
        "    {} {}",
        style("📋").cyan(),
        style("MODEL SUMMARY").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    // Indent the table
    for line in summary_table(summary).to_string().lines() {
        println!("    {}", line);
    }

    if !summary.filter_conditions.is_empty() {
        println!();
        println!(
            "    {} {}",
            style("🔎").cyan(),
            style("TRAINING DATA FILTERS").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        for (i, condition) in summary.filter_conditions.iter().enumerate() {
            let values = if condition.value.is_empty() {
                style("(any value)".to_string()).dim()
            } else {
                style(condition.value.join(", ")).yellow()
            };
            println!(
                "      {}. {} {} {}",
                i + 1,
                condition.field,
                style(condition.operator).cyan(),
                values
            );
        }
    }
}
