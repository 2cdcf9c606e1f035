//! Review step: read-only summary and the terminal "Save & Train" action

use serde::Serialize;
use thiserror::Error;

use super::catalog::{
    Algorithm, CatalogEntry, ConditionMatch, DataSource, ModelType, VARIABLES,
};
use super::gate::{can_advance, GateRejection};
use super::settings::{FilterCondition, GoalSettings, PrepareDataSettings, WizardSettings};
use super::steps::WizardStep;

/// Errors from the Save & Train action
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("Models can only be trained from the {} step (currently on step {}: {})", WizardStep::LAST.title(), .0.number(), .0.title())]
    NotAtReview(WizardStep),
    #[error(transparent)]
    Incomplete(#[from] GateRejection),
    #[error("Please enter a model name")]
    MissingModelName,
}

/// One block of the review screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSection {
    pub id: &'static str,
    pub title: &'static str,
    pub summary: String,
    /// Extra lines shown when the section is expanded
    pub details: Vec<String>,
}

/// Model name and training options entered on the review step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainRequest {
    pub name: String,
    pub description: String,
    /// Retrain automatically when new data becomes available
    pub auto_retrain: bool,
    /// Notify when training completes
    pub notify_on_complete: bool,
}

impl Default for TrainRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            auto_retrain: true,
            notify_on_complete: true,
        }
    }
}

impl TrainRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Everything submitted for training
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub model_type: ModelType,
    pub data_sources: Vec<DataSource>,
    pub condition_match: ConditionMatch,
    pub filter_conditions: Vec<FilterCondition>,
    pub total_records: u32,
    pub filtered_records: u32,
    pub goal: GoalSettings,
    pub preparation: PrepareDataSettings,
    pub algorithm: Algorithm,
    pub automatic_selection: bool,
    pub auto_retrain: bool,
    pub notify_on_complete: bool,
}

/// Build a model summary from a completed wizard
pub fn train(
    current: WizardStep,
    settings: &WizardSettings,
    request: TrainRequest,
) -> Result<ModelSummary, ReviewError> {
    if !current.is_last() {
        return Err(ReviewError::NotAtReview(current));
    }
    // Fields may have been edited after their gate passed, so check them all again
    for step in &WizardStep::ALL[..WizardStep::ALL.len() - 1] {
        can_advance(*step, settings)?;
    }

    let name = request.name.trim();
    if name.is_empty() {
        return Err(ReviewError::MissingModelName);
    }
    let description = request.description.trim();

    // The gates above guarantee these are present
    let (Some(model_type), Some(goal), Some(algorithm)) = (
        settings.selected_model_type,
        settings.goal_settings.clone(),
        settings.selected_algorithm,
    ) else {
        return Err(ReviewError::Incomplete(GateRejection::MissingModelType));
    };

    Ok(ModelSummary {
        name: name.to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
        model_type,
        data_sources: settings.selected_data_sources.iter().copied().collect(),
        condition_match: settings.condition_match,
        filter_conditions: settings.filter_conditions.clone(),
        total_records: settings.total_records,
        filtered_records: settings.filtered_records,
        goal,
        preparation: settings.prepare_data_settings.clone(),
        algorithm,
        automatic_selection: settings.automatic_selection,
        auto_retrain: request.auto_retrain,
        notify_on_complete: request.notify_on_complete,
    })
}

fn describe_condition(condition: &FilterCondition) -> String {
    let field = if condition.field.is_empty() {
        "(no field)"
    } else {
        condition.field.as_str()
    };
    let values = if condition.value.is_empty() {
        "(any value)".to_string()
    } else {
        condition.value.join(", ")
    };
    format!("{} {} {}", field, condition.operator, values)
}

/// Summaries shown on the review screen, one per configured area
pub fn review_sections(settings: &WizardSettings) -> Vec<ReviewSection> {
    let model_type = settings
        .selected_model_type
        .map(|t| t.label().to_string())
        .unwrap_or_else(|| "Not selected".to_string());

    let data = if settings.selected_data_sources.is_empty() {
        "No data source selected".to_string()
    } else {
        settings
            .selected_data_sources
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut filter_details = vec![
        format!("{} Filters", settings.filter_conditions.len()),
        format!("{} records excluded", settings.excluded_records()),
        settings.condition_match.label().to_string(),
    ];
    filter_details.extend(settings.filter_conditions.iter().map(describe_condition));

    let goal = settings
        .goal_settings
        .as_ref()
        .map(GoalSettings::describe)
        .unwrap_or_else(|| "No goal set".to_string());

    let prep = &settings.prepare_data_settings;
    let autopilot = if prep.autopilot_enabled { "on" } else { "off" };

    let algorithm = match settings.selected_algorithm {
        Some(a) if settings.automatic_selection => {
            format!("{} (automatic)", a.id().to_uppercase())
        }
        Some(a) => a.id().to_uppercase(),
        None => "Not selected".to_string(),
    };

    vec![
        ReviewSection {
            id: "type",
            title: "Type",
            summary: model_type,
            details: Vec::new(),
        },
        ReviewSection {
            id: "data",
            title: "Data",
            summary: data,
            details: Vec::new(),
        },
        ReviewSection {
            id: "filters",
            title: "Filters",
            summary: format!(
                "{} of {} records will be used to train the model",
                settings.filtered_records, settings.total_records
            ),
            details: filter_details,
        },
        ReviewSection {
            id: "goal",
            title: "Goal",
            summary: goal,
            details: Vec::new(),
        },
        ReviewSection {
            id: "preparation",
            title: "Preparation",
            summary: format!(
                "{} of {} variables selected.",
                prep.selected_variables.len(),
                VARIABLES.len()
            ),
            details: vec![
                format!("Selected variables: {}", prep.selected_variables.join(", ")),
                format!("Autopilot: {}", autopilot),
                format!(
                    "{}: {} grouped by {}, {} buckets",
                    prep.transformation, prep.replace_with, prep.group_by, prep.buckets
                ),
            ],
        },
        ReviewSection {
            id: "algorithm",
            title: "Algorithm",
            summary: algorithm,
            details: Vec::new(),
        },
    ]
}
