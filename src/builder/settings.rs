//! Settings accumulated across wizard steps
//!
//! `WizardSettings` is the single record every step writes into. Steps that
//! submit a whole form at once (goal, data preparation, algorithm) do so through
//! a [`SettingsUpdate`], which replaces only the field owned by that step. The
//! data-preparation record merges one level deep: fields present in the update
//! override, absent fields keep their previous value.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

use super::catalog::{
    Algorithm, ConditionMatch, DataSource, FilterOperator, GroupBy, ModelType, Objective,
    ReplaceWith, Transformation, VariableTransform, BINARY_CLASSIFICATION, DEFAULT_BUCKETS,
    DEFAULT_VARIABLES, MAX_BUCKETS, MIN_BUCKETS, PREDICT_FIELDS, TARGET_VALUES, VARIABLES,
};
use super::steps::WizardStep;

/// Records available in the selected data
pub const TOTAL_RECORDS: u32 = 598;
/// Records left after the seeded filter
pub const FILTERED_RECORDS: u32 = 541;
/// Field of the filter condition present when the wizard starts
pub const DEFAULT_FILTER_FIELD: &str = "Lead Source";

// ============================================================================
// Step 3: filter conditions
// ============================================================================

/// A single training-data filter row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCondition {
    pub field: String,
    pub operator: FilterOperator,
    /// Accepted values, kept unique in insertion order
    pub value: Vec<String>,
}

impl Default for FilterCondition {
    fn default() -> Self {
        Self {
            field: String::new(),
            operator: FilterOperator::Contains,
            value: Vec::new(),
        }
    }
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, operator: FilterOperator) -> Self {
        Self {
            field: field.into(),
            operator,
            value: Vec::new(),
        }
    }

    /// Add a value chip. Whitespace is trimmed; blank and duplicate values are
    /// ignored. Returns whether the value was added.
    pub fn add_value(&mut self, raw: &str) -> bool {
        let value = raw.trim();
        if value.is_empty() || self.value.iter().any(|v| v == value) {
            return false;
        }
        self.value.push(value.to_string());
        true
    }

    /// Remove the value chip at `index`
    pub fn remove_value(&mut self, index: usize) -> Option<String> {
        (index < self.value.len()).then(|| self.value.remove(index))
    }
}

/// Filter list present at start and after a reset
pub fn default_filter_conditions() -> Vec<FilterCondition> {
    vec![FilterCondition::new(
        DEFAULT_FILTER_FIELD,
        FilterOperator::Contains,
    )]
}

// ============================================================================
// Step 4: goal
// ============================================================================

/// Error raised by the goal form before it is submitted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalError {
    #[error("Please select a field to predict.")]
    MissingPredictField,
    #[error("Please select a target value.")]
    MissingTargetValue,
}

/// What the model should predict and in which direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalSettings {
    pub predict_field: String,
    pub output_type: String,
    pub objective: Objective,
    pub target_value: String,
}

impl Default for GoalSettings {
    fn default() -> Self {
        Self {
            predict_field: PREDICT_FIELDS[0].to_string(),
            output_type: BINARY_CLASSIFICATION.to_string(),
            objective: Objective::Maximize,
            target_value: TARGET_VALUES[0].to_string(),
        }
    }
}

impl GoalSettings {
    /// Check that the form is complete enough to submit
    pub fn validate(&self) -> Result<(), GoalError> {
        if self.predict_field.trim().is_empty() {
            return Err(GoalError::MissingPredictField);
        }
        if self.target_value.trim().is_empty() {
            return Err(GoalError::MissingTargetValue);
        }
        Ok(())
    }

    /// One-line summary, e.g. "Maximize Opportunity Type is New Business"
    pub fn describe(&self) -> String {
        format!(
            "{} {} is {}",
            self.objective, self.predict_field, self.target_value
        )
    }
}

// ============================================================================
// Step 5: data preparation
// ============================================================================

/// Variable selection and missing-value handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrepareDataSettings {
    /// Selected variable names, unique, in selection order
    pub selected_variables: Vec<String>,
    pub autopilot_enabled: bool,
    pub transformation: Transformation,
    pub replace_with: ReplaceWith,
    pub group_by: GroupBy,
    /// Number of buckets, within [`MIN_BUCKETS`]..=[`MAX_BUCKETS`]
    pub buckets: u32,
    /// Variables flagged with a data-quality alert
    pub alerts: BTreeMap<String, bool>,
    /// Per-variable transform badges
    pub settings: BTreeMap<String, VariableTransform>,
}

impl Default for PrepareDataSettings {
    fn default() -> Self {
        Self {
            selected_variables: DEFAULT_VARIABLES.iter().map(|v| v.to_string()).collect(),
            autopilot_enabled: true,
            transformation: Transformation::ReplaceMissingValues,
            replace_with: ReplaceWith::Average,
            group_by: GroupBy::Product,
            buckets: DEFAULT_BUCKETS,
            alerts: VARIABLES
                .iter()
                .filter(|v| v.has_alert)
                .map(|v| (v.name.to_string(), true))
                .collect(),
            settings: VARIABLES
                .iter()
                .filter_map(|v| v.transform.map(|t| (v.name.to_string(), t)))
                .collect(),
        }
    }
}

impl PrepareDataSettings {
    pub fn is_selected(&self, name: &str) -> bool {
        self.selected_variables.iter().any(|v| v == name)
    }

    /// Flip a variable in or out of the selection, returning the new state
    pub fn toggle_variable(&mut self, name: &str) -> bool {
        if let Some(pos) = self.selected_variables.iter().position(|v| v == name) {
            self.selected_variables.remove(pos);
            false
        } else {
            self.selected_variables.push(name.to_string());
            true
        }
    }

    /// Apply a partial update; fields left as `None` are kept
    pub fn apply(&mut self, update: PrepareDataUpdate) {
        if let Some(vars) = update.selected_variables {
            self.selected_variables = dedup_preserving_order(vars);
        }
        if let Some(v) = update.autopilot_enabled {
            self.autopilot_enabled = v;
        }
        if let Some(v) = update.transformation {
            self.transformation = v;
        }
        if let Some(v) = update.replace_with {
            self.replace_with = v;
        }
        if let Some(v) = update.group_by {
            self.group_by = v;
        }
        if let Some(v) = update.buckets {
            self.buckets = clamp_buckets(v);
        }
        if let Some(v) = update.alerts {
            self.alerts = v;
        }
        if let Some(v) = update.settings {
            self.settings = v;
        }
    }
}

/// Partial data-preparation record submitted by the preparation step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrepareDataUpdate {
    pub selected_variables: Option<Vec<String>>,
    pub autopilot_enabled: Option<bool>,
    pub transformation: Option<Transformation>,
    pub replace_with: Option<ReplaceWith>,
    pub group_by: Option<GroupBy>,
    pub buckets: Option<u32>,
    pub alerts: Option<BTreeMap<String, bool>>,
    pub settings: Option<BTreeMap<String, VariableTransform>>,
}

impl From<PrepareDataSettings> for PrepareDataUpdate {
    fn from(s: PrepareDataSettings) -> Self {
        Self {
            selected_variables: Some(s.selected_variables),
            autopilot_enabled: Some(s.autopilot_enabled),
            transformation: Some(s.transformation),
            replace_with: Some(s.replace_with),
            group_by: Some(s.group_by),
            buckets: Some(s.buckets),
            alerts: Some(s.alerts),
            settings: Some(s.settings),
        }
    }
}

pub fn clamp_buckets(buckets: u32) -> u32 {
    buckets.clamp(MIN_BUCKETS, MAX_BUCKETS)
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

// ============================================================================
// Aggregated settings
// ============================================================================

/// Replacement for the field owned by one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsUpdate {
    ModelType(Option<ModelType>),
    DataSources(BTreeSet<DataSource>),
    FilterConditions(Vec<FilterCondition>),
    ConditionMatch(ConditionMatch),
    FilteredRecords(u32),
    Goal(GoalSettings),
    PrepareData(PrepareDataUpdate),
    Algorithm(Option<Algorithm>),
}

impl SettingsUpdate {
    /// Step whose field this update replaces
    pub fn owner(&self) -> WizardStep {
        match self {
            SettingsUpdate::ModelType(_) => WizardStep::ChooseType,
            SettingsUpdate::DataSources(_) => WizardStep::SelectData,
            SettingsUpdate::FilterConditions(_)
            | SettingsUpdate::ConditionMatch(_)
            | SettingsUpdate::FilteredRecords(_) => WizardStep::SelectTrainingData,
            SettingsUpdate::Goal(_) => WizardStep::SetGoal,
            SettingsUpdate::PrepareData(_) => WizardStep::PrepareData,
            SettingsUpdate::Algorithm(_) => WizardStep::SelectAlgorithm,
        }
    }
}

/// Every choice made in the wizard so far
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardSettings {
    pub selected_model_type: Option<ModelType>,
    pub selected_data_sources: BTreeSet<DataSource>,
    pub condition_match: ConditionMatch,
    pub filter_conditions: Vec<FilterCondition>,
    pub total_records: u32,
    pub filtered_records: u32,
    pub goal_settings: Option<GoalSettings>,
    pub prepare_data_settings: PrepareDataSettings,
    pub selected_algorithm: Option<Algorithm>,
    /// When set, the algorithm is pinned to [`Algorithm::AUTOMATIC`]
    pub automatic_selection: bool,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            selected_model_type: None,
            selected_data_sources: BTreeSet::new(),
            condition_match: ConditionMatch::All,
            filter_conditions: default_filter_conditions(),
            total_records: TOTAL_RECORDS,
            filtered_records: FILTERED_RECORDS,
            goal_settings: None,
            prepare_data_settings: PrepareDataSettings::default(),
            selected_algorithm: Some(Algorithm::Glm),
            automatic_selection: false,
        }
    }
}

impl WizardSettings {
    /// Merge a step's submission. Only the field named by the update changes.
    pub fn merge(&mut self, update: SettingsUpdate) {
        match update {
            SettingsUpdate::ModelType(v) => self.selected_model_type = v,
            SettingsUpdate::DataSources(v) => self.selected_data_sources = v,
            SettingsUpdate::FilterConditions(v) => self.filter_conditions = v,
            SettingsUpdate::ConditionMatch(v) => self.condition_match = v,
            SettingsUpdate::FilteredRecords(v) => {
                self.filtered_records = v.min(self.total_records)
            }
            SettingsUpdate::Goal(v) => self.goal_settings = Some(v),
            SettingsUpdate::PrepareData(v) => self.prepare_data_settings.apply(v),
            SettingsUpdate::Algorithm(v) => {
                self.selected_algorithm = if self.automatic_selection {
                    Some(Algorithm::AUTOMATIC)
                } else {
                    v
                }
            }
        }
    }

    /// Records dropped by the training-data filter
    pub fn excluded_records(&self) -> u32 {
        self.total_records.saturating_sub(self.filtered_records)
    }
}
