//! Tests for the settings record and its per-step updates

use std::collections::BTreeSet;

use model_builder::builder::{
    clamp_buckets, Algorithm, ConditionMatch, DataSource, FilterCondition, FilterOperator,
    GoalError, GoalSettings, GroupBy, ModelBuilder, ModelType, Objective, PrepareDataSettings,
    PrepareDataUpdate, ReplaceWith, SettingsUpdate, Transformation, Transition,
    VariableTransform, WizardSettings, WizardStep,
};

// ============================================================================
// Filter conditions
// ============================================================================

#[test]
fn test_filter_values_are_trimmed_and_unique() {
    let mut condition = FilterCondition::new("Lead Source", FilterOperator::Contains);

    assert!(condition.add_value("  Web "));
    assert!(!condition.add_value("Web"), "duplicates are ignored");
    assert!(!condition.add_value("   "), "blank values are ignored");
    assert!(condition.add_value("Employee"));

    assert_eq!(condition.value, vec!["Web", "Employee"]);
    assert_eq!(condition.remove_value(0), Some("Web".to_string()));
    assert_eq!(condition.remove_value(5), None);
    assert_eq!(condition.value, vec!["Employee"]);
}

#[test]
fn test_first_filter_condition_cannot_be_removed() {
    let mut builder = ModelBuilder::new();

    assert_eq!(builder.remove_filter_condition(0), Transition::Stayed);
    assert_eq!(builder.settings().filter_conditions.len(), 1);

    builder.add_filter_condition();
    builder.add_filter_condition();
    assert_eq!(builder.settings().filter_conditions.len(), 3);
    assert_eq!(
        builder.settings().filter_conditions[2],
        FilterCondition::default()
    );

    assert_eq!(builder.remove_filter_condition(7), Transition::Stayed);
    assert_eq!(builder.remove_filter_condition(1), Transition::Edited);
    assert_eq!(builder.settings().filter_conditions.len(), 2);
}

#[test]
fn test_filter_edits_by_index() {
    let mut builder = ModelBuilder::new();
    builder.add_filter_condition();

    builder.set_filter_field(1, "Status");
    builder.set_filter_operator(1, FilterOperator::NotEqual);
    builder.add_filter_value(1, "Closed");
    builder.add_filter_value(1, "Closed");

    let condition = &builder.settings().filter_conditions[1];
    assert_eq!(condition.field, "Status");
    assert_eq!(condition.operator, FilterOperator::NotEqual);
    assert_eq!(condition.value, vec!["Closed"]);

    assert_eq!(builder.set_filter_field(9, "Email"), Transition::Stayed);
    assert_eq!(
        builder.remove_filter_value(1, 3),
        Transition::Stayed,
        "out of range value index is a no-op"
    );
}

#[test]
fn test_filtered_records_clamped_to_total() {
    let mut settings = WizardSettings::default();
    settings.merge(SettingsUpdate::FilteredRecords(10_000));
    assert_eq!(settings.filtered_records, settings.total_records);
    assert_eq!(settings.excluded_records(), 0);

    settings.merge(SettingsUpdate::FilteredRecords(500));
    assert_eq!(settings.excluded_records(), 98);
}

#[test]
fn test_data_sources_behave_as_set() {
    let mut builder = ModelBuilder::new();

    assert_eq!(builder.add_data_source(DataSource::Csv), Transition::Edited);
    assert_eq!(builder.add_data_source(DataSource::Csv), Transition::Stayed);
    builder.add_data_source(DataSource::Cloud);
    assert_eq!(builder.settings().selected_data_sources.len(), 2);

    assert_eq!(builder.remove_data_source(DataSource::Database), Transition::Stayed);
    assert_eq!(builder.remove_data_source(DataSource::Csv), Transition::Edited);
    assert_eq!(
        builder.settings().selected_data_sources,
        BTreeSet::from([DataSource::Cloud])
    );
}

// ============================================================================
// Goal
// ============================================================================

#[test]
fn test_goal_defaults_and_description() {
    let goal = GoalSettings::default();
    assert_eq!(goal.predict_field, "Opportunity Type");
    assert_eq!(goal.output_type, "Binary Classification");
    assert_eq!(goal.objective, Objective::Maximize);
    assert_eq!(goal.target_value, "New Business");
    assert_eq!(goal.describe(), "Maximize Opportunity Type is New Business");
    assert_eq!(goal.validate(), Ok(()));
}

#[test]
fn test_goal_validation_messages() {
    let mut goal = GoalSettings::default();
    goal.predict_field.clear();
    assert_eq!(goal.validate(), Err(GoalError::MissingPredictField));
    assert_eq!(
        goal.validate().unwrap_err().to_string(),
        "Please select a field to predict."
    );

    let mut goal = GoalSettings::default();
    goal.target_value = "  ".to_string();
    assert_eq!(goal.validate(), Err(GoalError::MissingTargetValue));
    assert_eq!(
        goal.validate().unwrap_err().to_string(),
        "Please select a target value."
    );
}

// ============================================================================
// Data preparation
// ============================================================================

#[test]
fn test_prepare_defaults() {
    let prep = PrepareDataSettings::default();
    assert!(prep.autopilot_enabled);
    assert_eq!(prep.transformation, Transformation::ReplaceMissingValues);
    assert_eq!(prep.replace_with, ReplaceWith::Average);
    assert_eq!(prep.group_by, GroupBy::Product);
    assert_eq!(prep.buckets, 30);
    assert_eq!(prep.alerts.get("Description"), Some(&true));
    assert_eq!(
        prep.settings.get("Number of Comments"),
        Some(&VariableTransform::ReplaceMissingValues)
    );
    assert_eq!(
        prep.settings.get("Created Date"),
        Some(&VariableTransform::GroupByMonth)
    );
}

#[test]
fn test_prepare_update_is_one_level_merge() {
    let mut prep = PrepareDataSettings::default();
    prep.apply(PrepareDataUpdate {
        replace_with: Some(ReplaceWith::Median),
        group_by: Some(GroupBy::Ungrouped),
        ..Default::default()
    });

    assert_eq!(prep.replace_with, ReplaceWith::Median);
    assert_eq!(prep.group_by, GroupBy::Ungrouped);
    assert_eq!(prep.buckets, 30, "absent fields keep their value");
    assert_eq!(prep.selected_variables.len(), 3);
}

#[test]
fn test_buckets_clamped_on_merge() {
    assert_eq!(clamp_buckets(5), 10);
    assert_eq!(clamp_buckets(250), 100);
    assert_eq!(clamp_buckets(45), 45);

    let mut prep = PrepareDataSettings::default();
    prep.apply(PrepareDataUpdate {
        buckets: Some(0),
        ..Default::default()
    });
    assert_eq!(prep.buckets, 10);
}

#[test]
fn test_selected_variables_deduplicated() {
    let mut prep = PrepareDataSettings::default();
    prep.apply(PrepareDataUpdate {
        selected_variables: Some(vec![
            "Subject".to_string(),
            "Closed".to_string(),
            "Subject".to_string(),
        ]),
        ..Default::default()
    });
    assert_eq!(prep.selected_variables, vec!["Subject", "Closed"]);
}

#[test]
fn test_toggle_variable() {
    let mut prep = PrepareDataSettings::default();
    assert!(!prep.toggle_variable("Duration"));
    assert!(!prep.is_selected("Duration"));
    assert!(prep.toggle_variable("Duration"));
    assert_eq!(prep.selected_variables.last().map(String::as_str), Some("Duration"));
}

// ============================================================================
// Update ownership
// ============================================================================

#[test]
fn test_update_owners() {
    assert_eq!(
        SettingsUpdate::ModelType(Some(ModelType::Scratch)).owner(),
        WizardStep::ChooseType
    );
    assert_eq!(
        SettingsUpdate::DataSources(BTreeSet::new()).owner(),
        WizardStep::SelectData
    );
    assert_eq!(
        SettingsUpdate::ConditionMatch(ConditionMatch::Any).owner(),
        WizardStep::SelectTrainingData
    );
    assert_eq!(
        SettingsUpdate::Goal(GoalSettings::default()).owner(),
        WizardStep::SetGoal
    );
    assert_eq!(
        SettingsUpdate::PrepareData(PrepareDataUpdate::default()).owner(),
        WizardStep::PrepareData
    );
    assert_eq!(
        SettingsUpdate::Algorithm(Some(Algorithm::Gbm)).owner(),
        WizardStep::SelectAlgorithm
    );
}

#[test]
fn test_merge_replaces_only_named_field() {
    let mut settings = WizardSettings::default();
    let before = settings.clone();

    settings.merge(SettingsUpdate::ModelType(Some(ModelType::Databricks)));
    assert_eq!(settings.selected_model_type, Some(ModelType::Databricks));
    assert_eq!(settings.goal_settings, before.goal_settings);
    assert_eq!(settings.selected_algorithm, before.selected_algorithm);
    assert_eq!(settings.prepare_data_settings, before.prepare_data_settings);
}
