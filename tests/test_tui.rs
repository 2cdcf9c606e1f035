//! Tests for the TUI key handling
//!
//! These tests drive the wizard with key events and check the controller
//! state. Rendering and terminal setup are not exercised here.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use model_builder::builder::{
    Algorithm, CatalogEntry, DataSource, GoalError, ModelType, ReviewError, SettingsUpdate,
    Transition, WizardCommand, WizardStep,
};
use model_builder::cli::wizard::{
    handle_key, process_action, FilterColumn, PrepareFocus, WizardResult, WizardState,
};
use model_builder::cli::Cli;
use tracing_subscriber::fmt::MakeWriter;

fn press(state: &mut WizardState, code: KeyCode) -> Option<WizardResult> {
    let action = handle_key(state, KeyEvent::new(code, KeyModifiers::NONE));
    process_action(state, action)
}

fn press_ctrl(state: &mut WizardState, c: char) -> Option<WizardResult> {
    let action = handle_key(state, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    process_action(state, action)
}

fn type_text(state: &mut WizardState, text: &str) {
    for c in text.chars() {
        assert_eq!(press(state, KeyCode::Char(c)), None);
    }
}

/// Complete steps 1 and 2 with the first model type and data source
fn through_data_step(state: &mut WizardState) {
    press(state, KeyCode::Char(' '));
    press(state, KeyCode::Enter);
    press(state, KeyCode::Char(' '));
    press(state, KeyCode::Enter);
    assert_eq!(state.current_step(), WizardStep::SelectTrainingData);
}

#[test]
fn test_keyboard_flow_to_train() {
    let mut state = WizardState::new();

    // Enter without a choice is blocked by the gate
    press(&mut state, KeyCode::Enter);
    assert_eq!(state.current_step(), WizardStep::ChooseType);
    assert_eq!(
        state.builder.error_message(),
        Some("Please select a model type to continue.")
    );

    through_data_step(&mut state);
    assert_eq!(
        state.builder.settings().selected_model_type,
        Some(ModelType::Scratch)
    );
    assert!(state
        .builder
        .settings()
        .selected_data_sources
        .contains(&DataSource::Csv));

    // Step 3: add a value chip to the first condition
    press(&mut state, KeyCode::Right);
    press(&mut state, KeyCode::Right);
    assert_eq!(state.filter.column, FilterColumn::Value);
    type_text(&mut state, "Web");
    press(&mut state, KeyCode::Enter);
    assert_eq!(state.builder.settings().filter_conditions[0].value, vec!["Web"]);
    assert_eq!(state.current_step(), WizardStep::SelectTrainingData);
    press(&mut state, KeyCode::Enter);
    assert_eq!(state.current_step(), WizardStep::SetGoal);

    // Steps 4 and 5 submit their drafts
    press(&mut state, KeyCode::Enter);
    assert_eq!(state.current_step(), WizardStep::PrepareData);
    press(&mut state, KeyCode::Enter);
    assert_eq!(state.current_step(), WizardStep::SelectAlgorithm);

    // Step 6: automatic selection
    press(&mut state, KeyCode::Char('a'));
    assert!(state.builder.settings().automatic_selection);
    press(&mut state, KeyCode::Enter);
    assert_eq!(state.current_step(), WizardStep::SaveAndTrain);

    // Step 7: name is required
    assert_eq!(press(&mut state, KeyCode::Enter), None);
    assert_eq!(state.review.error, Some(ReviewError::MissingModelName));

    type_text(&mut state, "Churn");
    assert_eq!(state.review.error, None);
    match press(&mut state, KeyCode::Enter) {
        Some(WizardResult::Train(summary)) => {
            assert_eq!(summary.name, "Churn");
            assert_eq!(summary.algorithm, Algorithm::Glm);
            assert!(summary.automatic_selection);
        }
        other => panic!("expected a trained model, got {:?}", other),
    }
}

#[test]
fn test_quit_confirmation() {
    let mut state = WizardState::new();

    assert_eq!(press(&mut state, KeyCode::Esc), None);
    assert!(state.show_quit_confirm);
    assert_eq!(press(&mut state, KeyCode::Char('n')), None);
    assert!(!state.show_quit_confirm);

    press(&mut state, KeyCode::Char('q'));
    assert!(state.show_quit_confirm);
    assert_eq!(
        press(&mut state, KeyCode::Char('y')),
        Some(WizardResult::Quit)
    );
}

#[test]
fn test_q_is_typed_into_text_fields() {
    let mut state = WizardState::new();
    through_data_step(&mut state);
    press(&mut state, KeyCode::Right);
    press(&mut state, KeyCode::Right);

    press(&mut state, KeyCode::Char('q'));
    assert!(!state.show_quit_confirm);
    assert_eq!(state.filter.input, "q");
}

#[test]
fn test_ctrl_r_resets() {
    let mut state = WizardState::new();
    through_data_step(&mut state);

    press_ctrl(&mut state, 'r');
    assert_eq!(state, WizardState::new());
}

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn test_ctrl_r_logs_controller_reset() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(logs.clone())
        .finish();

    let mut state = WizardState::new();
    through_data_step(&mut state);
    tracing::subscriber::with_default(subscriber, || {
        press_ctrl(&mut state, 'r');
    });

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("reset from=3"), "logs were: {}", output);
}

#[test]
fn test_backspace_goes_back() {
    let mut state = WizardState::new();
    through_data_step(&mut state);

    press(&mut state, KeyCode::Backspace);
    assert_eq!(state.current_step(), WizardStep::SelectData);
    press(&mut state, KeyCode::Backspace);
    press(&mut state, KeyCode::Backspace);
    assert_eq!(state.current_step(), WizardStep::ChooseType);
}

#[test]
fn test_empty_filter_list_keys_do_not_panic() {
    let mut state = WizardState::new();
    through_data_step(&mut state);

    let transition = state
        .builder
        .apply(WizardCommand::CompleteStep(SettingsUpdate::FilterConditions(
            Vec::new(),
        )));
    assert!(matches!(transition, Transition::Advanced { .. }));
    press(&mut state, KeyCode::Backspace);
    assert_eq!(state.current_step(), WizardStep::SelectTrainingData);
    assert!(state.builder.settings().filter_conditions.is_empty());

    press(&mut state, KeyCode::Char(' '));
    press(&mut state, KeyCode::Right);
    press(&mut state, KeyCode::Char(' '));
    press(&mut state, KeyCode::Right);
    type_text(&mut state, "Web");
    press(&mut state, KeyCode::Enter);
    press(&mut state, KeyCode::Delete);
    press_ctrl(&mut state, 'd');
    assert!(state.builder.settings().filter_conditions.is_empty());

    // A new row can still be added and edited
    press_ctrl(&mut state, 'n');
    assert_eq!(state.filter.row, 0);
    press(&mut state, KeyCode::Char(' '));
    assert_eq!(
        state.builder.settings().filter_conditions[0].field,
        "Lead Source"
    );
}

#[test]
fn test_filter_rows_add_and_remove() {
    let mut state = WizardState::new();
    through_data_step(&mut state);

    press_ctrl(&mut state, 'n');
    assert_eq!(state.builder.settings().filter_conditions.len(), 2);
    assert_eq!(state.filter.row, 1);

    // Cycle the new row's field from blank to the first field
    press(&mut state, KeyCode::Char(' '));
    assert_eq!(
        state.builder.settings().filter_conditions[1].field,
        "Lead Source"
    );

    press_ctrl(&mut state, 'd');
    assert_eq!(state.builder.settings().filter_conditions.len(), 1);
    assert_eq!(state.filter.row, 0);

    // The first row stays
    press_ctrl(&mut state, 'd');
    assert_eq!(state.builder.settings().filter_conditions.len(), 1);
}

#[test]
fn test_goal_form_clear_and_validate() {
    let mut state = WizardState::new();
    through_data_step(&mut state);
    press(&mut state, KeyCode::Enter);
    assert_eq!(state.current_step(), WizardStep::SetGoal);

    // Clearing the field reports the problem straight away and keeps the target
    press(&mut state, KeyCode::Delete);
    assert_eq!(state.goal.error, Some(GoalError::MissingPredictField));
    assert_eq!(state.goal.settings.predict_field, "");
    assert_eq!(state.goal.settings.target_value, "New Business");

    press(&mut state, KeyCode::Enter);
    assert_eq!(state.current_step(), WizardStep::SetGoal);
    assert_eq!(state.builder.settings().goal_settings, None);

    press(&mut state, KeyCode::Right);
    assert_eq!(state.goal.error, None);
    assert_eq!(state.goal.settings.predict_field, "Opportunity Type");

    press(&mut state, KeyCode::Down);
    press(&mut state, KeyCode::Down);
    press(&mut state, KeyCode::Delete);
    assert_eq!(state.goal.error, Some(GoalError::MissingTargetValue));
    press(&mut state, KeyCode::Right);
    press(&mut state, KeyCode::Enter);
    assert_eq!(state.current_step(), WizardStep::PrepareData);
    let goal = state.builder.settings().goal_settings.clone().unwrap();
    assert_eq!(goal.predict_field, "Opportunity Type");
    assert_eq!(goal.target_value, "New Business");
}

#[test]
fn test_prepare_search_and_toggle() {
    let mut state = WizardState::new();
    through_data_step(&mut state);
    press(&mut state, KeyCode::Enter);
    press(&mut state, KeyCode::Enter);
    assert_eq!(state.current_step(), WizardStep::PrepareData);
    assert_eq!(state.prepare.focus, PrepareFocus::Variables);

    type_text(&mut state, "date");
    assert_eq!(state.prepare.filtered.len(), 2);
    press(&mut state, KeyCode::Char(' '));
    assert!(state.prepare.settings.is_selected("Last Modified Date"));

    // Settings pane: bump buckets
    press(&mut state, KeyCode::Tab);
    for _ in 0..4 {
        press(&mut state, KeyCode::Down);
    }
    press(&mut state, KeyCode::PageUp);
    press(&mut state, KeyCode::Right);
    assert_eq!(state.prepare.settings.buckets, 41);

    press(&mut state, KeyCode::Enter);
    assert_eq!(state.current_step(), WizardStep::SelectAlgorithm);
    let prep = &state.builder.settings().prepare_data_settings;
    assert_eq!(prep.buckets, 41);
    assert_eq!(prep.selected_variables.len(), 4);
}

#[test]
fn test_prepare_edit_clears_gate_message() {
    let mut state = WizardState::new();
    through_data_step(&mut state);
    press(&mut state, KeyCode::Enter);
    press(&mut state, KeyCode::Enter);
    assert_eq!(state.current_step(), WizardStep::PrepareData);

    // Deselect the three default variables
    press(&mut state, KeyCode::Char(' '));
    press(&mut state, KeyCode::Down);
    press(&mut state, KeyCode::Char(' '));
    press(&mut state, KeyCode::Down);
    press(&mut state, KeyCode::Char(' '));
    assert!(state.prepare.settings.selected_variables.is_empty());

    press(&mut state, KeyCode::Enter);
    assert_eq!(state.current_step(), WizardStep::PrepareData);
    assert_eq!(
        state.builder.error_message(),
        Some("Please select at least one variable to continue.")
    );

    press(&mut state, KeyCode::Char(' '));
    assert_eq!(
        state.prepare.settings.selected_variables,
        vec!["Number of Comments"]
    );
    assert_eq!(state.builder.error_message(), None);
}

#[test]
fn test_prepare_navigation_keeps_gate_message() {
    let mut state = WizardState::new();
    through_data_step(&mut state);
    press(&mut state, KeyCode::Enter);
    press(&mut state, KeyCode::Enter);
    for _ in 0..3 {
        press(&mut state, KeyCode::Char(' '));
        press(&mut state, KeyCode::Down);
    }
    press(&mut state, KeyCode::Enter);
    assert!(state.builder.error_message().is_some());

    press(&mut state, KeyCode::Up);
    press(&mut state, KeyCode::Tab);
    assert!(state.builder.error_message().is_some());
}

#[test]
fn test_algorithm_clicks_ignored_while_automatic() {
    let mut state = WizardState::new();
    through_data_step(&mut state);
    for _ in 0..3 {
        press(&mut state, KeyCode::Enter);
    }
    assert_eq!(state.current_step(), WizardStep::SelectAlgorithm);

    press(&mut state, KeyCode::Char('a'));
    press(&mut state, KeyCode::Down);
    press(&mut state, KeyCode::Char(' '));
    assert_eq!(state.builder.settings().selected_algorithm, Some(Algorithm::Glm));

    press(&mut state, KeyCode::Char('a'));
    press(&mut state, KeyCode::Char(' '));
    assert_eq!(state.builder.settings().selected_algorithm, Some(Algorithm::Gbm));
}

#[test]
fn test_wizard_prefilled_from_cli() {
    let cli = Cli::parse_from([
        "model-builder",
        "--model-type",
        "databricks",
        "--data-source",
        "database",
        "--buckets",
        "45",
        "--name",
        "Churn",
    ]);
    let mut state = WizardState::from_cli(&cli);
    assert_eq!(state.cursor, ModelType::Databricks.index());

    for _ in 0..4 {
        press(&mut state, KeyCode::Enter);
    }
    assert_eq!(state.current_step(), WizardStep::PrepareData);
    assert_eq!(state.prepare.settings.buckets, 45);
    assert_eq!(state.review.request.name, "Churn");
}
