//! Interactive TUI wizard for building a model
//!
//! This module renders the seven model builder steps in a full-screen ratatui
//! interface and translates key presses into commands for the
//! [`ModelBuilder`] controller. The controller owns every decision about
//! progression; this module only keeps view-local state (cursors, text
//! inputs and the drafts of forms that are submitted as a whole).
//!
//! # Architecture
//!
//! - `WizardState`: The controller plus view-local drafts and cursors
//! - `StepAction`: What a key press asks the controller to do
//! - `WizardResult`: Final output, either a model to train or a quit
//!
//! # Forms
//!
//! Steps 1-3 and 6 edit the builder directly through live commands. Steps 4
//! (goal) and 5 (data preparation) edit a local draft that reaches the builder
//! only when submitted with Enter. Step 7 collects the model name and training
//! options and submits them with the Save & Train action.

use std::io::{stdout, Stdout};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Terminal,
};
use super::args::Cli;
use super::headless::{goal_draft, prefill, prepare_update, train_request};
use crate::builder::catalog::{
    search_variables, BINARY_CLASSIFICATION, FILTER_FIELDS, MAX_BUCKETS, MIN_BUCKETS,
    PREDICT_FIELDS, TARGET_VALUES, VARIABLES,
};
use crate::builder::{
    clamp_buckets, Algorithm, CatalogEntry, DataSource, GoalError, GoalSettings, ModelBuilder,
    ModelSummary, ModelType, PrepareDataSettings, PrepareDataUpdate, ReviewError,
    SettingsUpdate, TrainRequest, Transition, WizardCommand, WizardStep,
};

// ============================================================================
// Core Result Types
// ============================================================================

/// Result of the wizard run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardResult {
    /// User pressed Save & Train on a complete configuration
    Train(Box<ModelSummary>),
    /// User quit without training
    Quit,
}

// ============================================================================
// Action Types
// ============================================================================

/// Action to take after handling an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// Ask the controller to move to the next step
    NextStep,
    /// Ask the controller to move to the previous step
    PrevStep,
    /// Submit the current step's form and advance
    Submit(SettingsUpdate),
    /// Start over from step 1 with defaults
    Reset,
    /// User wants to quit
    Quit,
    /// Stay on current step
    Stay,
    /// Complete wizard with result
    Complete(WizardResult),
}

// ============================================================================
// View-local Forms
// ============================================================================

/// Column being edited on a filter row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterColumn {
    #[default]
    Field,
    Operator,
    Value,
}

impl FilterColumn {
    fn moved(self, forward: bool) -> Self {
        match (self, forward) {
            (FilterColumn::Field, true) => FilterColumn::Operator,
            (FilterColumn::Operator, true) => FilterColumn::Value,
            (FilterColumn::Value, true) => FilterColumn::Value,
            (FilterColumn::Field, false) => FilterColumn::Field,
            (FilterColumn::Operator, false) => FilterColumn::Field,
            (FilterColumn::Value, false) => FilterColumn::Operator,
        }
    }
}

/// Cursor and pending value text for the training data filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterEditor {
    pub row: usize,
    pub column: FilterColumn,
    /// Value being typed, added as a chip on Enter
    pub input: String,
}

/// Field focused on the goal form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoalFocus {
    #[default]
    PredictField,
    Objective,
    TargetValue,
}

impl GoalFocus {
    const ALL: [GoalFocus; 3] = [
        GoalFocus::PredictField,
        GoalFocus::Objective,
        GoalFocus::TargetValue,
    ];
}

/// Draft of the goal form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalForm {
    pub settings: GoalSettings,
    pub focus: GoalFocus,
    pub error: Option<GoalError>,
}

/// Pane focused on the data preparation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrepareFocus {
    #[default]
    Variables,
    Settings,
}

/// Row of the data preparation settings pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepareRow {
    Autopilot,
    Transformation,
    ReplaceWith,
    GroupBy,
    Buckets,
}

impl PrepareRow {
    pub const ALL: [PrepareRow; 5] = [
        PrepareRow::Autopilot,
        PrepareRow::Transformation,
        PrepareRow::ReplaceWith,
        PrepareRow::GroupBy,
        PrepareRow::Buckets,
    ];
}

/// Draft of the data preparation form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareForm {
    pub settings: PrepareDataSettings,
    pub search: String,
    /// Indices into the variable catalog matching `search`
    pub filtered: Vec<usize>,
    /// Cursor within `filtered`
    pub selected: usize,
    pub focus: PrepareFocus,
    /// Cursor within [`PrepareRow::ALL`]
    pub row: usize,
}

impl Default for PrepareForm {
    fn default() -> Self {
        Self {
            settings: PrepareDataSettings::default(),
            search: String::new(),
            filtered: search_variables(""),
            selected: 0,
            focus: PrepareFocus::default(),
            row: 0,
        }
    }
}

impl PrepareForm {
    fn refilter(&mut self) {
        self.filtered = search_variables(&self.search);
        self.selected = 0;
    }

    /// Variable name under the cursor, if the filtered list is not empty
    pub fn highlighted(&self) -> Option<&'static str> {
        self.filtered
            .get(self.selected)
            .map(|&i| VARIABLES[i].name)
    }
}

/// Field focused on the Save & Train form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewFocus {
    #[default]
    Name,
    Description,
    AutoRetrain,
    Notify,
}

impl ReviewFocus {
    const ALL: [ReviewFocus; 4] = [
        ReviewFocus::Name,
        ReviewFocus::Description,
        ReviewFocus::AutoRetrain,
        ReviewFocus::Notify,
    ];
}

/// Model name and options entered on the last step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewForm {
    pub request: TrainRequest,
    pub focus: ReviewFocus,
    pub error: Option<ReviewError>,
}

/// Move an index within `0..len` by one, without wrapping
fn step_index(index: usize, len: usize, forward: bool) -> usize {
    if forward {
        (index + 1).min(len.saturating_sub(1))
    } else {
        index.saturating_sub(1)
    }
}

/// Neighbouring entry of a string catalog; a blank value starts at the first
fn cycle_str(options: &[&'static str], current: &str, forward: bool) -> String {
    let len = options.len();
    let next = match options.iter().position(|o| *o == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    options[next].to_string()
}

// ============================================================================
// Wizard State
// ============================================================================

/// Controller plus everything the TUI needs to draw and edit it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub builder: ModelBuilder,
    /// Highlighted entry on the list steps (type, data, algorithm)
    pub cursor: usize,
    pub filter: FilterEditor,
    pub goal: GoalForm,
    pub prepare: PrepareForm,
    pub review: ReviewForm,
    /// Show quit confirmation dialog
    pub show_quit_confirm: bool,
    /// Goal form contents used until a goal has been submitted
    goal_seed: GoalSettings,
    /// Preparation choices from the command line, applied on first entry to step 5
    prepare_seed: Option<PrepareDataUpdate>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            builder: ModelBuilder::new(),
            cursor: 0,
            filter: FilterEditor::default(),
            goal: GoalForm::default(),
            prepare: PrepareForm::default(),
            review: ReviewForm::default(),
            show_quit_confirm: false,
            goal_seed: GoalSettings::default(),
            prepare_seed: None,
        }
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wizard pre-populated with the choices given on the command line
    pub fn from_cli(cli: &Cli) -> Self {
        let mut state = Self::new();
        prefill(&mut state.builder, cli);
        state.goal_seed = goal_draft(cli);
        state.prepare_seed = Some(prepare_update(cli));
        state.review.request = train_request(cli);
        state.enter_step();
        state
    }

    pub fn current_step(&self) -> WizardStep {
        self.builder.current_step()
    }

    /// Whether printable keys go into a text field on the current step
    pub fn is_text_entry(&self) -> bool {
        match self.current_step() {
            WizardStep::SelectTrainingData => self.filter.column == FilterColumn::Value,
            WizardStep::PrepareData => self.prepare.focus == PrepareFocus::Variables,
            WizardStep::SaveAndTrain => matches!(
                self.review.focus,
                ReviewFocus::Name | ReviewFocus::Description
            ),
            _ => false,
        }
    }

    /// Seed cursors and drafts for the step just entered
    fn enter_step(&mut self) {
        let settings = self.builder.settings();
        match self.builder.current_step() {
            WizardStep::ChooseType => {
                self.cursor = settings.selected_model_type.map(|t| t.index()).unwrap_or(0);
            }
            WizardStep::SelectData => self.cursor = 0,
            WizardStep::SelectTrainingData => self.filter = FilterEditor::default(),
            WizardStep::SetGoal => {
                self.goal = GoalForm {
                    settings: settings
                        .goal_settings
                        .clone()
                        .unwrap_or_else(|| self.goal_seed.clone()),
                    ..Default::default()
                };
            }
            WizardStep::PrepareData => {
                let mut draft = settings.prepare_data_settings.clone();
                if let Some(seed) = self.prepare_seed.take() {
                    draft.apply(seed);
                }
                self.prepare = PrepareForm {
                    settings: draft,
                    ..Default::default()
                };
            }
            WizardStep::SelectAlgorithm => {
                self.cursor = settings.selected_algorithm.map(|a| a.index()).unwrap_or(0);
            }
            WizardStep::SaveAndTrain => {
                self.review.focus = ReviewFocus::default();
                self.review.error = None;
            }
        }
    }
}

// ============================================================================
// Terminal Setup/Teardown
// ============================================================================

/// Setup terminal for TUI rendering with panic-safe cleanup
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    // Install panic hook for clean terminal restoration
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        teardown_terminal();
        original_hook(panic_info);
    }));

    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn teardown_terminal() {
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
}

// ============================================================================
// Entry Point
// ============================================================================

/// Run the wizard interface
pub fn run_wizard(cli: &Cli) -> Result<WizardResult> {
    let mut wizard = WizardState::from_cli(cli);

    let mut terminal = setup_terminal()?;
    let result = run_wizard_loop(&mut terminal, &mut wizard);
    teardown_terminal();

    result
}

// ============================================================================
// Event Loop
// ============================================================================

/// Main wizard event loop
fn run_wizard_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    wizard: &mut WizardState,
) -> Result<WizardResult> {
    loop {
        terminal.draw(|f| render_wizard(f, wizard))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events, not release
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                let action = handle_key(wizard, key);
                if let Some(result) = process_action(wizard, action) {
                    return Ok(result);
                }
            }
        }
    }
}

/// Translate one key press into an action, updating view-local state
pub fn handle_key(wizard: &mut WizardState, key: KeyEvent) -> StepAction {
    // Handle quit confirmation overlay first
    if wizard.show_quit_confirm {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => StepAction::Complete(WizardResult::Quit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                wizard.show_quit_confirm = false;
                StepAction::Stay
            }
            _ => StepAction::Stay,
        };
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('r') => return StepAction::Reset,
            KeyCode::Char('c') => return StepAction::Quit,
            _ => {}
        }
    }

    let quit_key = matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'));
    if key.code == KeyCode::Esc || (quit_key && !wizard.is_text_entry()) {
        return StepAction::Quit;
    }

    match wizard.current_step() {
        WizardStep::ChooseType => handle_choose_type(wizard, key),
        WizardStep::SelectData => handle_select_data(wizard, key),
        WizardStep::SelectTrainingData => handle_training_data(wizard, key),
        WizardStep::SetGoal => handle_set_goal(wizard, key),
        WizardStep::PrepareData => handle_prepare_data(wizard, key),
        WizardStep::SelectAlgorithm => handle_select_algorithm(wizard, key),
        WizardStep::SaveAndTrain => handle_save_and_train(wizard, key),
    }
}

/// Apply an action to the controller. Returns the final result once the
/// wizard is finished.
pub fn process_action(wizard: &mut WizardState, action: StepAction) -> Option<WizardResult> {
    let transition = match action {
        StepAction::NextStep => wizard.builder.apply(WizardCommand::Next),
        StepAction::PrevStep => wizard.builder.apply(WizardCommand::Back),
        StepAction::Submit(update) => wizard.builder.apply(WizardCommand::CompleteStep(update)),
        StepAction::Reset => {
            wizard.builder.apply(WizardCommand::Reset);
            *wizard = WizardState::new();
            return None;
        }
        StepAction::Quit => {
            wizard.show_quit_confirm = true;
            return None;
        }
        StepAction::Stay => return None,
        StepAction::Complete(result) => return Some(result),
    };

    if matches!(
        transition,
        Transition::Advanced { .. } | Transition::Retreated { .. }
    ) {
        wizard.enter_step();
    }
    None
}

// ============================================================================
// Event Handlers
// ============================================================================

fn handle_choose_type(wizard: &mut WizardState, key: KeyEvent) -> StepAction {
    match key.code {
        KeyCode::Up => {
            wizard.cursor = step_index(wizard.cursor, ModelType::ALL.len(), false);
            StepAction::Stay
        }
        KeyCode::Down => {
            wizard.cursor = step_index(wizard.cursor, ModelType::ALL.len(), true);
            StepAction::Stay
        }
        KeyCode::Char(' ') => {
            let model_type = ModelType::ALL[wizard.cursor];
            wizard
                .builder
                .apply(WizardCommand::SelectModelType(model_type));
            StepAction::Stay
        }
        KeyCode::Enter => StepAction::NextStep,
        KeyCode::Backspace => StepAction::PrevStep,
        _ => StepAction::Stay,
    }
}

fn handle_select_data(wizard: &mut WizardState, key: KeyEvent) -> StepAction {
    match key.code {
        KeyCode::Up => {
            wizard.cursor = step_index(wizard.cursor, DataSource::ALL.len(), false);
            StepAction::Stay
        }
        KeyCode::Down => {
            wizard.cursor = step_index(wizard.cursor, DataSource::ALL.len(), true);
            StepAction::Stay
        }
        KeyCode::Char(' ') => {
            let source = DataSource::ALL[wizard.cursor];
            let command = if wizard.builder.settings().selected_data_sources.contains(&source) {
                WizardCommand::RemoveDataSource(source)
            } else {
                WizardCommand::AddDataSource(source)
            };
            wizard.builder.apply(command);
            StepAction::Stay
        }
        KeyCode::Enter => StepAction::NextStep,
        KeyCode::Backspace => StepAction::PrevStep,
        _ => StepAction::Stay,
    }
}

fn handle_training_data(wizard: &mut WizardState, key: KeyEvent) -> StepAction {
    let rows = wizard.builder.settings().filter_conditions.len();
    let row = wizard.filter.row.min(rows.saturating_sub(1));

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('n') => {
                wizard.builder.apply(WizardCommand::AddFilterCondition);
                wizard.filter.row = wizard.builder.settings().filter_conditions.len() - 1;
                wizard.filter.column = FilterColumn::Field;
                wizard.filter.input.clear();
            }
            KeyCode::Char('d') => {
                wizard
                    .builder
                    .apply(WizardCommand::RemoveFilterCondition(row));
                let rows = wizard.builder.settings().filter_conditions.len();
                wizard.filter.row = row.min(rows.saturating_sub(1));
            }
            _ => {}
        }
        return StepAction::Stay;
    }

    let editing_value = wizard.filter.column == FilterColumn::Value;
    match key.code {
        KeyCode::Up | KeyCode::Down => {
            wizard.filter.row = step_index(row, rows, key.code == KeyCode::Down);
            wizard.filter.input.clear();
            StepAction::Stay
        }
        KeyCode::Left | KeyCode::Right => {
            wizard.filter.column = wizard.filter.column.moved(key.code == KeyCode::Right);
            StepAction::Stay
        }
        KeyCode::Tab => {
            let current = wizard.builder.settings().condition_match;
            wizard
                .builder
                .apply(WizardCommand::SetConditionMatch(current.cycled(true)));
            StepAction::Stay
        }
        KeyCode::Char(' ') if !editing_value => {
            let Some(condition) = wizard.builder.settings().filter_conditions.get(row) else {
                return StepAction::Stay;
            };
            let command = match wizard.filter.column {
                FilterColumn::Field => WizardCommand::SetFilterField {
                    index: row,
                    field: cycle_str(FILTER_FIELDS, &condition.field, true),
                },
                _ => WizardCommand::SetFilterOperator {
                    index: row,
                    operator: condition.operator.cycled(true),
                },
            };
            wizard.builder.apply(command);
            StepAction::Stay
        }
        KeyCode::Char(c) if editing_value => {
            wizard.filter.input.push(c);
            StepAction::Stay
        }
        KeyCode::Delete if editing_value => {
            let chips = wizard
                .builder
                .settings()
                .filter_conditions
                .get(row)
                .map_or(0, |c| c.value.len());
            if chips > 0 {
                wizard.builder.apply(WizardCommand::RemoveFilterValue {
                    index: row,
                    value_index: chips - 1,
                });
            }
            StepAction::Stay
        }
        KeyCode::Backspace if editing_value && !wizard.filter.input.is_empty() => {
            wizard.filter.input.pop();
            StepAction::Stay
        }
        KeyCode::Enter if editing_value && !wizard.filter.input.trim().is_empty() => {
            let value = std::mem::take(&mut wizard.filter.input);
            wizard
                .builder
                .apply(WizardCommand::AddFilterValue { index: row, value });
            StepAction::Stay
        }
        KeyCode::Enter => StepAction::NextStep,
        KeyCode::Backspace => StepAction::PrevStep,
        _ => StepAction::Stay,
    }
}

fn handle_set_goal(wizard: &mut WizardState, key: KeyEvent) -> StepAction {
    let form = &mut wizard.goal;
    let focus_index = GoalFocus::ALL
        .iter()
        .position(|f| *f == form.focus)
        .unwrap_or(0);

    match key.code {
        KeyCode::Up | KeyCode::Down => {
            let index = step_index(focus_index, GoalFocus::ALL.len(), key.code == KeyCode::Down);
            form.focus = GoalFocus::ALL[index];
            StepAction::Stay
        }
        KeyCode::Left | KeyCode::Right => {
            let forward = key.code == KeyCode::Right;
            let goal = &mut form.settings;
            match form.focus {
                GoalFocus::PredictField => {
                    goal.predict_field = cycle_str(PREDICT_FIELDS, &goal.predict_field, forward);
                }
                GoalFocus::Objective => goal.objective = goal.objective.cycled(forward),
                GoalFocus::TargetValue => {
                    goal.target_value = cycle_str(TARGET_VALUES, &goal.target_value, forward);
                }
            }
            form.error = None;
            wizard.builder.clear_error();
            StepAction::Stay
        }
        KeyCode::Delete => {
            match form.focus {
                GoalFocus::PredictField => {
                    form.settings.predict_field.clear();
                    form.error = Some(GoalError::MissingPredictField);
                }
                GoalFocus::TargetValue => {
                    form.settings.target_value.clear();
                    form.error = Some(GoalError::MissingTargetValue);
                }
                GoalFocus::Objective => {}
            }
            StepAction::Stay
        }
        KeyCode::Enter => match form.settings.validate() {
            Ok(()) => {
                form.error = None;
                StepAction::Submit(SettingsUpdate::Goal(form.settings.clone()))
            }
            Err(e) => {
                form.error = Some(e);
                StepAction::Stay
            }
        },
        KeyCode::Backspace => StepAction::PrevStep,
        _ => StepAction::Stay,
    }
}

fn handle_prepare_data(wizard: &mut WizardState, key: KeyEvent) -> StepAction {
    let before = wizard.prepare.settings.clone();
    let action = edit_prepare_form(&mut wizard.prepare, key);
    if wizard.prepare.settings != before {
        wizard.builder.clear_error();
    }
    action
}

fn edit_prepare_form(form: &mut PrepareForm, key: KeyEvent) -> StepAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('a') {
        form.settings.autopilot_enabled = !form.settings.autopilot_enabled;
        return StepAction::Stay;
    }

    match key.code {
        KeyCode::Tab => {
            form.focus = match form.focus {
                PrepareFocus::Variables => PrepareFocus::Settings,
                PrepareFocus::Settings => PrepareFocus::Variables,
            };
            return StepAction::Stay;
        }
        KeyCode::Enter => {
            return StepAction::Submit(SettingsUpdate::PrepareData(PrepareDataUpdate::from(
                form.settings.clone(),
            )));
        }
        _ => {}
    }

    match form.focus {
        PrepareFocus::Variables => match key.code {
            KeyCode::Char(' ') => {
                if let Some(name) = form.highlighted() {
                    form.settings.toggle_variable(name);
                }
                StepAction::Stay
            }
            KeyCode::Char(c) => {
                form.search.push(c);
                form.refilter();
                StepAction::Stay
            }
            KeyCode::Backspace => {
                if form.search.is_empty() {
                    return StepAction::PrevStep;
                }
                form.search.pop();
                form.refilter();
                StepAction::Stay
            }
            KeyCode::Up | KeyCode::Down => {
                form.selected =
                    step_index(form.selected, form.filtered.len(), key.code == KeyCode::Down);
                StepAction::Stay
            }
            _ => StepAction::Stay,
        },
        PrepareFocus::Settings => {
            let settings = &mut form.settings;
            match key.code {
                KeyCode::Up | KeyCode::Down => {
                    form.row = step_index(form.row, PrepareRow::ALL.len(), key.code == KeyCode::Down);
                    StepAction::Stay
                }
                KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                    let forward = key.code != KeyCode::Left;
                    match PrepareRow::ALL[form.row] {
                        PrepareRow::Autopilot => {
                            settings.autopilot_enabled = !settings.autopilot_enabled
                        }
                        PrepareRow::Transformation => {
                            settings.transformation = settings.transformation.cycled(forward)
                        }
                        PrepareRow::ReplaceWith => {
                            settings.replace_with = settings.replace_with.cycled(forward)
                        }
                        PrepareRow::GroupBy => settings.group_by = settings.group_by.cycled(forward),
                        PrepareRow::Buckets => {
                            settings.buckets = if forward {
                                clamp_buckets(settings.buckets + 1)
                            } else {
                                clamp_buckets(settings.buckets.saturating_sub(1))
                            }
                        }
                    }
                    StepAction::Stay
                }
                KeyCode::PageUp => {
                    settings.buckets = clamp_buckets(settings.buckets + 10);
                    StepAction::Stay
                }
                KeyCode::PageDown => {
                    settings.buckets = clamp_buckets(settings.buckets.saturating_sub(10));
                    StepAction::Stay
                }
                KeyCode::Backspace => StepAction::PrevStep,
                _ => StepAction::Stay,
            }
        }
    }
}

fn handle_select_algorithm(wizard: &mut WizardState, key: KeyEvent) -> StepAction {
    match key.code {
        KeyCode::Up => {
            wizard.cursor = step_index(wizard.cursor, Algorithm::ALL.len(), false);
            StepAction::Stay
        }
        KeyCode::Down => {
            wizard.cursor = step_index(wizard.cursor, Algorithm::ALL.len(), true);
            StepAction::Stay
        }
        KeyCode::Char(' ') => {
            let algorithm = Algorithm::ALL[wizard.cursor];
            wizard
                .builder
                .apply(WizardCommand::SelectAlgorithm(algorithm));
            StepAction::Stay
        }
        KeyCode::Char('a') | KeyCode::Char('A') => {
            let enabled = !wizard.builder.settings().automatic_selection;
            wizard
                .builder
                .apply(WizardCommand::SetAutomaticSelection(enabled));
            if enabled {
                wizard.cursor = Algorithm::AUTOMATIC.index();
            }
            StepAction::Stay
        }
        KeyCode::Enter => StepAction::Submit(SettingsUpdate::Algorithm(
            wizard.builder.settings().selected_algorithm,
        )),
        KeyCode::Backspace => StepAction::PrevStep,
        _ => StepAction::Stay,
    }
}

fn handle_save_and_train(wizard: &mut WizardState, key: KeyEvent) -> StepAction {
    let form = &mut wizard.review;
    let focus_index = ReviewFocus::ALL
        .iter()
        .position(|f| *f == form.focus)
        .unwrap_or(0);

    match key.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
            let forward = key.code != KeyCode::Up;
            form.focus = ReviewFocus::ALL[step_index(focus_index, ReviewFocus::ALL.len(), forward)];
            return StepAction::Stay;
        }
        KeyCode::Enter => {
            return match wizard.builder.train(form.request.clone()) {
                Ok(summary) => StepAction::Complete(WizardResult::Train(Box::new(summary))),
                Err(e) => {
                    form.error = Some(e);
                    StepAction::Stay
                }
            };
        }
        _ => {}
    }

    let request = &mut form.request;
    match form.focus {
        ReviewFocus::Name | ReviewFocus::Description => {
            let text = if form.focus == ReviewFocus::Name {
                &mut request.name
            } else {
                &mut request.description
            };
            match key.code {
                KeyCode::Char(c) => {
                    text.push(c);
                    form.error = None;
                    StepAction::Stay
                }
                KeyCode::Backspace if !text.is_empty() => {
                    text.pop();
                    StepAction::Stay
                }
                KeyCode::Backspace => StepAction::PrevStep,
                _ => StepAction::Stay,
            }
        }
        ReviewFocus::AutoRetrain | ReviewFocus::Notify => match key.code {
            KeyCode::Char(' ') => {
                if form.focus == ReviewFocus::AutoRetrain {
                    request.auto_retrain = !request.auto_retrain;
                } else {
                    request.notify_on_complete = !request.notify_on_complete;
                }
                StepAction::Stay
            }
            KeyCode::Backspace => StepAction::PrevStep,
            _ => StepAction::Stay,
        },
    }
}

// ============================================================================
// Rendering Helpers
// ============================================================================

/// Create a centered rectangle with fixed dimensions
fn centered_fixed_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Get semantic color for a step
fn step_color(step: WizardStep) -> Color {
    match step {
        WizardStep::ChooseType | WizardStep::SelectData => Color::Cyan,
        WizardStep::SelectTrainingData => Color::Yellow,
        WizardStep::SetGoal => Color::Magenta,
        WizardStep::PrepareData => Color::Yellow,
        WizardStep::SelectAlgorithm | WizardStep::SaveAndTrain => Color::Green,
    }
}

fn highlight(color: Color) -> Style {
    Style::default().fg(Color::Black).bg(color).bold()
}

fn hint(text: &str) -> Span<'static> {
    Span::styled(text.to_string(), Style::default().fg(Color::DarkGray))
}

fn key_span(text: &str) -> Span<'static> {
    Span::styled(text.to_string(), Style::default().fg(Color::Cyan))
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", text),
        Style::default().fg(Color::DarkGray).bold(),
    ))
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "On"
    } else {
        "Off"
    }
}

// ============================================================================
// Main Rendering Functions
// ============================================================================

/// Render the complete wizard UI: sidebar, step box, help bar
fn render_wizard(f: &mut Frame, wizard: &WizardState) {
    let area = f.area();

    let shell_width = 100u16.min(area.width);
    let shell_height = 30u16.min(area.height);
    let shell = centered_fixed_rect(shell_width, shell_height, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(shell);

    render_header(f, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(40)])
        .split(rows[1]);

    render_sidebar(f, columns[0], wizard);

    let step = wizard.current_step();
    let color = step_color(step);
    let box_area = columns[1];
    f.render_widget(Clear, box_area);

    let title_text = format!(
        " Step {}/{} \u{00b7} {} ",
        step.number(),
        WizardStep::ALL.len(),
        step.title()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title_text)
        .title_style(Style::default().fg(color).bold())
        .title_alignment(Alignment::Center);

    let inner = block.inner(box_area);
    f.render_widget(block, box_area);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    render_step(f, body[0], wizard);
    render_error_line(f, body[1], wizard);

    if let Some(ct) = count_text(wizard) {
        let ct_len = ct.len() as u16;
        let ct_area = Rect::new(
            box_area.x + box_area.width.saturating_sub(ct_len + 1),
            box_area.y + box_area.height.saturating_sub(1),
            ct_len.min(box_area.width),
            1,
        );
        f.render_widget(
            Paragraph::new(Span::styled(ct, Style::default().fg(Color::DarkGray))),
            ct_area,
        );
    }

    render_help_bar(f, rows[2], wizard);

    if wizard.show_quit_confirm {
        render_quit_confirm_overlay(f);
    }
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled("Model Builder", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            "  configure a predictive model step by step",
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(header, area);
}

/// Step list with completed, active and upcoming markers
fn render_sidebar(f: &mut Frame, area: Rect, wizard: &WizardState) {
    let items: Vec<ListItem> = wizard
        .builder
        .steps()
        .iter()
        .map(|step| {
            let (marker, style) = if step.active {
                (
                    format!("{}", step.id),
                    Style::default().fg(Color::Cyan).bold(),
                )
            } else if step.completed {
                ("\u{2713}".to_string(), Style::default().fg(Color::Green))
            } else {
                (format!("{}", step.id), Style::default().fg(Color::DarkGray))
            };
            ListItem::new(format!(" {} {}", marker, step.title)).style(style)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Steps ")
        .title_style(Style::default().fg(Color::DarkGray));
    f.render_widget(List::new(items).block(block), area);
}

/// Gate rejection from the controller, or the active form's own error
fn render_error_line(f: &mut Frame, area: Rect, wizard: &WizardState) {
    let message = match wizard.current_step() {
        WizardStep::SetGoal => wizard.goal.error.as_ref().map(|e| e.to_string()),
        WizardStep::SaveAndTrain => wizard.review.error.as_ref().map(|e| e.to_string()),
        _ => None,
    }
    .or_else(|| wizard.builder.error_message().map(str::to_string));

    if let Some(message) = message {
        let line = Paragraph::new(Span::styled(
            format!("  {}", message),
            Style::default().fg(Color::Red).bold(),
        ));
        f.render_widget(line, area);
    }
}

fn count_text(wizard: &WizardState) -> Option<String> {
    let settings = wizard.builder.settings();
    match wizard.current_step() {
        WizardStep::SelectData => Some(format!(
            " {} selected ",
            settings.selected_data_sources.len()
        )),
        WizardStep::SelectTrainingData => Some(format!(
            " {}/{} records ",
            settings.filtered_records, settings.total_records
        )),
        WizardStep::PrepareData => Some(format!(
            " {}/{} variables ",
            wizard.prepare.settings.selected_variables.len(),
            VARIABLES.len()
        )),
        _ => None,
    }
}

/// Render the current step inside the shell box
fn render_step(f: &mut Frame, area: Rect, wizard: &WizardState) {
    match wizard.current_step() {
        WizardStep::ChooseType => render_choose_type(f, area, wizard),
        WizardStep::SelectData => render_select_data(f, area, wizard),
        WizardStep::SelectTrainingData => render_training_data(f, area, wizard),
        WizardStep::SetGoal => render_set_goal(f, area, wizard),
        WizardStep::PrepareData => render_prepare_data(f, area, wizard),
        WizardStep::SelectAlgorithm => render_select_algorithm(f, area, wizard),
        WizardStep::SaveAndTrain => render_save_and_train(f, area, wizard),
    }
}

/// Render help bar with context-appropriate shortcuts
fn render_help_bar(f: &mut Frame, area: Rect, wizard: &WizardState) {
    let step = wizard.current_step();
    let mut spans = vec![];

    let shortcuts: &[(&str, &str)] = match step {
        WizardStep::ChooseType => &[("Space", " select  ")],
        WizardStep::SelectData => &[("Space", " toggle  ")],
        WizardStep::SelectTrainingData => &[
            ("\u{2190}\u{2192}", " column  "),
            ("Space", " cycle  "),
            ("Tab", " match  "),
            ("^N/^D", " add/remove  "),
            ("Del", " chip  "),
        ],
        WizardStep::SetGoal => &[("\u{2190}\u{2192}", " change  "), ("Del", " clear  ")],
        WizardStep::PrepareData => &[
            ("Tab", " pane  "),
            ("Space", " toggle  "),
            ("Type", " search  "),
            ("^A", " autopilot  "),
        ],
        WizardStep::SelectAlgorithm => &[("Space", " select  "), ("A", " auto  ")],
        WizardStep::SaveAndTrain => &[("Tab", " field  "), ("Space", " toggle  ")],
    };

    if step.is_last() {
        spans.push(key_span("  Enter"));
        spans.push(hint(" train  "));
    } else {
        spans.push(key_span("  Enter"));
        spans.push(hint(" next  "));
    }

    for (key, label) in shortcuts {
        spans.push(key_span(key));
        spans.push(hint(label));
    }

    if step.prev().is_some() {
        spans.push(key_span("Bksp"));
        spans.push(hint(" back  "));
    }
    spans.push(key_span("^R"));
    spans.push(hint(" reset  "));
    spans.push(key_span("Esc"));
    spans.push(hint(" quit"));

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

/// Render quit confirmation overlay
fn render_quit_confirm_overlay(f: &mut Frame) {
    let popup = centered_fixed_rect(40, 8, f.area());
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Quit Wizard? ")
        .title_style(Style::default().fg(Color::Red).bold())
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Your model will not be saved.",
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("      ", Style::default()),
            key_span("Y"),
            hint(" yes  "),
            key_span("N"),
            hint(" no"),
        ]),
    ];

    f.render_widget(Paragraph::new(content), inner);
}

// ============================================================================
// Step Renderers
// ============================================================================

fn render_choose_type(f: &mut Frame, area: Rect, wizard: &WizardState) {
    let color = step_color(WizardStep::ChooseType);
    let chosen = wizard.builder.settings().selected_model_type;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    f.render_widget(
        Paragraph::new(vec![Line::from(""), heading("What kind of model do you need?")]),
        chunks[0],
    );

    let items: Vec<ListItem> = ModelType::ALL
        .iter()
        .enumerate()
        .map(|(i, model_type)| {
            let marker = if chosen == Some(*model_type) {
                "(\u{2022})"
            } else {
                "( )"
            };
            let style = if i == wizard.cursor {
                highlight(color)
            } else if chosen == Some(*model_type) {
                Style::default().fg(color)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(vec![
                Line::from(format!("  {} {}", marker, model_type.label())),
                Line::from(Span::styled(
                    format!("      {}", model_type.description()),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .style(style)
        })
        .collect();
    let mut list_state = ListState::default();
    list_state.select(Some(wizard.cursor));
    f.render_stateful_widget(List::new(items), chunks[1], &mut list_state);
}

fn render_select_data(f: &mut Frame, area: Rect, wizard: &WizardState) {
    let color = step_color(WizardStep::SelectData);
    let chosen = &wizard.builder.settings().selected_data_sources;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    f.render_widget(
        Paragraph::new(vec![Line::from(""), heading("Where is your training data?")]),
        chunks[0],
    );

    let items: Vec<ListItem> = DataSource::ALL
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let is_checked = chosen.contains(source);
            let checkbox = if is_checked { "[x]" } else { "[ ]" };
            let style = if i == wizard.cursor {
                highlight(color)
            } else if is_checked {
                Style::default().fg(color)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(vec![
                Line::from(format!("  {} {}", checkbox, source.label())),
                Line::from(Span::styled(
                    format!("      {}", source.description()),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .style(style)
        })
        .collect();
    let mut list_state = ListState::default();
    list_state.select(Some(wizard.cursor));
    f.render_stateful_widget(List::new(items), chunks[1], &mut list_state);
}

fn render_training_data(f: &mut Frame, area: Rect, wizard: &WizardState) {
    let color = step_color(WizardStep::SelectTrainingData);
    let settings = wizard.builder.settings();
    let editor = &wizard.filter;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(vec![
            Line::from(""),
            heading(&format!(
                "{} of {} records will be used ({} excluded)",
                settings.filtered_records,
                settings.total_records,
                settings.excluded_records()
            )),
            Line::from(vec![
                hint("  Condition requirement: "),
                Span::styled(
                    settings.condition_match.label(),
                    Style::default().fg(color).bold(),
                ),
            ]),
        ]),
        chunks[0],
    );

    let cell = |row: usize, column: FilterColumn, text: String| {
        let style = if row == editor.row && column == editor.column {
            highlight(color)
        } else {
            Style::default().fg(Color::White)
        };
        Span::styled(text, style)
    };

    let items: Vec<ListItem> = settings
        .filter_conditions
        .iter()
        .enumerate()
        .map(|(i, condition)| {
            let field = if condition.field.is_empty() {
                "(choose field)".to_string()
            } else {
                condition.field.clone()
            };
            let chips = if condition.value.is_empty() {
                "(no values)".to_string()
            } else {
                condition
                    .value
                    .iter()
                    .map(|v| format!("[{}]", v))
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            ListItem::new(Line::from(vec![
                hint(&format!("  {}. ", i + 1)),
                cell(i, FilterColumn::Field, field),
                Span::raw(" "),
                cell(i, FilterColumn::Operator, condition.operator.label().to_string()),
                Span::raw(" "),
                cell(i, FilterColumn::Value, chips),
            ]))
        })
        .collect();
    let mut list_state = ListState::default();
    list_state.select(Some(editor.row));
    f.render_stateful_widget(List::new(items), chunks[1], &mut list_state);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Add value ")
        .title_style(Style::default().fg(Color::DarkGray));
    let cursor = if editor.column == FilterColumn::Value {
        "\u{258c}"
    } else {
        ""
    };
    let input = Paragraph::new(Line::from(vec![
        Span::styled(editor.input.clone(), Style::default().fg(Color::White)),
        Span::styled(cursor, Style::default().fg(color)),
    ]))
    .block(input_block);
    f.render_widget(input, chunks[2]);
}

fn render_set_goal(f: &mut Frame, area: Rect, wizard: &WizardState) {
    let color = step_color(WizardStep::SetGoal);
    let form = &wizard.goal;
    let goal = &form.settings;

    let value = |text: &str| {
        if text.is_empty() {
            "(not selected)".to_string()
        } else {
            text.to_string()
        }
    };
    let rows = [
        (GoalFocus::PredictField, "Field to predict", value(&goal.predict_field)),
        (GoalFocus::Objective, "Objective", goal.objective.label().to_string()),
        (GoalFocus::TargetValue, "Target value", value(&goal.target_value)),
    ];

    let mut lines = vec![
        Line::from(""),
        heading("What do you want to predict?"),
        Line::from(""),
    ];
    for (focus, label, text) in rows {
        let style = if focus == form.focus {
            highlight(color)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(vec![
            hint(&format!("  {:<18}", label)),
            Span::styled(format!(" \u{25c2} {} \u{25b8} ", text), style),
        ]));
    }
    lines.push(Line::from(vec![
        hint(&format!("  {:<18}", "Output type")),
        Span::styled(
            format!(" {}", BINARY_CLASSIFICATION),
            Style::default().fg(Color::White),
        ),
    ]));
    if goal.validate().is_ok() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", goal.describe()),
            Style::default().fg(color),
        )));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_prepare_data(f: &mut Frame, area: Rect, wizard: &WizardState) {
    let color = step_color(WizardStep::PrepareData);
    let form = &wizard.prepare;
    let settings = &form.settings;

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    // Variables pane: search box plus checklist
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(panes[0]);

    let search_color = if form.focus == PrepareFocus::Variables {
        color
    } else {
        Color::DarkGray
    };
    let search_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(search_color))
        .title(" Search variables ")
        .title_style(Style::default().fg(search_color));
    let search_para = Paragraph::new(Line::from(vec![
        Span::styled(form.search.clone(), Style::default().fg(Color::White)),
        Span::styled("\u{258c}", Style::default().fg(search_color)),
    ]))
    .block(search_block);
    f.render_widget(search_para, left[0]);

    let max_visible = left[1].height as usize;
    let start_idx = if form.selected >= max_visible {
        form.selected - max_visible + 1
    } else {
        0
    };

    let items: Vec<ListItem> = form
        .filtered
        .iter()
        .enumerate()
        .skip(start_idx)
        .take(max_visible)
        .map(|(i, &var_idx)| {
            let variable = &VARIABLES[var_idx];
            let is_checked = settings.is_selected(variable.name);
            let checkbox = if is_checked { "[x]" } else { "[ ]" };
            let alert = if settings.alerts.get(variable.name).copied().unwrap_or(false) {
                " !"
            } else {
                ""
            };
            let badge = settings
                .settings
                .get(variable.name)
                .map(|t| format!(" \u{00b7} {}", t))
                .unwrap_or_default();
            let style = if i == form.selected && form.focus == PrepareFocus::Variables {
                highlight(color)
            } else if is_checked {
                Style::default().fg(color)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!(
                " {} {} ({}){}{}",
                checkbox, variable.name, variable.kind, badge, alert
            ))
            .style(style)
        })
        .collect();
    let mut list_state = ListState::default();
    list_state.select(Some(form.selected.saturating_sub(start_idx)));
    f.render_stateful_widget(List::new(items), left[1], &mut list_state);

    // Settings pane
    let rows = [
        ("Autopilot", on_off(settings.autopilot_enabled).to_string()),
        ("Transformation", settings.transformation.label().to_string()),
        ("Replace with", settings.replace_with.label().to_string()),
        ("Group by", settings.group_by.label().to_string()),
        (
            "Buckets",
            format!("{} ({}-{})", settings.buckets, MIN_BUCKETS, MAX_BUCKETS),
        ),
    ];
    let mut lines = vec![Line::from(""), heading("Missing values")];
    for (i, (label, text)) in rows.iter().enumerate() {
        let style = if form.focus == PrepareFocus::Settings && i == form.row {
            highlight(color)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(vec![
            hint(&format!("  {:<15}", label)),
            Span::styled(format!(" {} ", text), style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(hint(&format!(
        "  {} of {} variables selected.",
        settings.selected_variables.len(),
        VARIABLES.len()
    ))));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), panes[1]);
}

fn render_select_algorithm(f: &mut Frame, area: Rect, wizard: &WizardState) {
    let color = step_color(WizardStep::SelectAlgorithm);
    let settings = wizard.builder.settings();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    f.render_widget(
        Paragraph::new(vec![
            Line::from(""),
            heading("Which algorithm should train the model?"),
            Line::from(vec![
                hint("  Let the builder choose: "),
                Span::styled(
                    on_off(settings.automatic_selection),
                    Style::default().fg(color).bold(),
                ),
            ]),
        ]),
        chunks[0],
    );

    let items: Vec<ListItem> = Algorithm::ALL
        .iter()
        .enumerate()
        .map(|(i, algorithm)| {
            let chosen = settings.selected_algorithm == Some(*algorithm);
            let marker = if chosen { "(\u{2022})" } else { "( )" };
            let recommended = if algorithm.is_recommended() {
                "  Recommended"
            } else {
                ""
            };
            let style = if settings.automatic_selection && !chosen {
                Style::default().fg(Color::DarkGray)
            } else if i == wizard.cursor {
                highlight(color)
            } else if chosen {
                Style::default().fg(color)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(vec![
                Line::from(format!("  {} {}{}", marker, algorithm.label(), recommended)),
                Line::from(Span::styled(
                    format!("      {}", algorithm.description()),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .style(style)
        })
        .collect();
    let mut list_state = ListState::default();
    list_state.select(Some(wizard.cursor));
    f.render_stateful_widget(List::new(items), chunks[1], &mut list_state);
}

fn render_save_and_train(f: &mut Frame, area: Rect, wizard: &WizardState) {
    let color = step_color(WizardStep::SaveAndTrain);
    let form = &wizard.review;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(6)])
        .split(area);

    let mut lines = vec![Line::from("")];
    for section in wizard.builder.review() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<12}", section.title),
                Style::default().fg(color).bold(),
            ),
            Span::styled(section.summary, Style::default().fg(Color::White)),
        ]));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[0]);

    let field = |focus: ReviewFocus, label: &str, text: String| {
        let style = if focus == form.focus {
            highlight(color)
        } else {
            Style::default().fg(Color::White)
        };
        Line::from(vec![
            hint(&format!("  {:<22}", label)),
            Span::styled(format!(" {} ", text), style),
        ])
    };
    let text_cursor = |focus: ReviewFocus, text: &str| {
        if focus == form.focus {
            format!("{}\u{258c}", text)
        } else {
            text.to_string()
        }
    };

    let request = &form.request;
    let fields = vec![
        field(
            ReviewFocus::Name,
            "Model name",
            text_cursor(ReviewFocus::Name, &request.name),
        ),
        field(
            ReviewFocus::Description,
            "Description",
            text_cursor(ReviewFocus::Description, &request.description),
        ),
        field(
            ReviewFocus::AutoRetrain,
            "Retrain automatically",
            on_off(request.auto_retrain).to_string(),
        ),
        field(
            ReviewFocus::Notify,
            "Notify when complete",
            on_off(request.notify_on_complete).to_string(),
        ),
    ];
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Save & Train ")
        .title_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(fields).block(block), chunks[1]);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_str_starts_blank_at_first() {
        assert_eq!(cycle_str(PREDICT_FIELDS, "", true), PREDICT_FIELDS[0]);
        assert_eq!(cycle_str(TARGET_VALUES, "New Business", true), TARGET_VALUES[1]);
        assert_eq!(cycle_str(TARGET_VALUES, "New Business", false), TARGET_VALUES[1]);
    }

    #[test]
    fn test_step_index_clamps() {
        assert_eq!(step_index(0, 3, false), 0);
        assert_eq!(step_index(2, 3, true), 2);
        assert_eq!(step_index(0, 0, true), 0);
    }

    #[test]
    fn test_filter_column_moves() {
        assert_eq!(FilterColumn::Field.moved(true), FilterColumn::Operator);
        assert_eq!(FilterColumn::Value.moved(true), FilterColumn::Value);
        assert_eq!(FilterColumn::Field.moved(false), FilterColumn::Field);
    }
}
