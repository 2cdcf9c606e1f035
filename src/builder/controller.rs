//! Wizard controller: the state machine driving step progression
//!
//! `ModelBuilder` owns the current step, the accumulated settings and the
//! transient error message. It is the only writer of that state; step views
//! talk to it through the typed [`WizardCommand`]s (or the equivalent
//! methods) and read it back through shared references.

use tracing::debug;

use super::catalog::{Algorithm, ConditionMatch, DataSource, FilterOperator, ModelType};
use super::gate::{can_advance, GateRejection};
use super::review::{self, ModelSummary, ReviewError, ReviewSection, TrainRequest};
use super::settings::{FilterCondition, SettingsUpdate, WizardSettings};
use super::steps::{self, StepDescriptor, WizardStep};

/// Outcome of a controller operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved forward after the gate accepted the step
    Advanced { from: WizardStep, to: WizardStep },
    /// The gate refused to leave the step; the message is stored as the error
    Blocked(GateRejection),
    /// Moved back one step
    Retreated { from: WizardStep, to: WizardStep },
    /// A field edit was applied
    Edited,
    /// Nothing changed
    Stayed,
    /// State returned to its defaults
    Reset,
}

impl Transition {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Transition::Blocked(_))
    }
}

/// Every interaction a step view can request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardCommand {
    Next,
    Back,
    Reset,
    SelectModelType(ModelType),
    AddDataSource(DataSource),
    RemoveDataSource(DataSource),
    SetConditionMatch(ConditionMatch),
    AddFilterCondition,
    RemoveFilterCondition(usize),
    SetFilterField { index: usize, field: String },
    SetFilterOperator { index: usize, operator: FilterOperator },
    AddFilterValue { index: usize, value: String },
    RemoveFilterValue { index: usize, value_index: usize },
    SetFilteredRecords(u32),
    SelectAlgorithm(Algorithm),
    SetAutomaticSelection(bool),
    /// Submit the current step's form: merge, then advance
    CompleteStep(SettingsUpdate),
}

/// Model builder wizard state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelBuilder {
    current_step: WizardStep,
    settings: WizardSettings,
    error_message: Option<String>,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self {
            current_step: WizardStep::FIRST,
            settings: WizardSettings::default(),
            error_message: None,
        }
    }
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn settings(&self) -> &WizardSettings {
        &self.settings
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Sidebar descriptors for the current position
    pub fn steps(&self) -> Vec<StepDescriptor> {
        steps::steps(self.current_step)
    }

    /// Whether "Next" would currently pass the gate
    pub fn can_advance(&self) -> bool {
        can_advance(self.current_step, &self.settings).is_ok()
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step.is_last()
    }

    /// Dispatch a command from a step view
    pub fn apply(&mut self, command: WizardCommand) -> Transition {
        match command {
            WizardCommand::Next => self.advance(),
            WizardCommand::Back => self.retreat(),
            WizardCommand::Reset => self.reset(),
            WizardCommand::SelectModelType(t) => self.select_model_type(t),
            WizardCommand::AddDataSource(s) => self.add_data_source(s),
            WizardCommand::RemoveDataSource(s) => self.remove_data_source(s),
            WizardCommand::SetConditionMatch(m) => self.set_condition_match(m),
            WizardCommand::AddFilterCondition => self.add_filter_condition(),
            WizardCommand::RemoveFilterCondition(i) => self.remove_filter_condition(i),
            WizardCommand::SetFilterField { index, field } => self.set_filter_field(index, field),
            WizardCommand::SetFilterOperator { index, operator } => {
                self.set_filter_operator(index, operator)
            }
            WizardCommand::AddFilterValue { index, value } => self.add_filter_value(index, &value),
            WizardCommand::RemoveFilterValue { index, value_index } => {
                self.remove_filter_value(index, value_index)
            }
            WizardCommand::SetFilteredRecords(n) => self.set_filtered_records(n),
            WizardCommand::SelectAlgorithm(a) => self.select_algorithm(a),
            WizardCommand::SetAutomaticSelection(on) => self.set_automatic_selection(on),
            WizardCommand::CompleteStep(update) => self.complete_step(update),
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Move to the next step if the gate for the current step passes
    pub fn advance(&mut self) -> Transition {
        if let Err(rejection) = can_advance(self.current_step, &self.settings) {
            self.error_message = Some(rejection.to_string());
            return Transition::Blocked(rejection);
        }
        self.error_message = None;

        let from = self.current_step;
        match from.next() {
            Some(to) => {
                self.current_step = to;
                debug!(from = from.number(), to = to.number(), "advanced");
                Transition::Advanced { from, to }
            }
            None => Transition::Stayed,
        }
    }

    /// Move back one step; a no-op on the first step
    pub fn retreat(&mut self) -> Transition {
        let from = self.current_step;
        match from.prev() {
            Some(to) => {
                self.error_message = None;
                self.current_step = to;
                debug!(from = from.number(), to = to.number(), "retreated");
                Transition::Retreated { from, to }
            }
            None => Transition::Stayed,
        }
    }

    /// Return to step 1 with default settings
    pub fn reset(&mut self) -> Transition {
        debug!(from = self.current_step.number(), "reset");
        *self = Self::default();
        Transition::Reset
    }

    /// Merge a step's submission and advance in one operation.
    ///
    /// The update must belong to the current step; a submission from another
    /// step is ignored.
    pub fn complete_step(&mut self, update: SettingsUpdate) -> Transition {
        if update.owner() != self.current_step {
            debug!(
                owner = update.owner().number(),
                current = self.current_step.number(),
                "ignored submission for another step"
            );
            return Transition::Stayed;
        }
        self.settings.merge(update);
        self.advance()
    }

    // ========================================================================
    // Step-local setters
    // ========================================================================

    /// Drop the displayed error after the user changed a draft form that is
    /// not yet submitted
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    fn edited(&mut self) -> Transition {
        self.error_message = None;
        Transition::Edited
    }

    pub fn select_model_type(&mut self, model_type: ModelType) -> Transition {
        self.settings.merge(SettingsUpdate::ModelType(Some(model_type)));
        self.edited()
    }

    pub fn add_data_source(&mut self, source: DataSource) -> Transition {
        if self.settings.selected_data_sources.insert(source) {
            self.edited()
        } else {
            Transition::Stayed
        }
    }

    pub fn remove_data_source(&mut self, source: DataSource) -> Transition {
        if self.settings.selected_data_sources.remove(&source) {
            self.edited()
        } else {
            Transition::Stayed
        }
    }

    pub fn set_condition_match(&mut self, condition_match: ConditionMatch) -> Transition {
        self.settings.merge(SettingsUpdate::ConditionMatch(condition_match));
        self.edited()
    }

    /// Append a blank condition
    pub fn add_filter_condition(&mut self) -> Transition {
        self.settings.filter_conditions.push(FilterCondition::default());
        self.edited()
    }

    /// Remove a condition; the first condition can never be removed
    pub fn remove_filter_condition(&mut self, index: usize) -> Transition {
        if index == 0 || index >= self.settings.filter_conditions.len() {
            return Transition::Stayed;
        }
        self.settings.filter_conditions.remove(index);
        self.edited()
    }

    pub fn set_filter_field(&mut self, index: usize, field: impl Into<String>) -> Transition {
        match self.settings.filter_conditions.get_mut(index) {
            Some(condition) => {
                condition.field = field.into();
                self.edited()
            }
            None => Transition::Stayed,
        }
    }

    pub fn set_filter_operator(&mut self, index: usize, operator: FilterOperator) -> Transition {
        match self.settings.filter_conditions.get_mut(index) {
            Some(condition) => {
                condition.operator = operator;
                self.edited()
            }
            None => Transition::Stayed,
        }
    }

    pub fn add_filter_value(&mut self, index: usize, value: &str) -> Transition {
        let added = self
            .settings
            .filter_conditions
            .get_mut(index)
            .is_some_and(|c| c.add_value(value));
        if added {
            self.edited()
        } else {
            Transition::Stayed
        }
    }

    pub fn remove_filter_value(&mut self, index: usize, value_index: usize) -> Transition {
        let removed = self
            .settings
            .filter_conditions
            .get_mut(index)
            .and_then(|c| c.remove_value(value_index));
        if removed.is_some() {
            self.edited()
        } else {
            Transition::Stayed
        }
    }

    pub fn set_filtered_records(&mut self, records: u32) -> Transition {
        self.settings.merge(SettingsUpdate::FilteredRecords(records));
        self.edited()
    }

    /// Live algorithm pick; ignored while automatic selection is enabled
    pub fn select_algorithm(&mut self, algorithm: Algorithm) -> Transition {
        if self.settings.automatic_selection {
            return Transition::Stayed;
        }
        self.settings.merge(SettingsUpdate::Algorithm(Some(algorithm)));
        self.edited()
    }

    /// Toggle automatic selection; enabling it pins the algorithm
    pub fn set_automatic_selection(&mut self, enabled: bool) -> Transition {
        self.settings.automatic_selection = enabled;
        if enabled {
            self.settings.selected_algorithm = Some(Algorithm::AUTOMATIC);
        }
        self.edited()
    }

    // ========================================================================
    // Review
    // ========================================================================

    /// Read-only summary sections for the review step
    pub fn review(&self) -> Vec<ReviewSection> {
        review::review_sections(&self.settings)
    }

    /// Terminal "Save & Train" action on the review step
    pub fn train(&self, request: TrainRequest) -> Result<ModelSummary, ReviewError> {
        review::train(self.current_step, &self.settings, request)
    }
}
