//! Per-step validation gate
//!
//! Decides whether the wizard may move past a step. The gate is a pure
//! predicate over the settings; storing the rejection message is the
//! controller's job.

use thiserror::Error;

use super::settings::WizardSettings;
use super::steps::WizardStep;

/// Reason the wizard cannot leave the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateRejection {
    #[error("Please select a model type to continue.")]
    MissingModelType,
    #[error("Please select at least one data source to continue.")]
    MissingDataSource,
    #[error("Please set a goal to continue.")]
    MissingGoal,
    #[error("Please select at least one variable to continue.")]
    MissingVariables,
    #[error("Please select an algorithm or enable automatic selection to continue.")]
    MissingAlgorithm,
}

impl GateRejection {
    /// Step that produced this rejection
    pub fn step(&self) -> WizardStep {
        match self {
            GateRejection::MissingModelType => WizardStep::ChooseType,
            GateRejection::MissingDataSource => WizardStep::SelectData,
            GateRejection::MissingGoal => WizardStep::SetGoal,
            GateRejection::MissingVariables => WizardStep::PrepareData,
            GateRejection::MissingAlgorithm => WizardStep::SelectAlgorithm,
        }
    }
}

/// Check whether `step` may be left with the given settings
pub fn can_advance(step: WizardStep, settings: &WizardSettings) -> Result<(), GateRejection> {
    match step {
        WizardStep::ChooseType if settings.selected_model_type.is_none() => {
            Err(GateRejection::MissingModelType)
        }
        WizardStep::SelectData if settings.selected_data_sources.is_empty() => {
            Err(GateRejection::MissingDataSource)
        }
        WizardStep::SetGoal if settings.goal_settings.is_none() => Err(GateRejection::MissingGoal),
        WizardStep::PrepareData
            if settings
                .prepare_data_settings
                .selected_variables
                .is_empty() =>
        {
            Err(GateRejection::MissingVariables)
        }
        WizardStep::SelectAlgorithm if settings.selected_algorithm.is_none() => {
            Err(GateRejection::MissingAlgorithm)
        }
        // Training data filters are optional; the review step is submitted
        // through `train`, not the gate.
        _ => Ok(()),
    }
}
