//! Ordered step table of the model builder wizard

use std::fmt;

use serde::Serialize;

/// One screen of the wizard, numbered 1 through 7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum WizardStep {
    ChooseType,
    SelectData,
    SelectTrainingData,
    SetGoal,
    PrepareData,
    SelectAlgorithm,
    SaveAndTrain,
}

impl WizardStep {
    /// All steps in wizard order
    pub const ALL: [WizardStep; 7] = [
        WizardStep::ChooseType,
        WizardStep::SelectData,
        WizardStep::SelectTrainingData,
        WizardStep::SetGoal,
        WizardStep::PrepareData,
        WizardStep::SelectAlgorithm,
        WizardStep::SaveAndTrain,
    ];

    pub const FIRST: WizardStep = WizardStep::ChooseType;
    pub const LAST: WizardStep = WizardStep::SaveAndTrain;

    /// 1-based step number shown to the user
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Step for a 1-based number, `None` outside 1..=7
    pub fn from_number(number: u8) -> Option<WizardStep> {
        number
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize).copied())
    }

    /// Get the display title for this step
    pub fn title(self) -> &'static str {
        match self {
            WizardStep::ChooseType => "Choose Type",
            WizardStep::SelectData => "Select Data",
            WizardStep::SelectTrainingData => "Select Training Data",
            WizardStep::SetGoal => "Set Goal",
            WizardStep::PrepareData => "Prepare Data",
            WizardStep::SelectAlgorithm => "Select Algorithm",
            WizardStep::SaveAndTrain => "Save & Train",
        }
    }

    pub fn next(self) -> Option<WizardStep> {
        Self::from_number(self.number() + 1)
    }

    pub fn prev(self) -> Option<WizardStep> {
        Self::from_number(self.number() - 1)
    }

    pub fn is_last(self) -> bool {
        self == Self::LAST
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Sidebar entry for one step relative to the current position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDescriptor {
    pub id: u8,
    pub title: &'static str,
    pub completed: bool,
    pub active: bool,
}

/// Build the step list for the given current step
pub fn steps(current: WizardStep) -> Vec<StepDescriptor> {
    WizardStep::ALL
        .iter()
        .map(|&step| StepDescriptor {
            id: step.number(),
            title: step.title(),
            completed: step < current,
            active: step == current,
        })
        .collect()
}
