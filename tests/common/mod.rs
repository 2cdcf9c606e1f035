//! Shared test utilities for driving the model builder

#![allow(dead_code)]

use model_builder::builder::{
    DataSource, GoalSettings, ModelBuilder, ModelType, PrepareDataUpdate, SettingsUpdate,
    Transition, WizardCommand, WizardStep,
};

/// Goal used by tests that just need step 4 to pass
pub fn sample_goal() -> GoalSettings {
    GoalSettings::default()
}

/// Drive a fresh builder through the gates until `target` is the current step.
///
/// Every step is completed with the choices a user would make: a scratch
/// model, CSV data, the default goal, the default variables and GLM.
pub fn builder_at(target: WizardStep) -> ModelBuilder {
    let mut builder = ModelBuilder::new();
    while builder.current_step() < target {
        let transition = match builder.current_step() {
            WizardStep::ChooseType => {
                builder.apply(WizardCommand::SelectModelType(ModelType::Scratch));
                builder.apply(WizardCommand::Next)
            }
            WizardStep::SelectData => {
                builder.apply(WizardCommand::AddDataSource(DataSource::Csv));
                builder.apply(WizardCommand::Next)
            }
            WizardStep::SelectTrainingData => builder.apply(WizardCommand::Next),
            WizardStep::SetGoal => builder.apply(WizardCommand::CompleteStep(
                SettingsUpdate::Goal(sample_goal()),
            )),
            WizardStep::PrepareData => builder.apply(WizardCommand::CompleteStep(
                SettingsUpdate::PrepareData(PrepareDataUpdate::default()),
            )),
            WizardStep::SelectAlgorithm => builder.apply(WizardCommand::CompleteStep(
                SettingsUpdate::Algorithm(builder.settings().selected_algorithm),
            )),
            WizardStep::SaveAndTrain => break,
        };
        assert!(
            matches!(transition, Transition::Advanced { .. }),
            "expected to advance, got {:?}",
            transition
        );
    }
    assert_eq!(builder.current_step(), target);
    builder
}
