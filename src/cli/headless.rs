//! Non-interactive wizard run driven by command-line flags
//!
//! Walks the same controller the TUI uses, one step at a time, issuing the
//! commands a user would. A gate rejection stops the run with the wizard's
//! own message.

use anyhow::{bail, Result};
use tracing::info;

use super::args::Cli;
use crate::builder::{
    GoalSettings, ModelBuilder, ModelSummary, PrepareDataUpdate, SettingsUpdate, TrainRequest,
    Transition, WizardCommand, WizardStep,
};

/// Apply the step 1-3 choices and the algorithm pick from the command line
pub fn prefill(builder: &mut ModelBuilder, cli: &Cli) {
    if let Some(model_type) = cli.model_type {
        builder.apply(WizardCommand::SelectModelType(model_type));
    }
    for source in &cli.data_sources {
        builder.apply(WizardCommand::AddDataSource(*source));
    }

    for (index, filter) in cli.filters.iter().enumerate() {
        if builder.settings().filter_conditions.len() <= index {
            builder.apply(WizardCommand::AddFilterCondition);
        }
        // The seeded first row is reused; start it from a clean value list
        let existing = builder
            .settings()
            .filter_conditions
            .get(index)
            .map_or(0, |c| c.value.len());
        for value_index in (0..existing).rev() {
            builder.apply(WizardCommand::RemoveFilterValue { index, value_index });
        }
        builder.apply(WizardCommand::SetFilterField {
            index,
            field: filter.field.clone(),
        });
        builder.apply(WizardCommand::SetFilterOperator {
            index,
            operator: filter.operator,
        });
        for value in &filter.value {
            builder.apply(WizardCommand::AddFilterValue {
                index,
                value: value.clone(),
            });
        }
    }
    builder.apply(WizardCommand::SetConditionMatch(cli.condition_match));

    if cli.auto_algorithm {
        builder.apply(WizardCommand::SetAutomaticSelection(true));
    } else if let Some(algorithm) = cli.algorithm {
        builder.apply(WizardCommand::SelectAlgorithm(algorithm));
    }
}

/// Goal form as the user would fill it: defaults overridden by flags
pub fn goal_draft(cli: &Cli) -> GoalSettings {
    let mut goal = GoalSettings::default();
    if let Some(field) = &cli.predict_field {
        goal.predict_field = field.clone();
    }
    if let Some(value) = &cli.target_value {
        goal.target_value = value.clone();
    }
    if let Some(objective) = cli.objective {
        goal.objective = objective;
    }
    goal
}

/// Partial preparation settings carrying only the flags that were given
pub fn prepare_update(cli: &Cli) -> PrepareDataUpdate {
    PrepareDataUpdate {
        selected_variables: cli.variables.as_ref().map(|vars| {
            vars.iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect()
        }),
        autopilot_enabled: cli.no_autopilot.then_some(false),
        transformation: cli.transformation,
        replace_with: cli.replace_with,
        group_by: cli.group_by,
        buckets: cli.buckets,
        ..Default::default()
    }
}

/// Model name and training options from the command line
pub fn train_request(cli: &Cli) -> TrainRequest {
    TrainRequest {
        name: cli.name.clone().unwrap_or_default(),
        description: cli.description.clone(),
        auto_retrain: !cli.no_retrain,
        notify_on_complete: !cli.no_notify,
    }
}

fn expect_advance(transition: Transition, step: WizardStep) -> Result<()> {
    match transition {
        Transition::Advanced { .. } => Ok(()),
        Transition::Blocked(rejection) => bail!(
            "Step {} ({}): {}",
            step.number(),
            step.title(),
            rejection
        ),
        other => bail!(
            "Step {} ({}) did not advance: {:?}",
            step.number(),
            step.title(),
            other
        ),
    }
}

/// Run every wizard step from the command-line choices and train the model
pub fn run_headless(cli: &Cli) -> Result<ModelSummary> {
    let mut builder = ModelBuilder::new();
    prefill(&mut builder, cli);

    while !builder.is_last_step() {
        let step = builder.current_step();
        let transition = match step {
            WizardStep::SetGoal => {
                let goal = goal_draft(cli);
                if let Err(e) = goal.validate() {
                    bail!("Step {} ({}): {}", step.number(), step.title(), e);
                }
                builder.apply(WizardCommand::CompleteStep(SettingsUpdate::Goal(goal)))
            }
            WizardStep::PrepareData => builder.apply(WizardCommand::CompleteStep(
                SettingsUpdate::PrepareData(prepare_update(cli)),
            )),
            WizardStep::SelectAlgorithm => {
                let algorithm = builder.settings().selected_algorithm;
                builder.apply(WizardCommand::CompleteStep(SettingsUpdate::Algorithm(
                    algorithm,
                )))
            }
            _ => builder.apply(WizardCommand::Next),
        };
        expect_advance(transition, step)?;
    }

    let summary = builder.train(train_request(cli))?;
    info!(name = %summary.name, algorithm = %summary.algorithm, "model ready for training");
    Ok(summary)
}
