//! Model Builder CLI
//!
//! Walks the user through configuring a predictive model, either in an
//! interactive terminal wizard or headless from command-line flags, and
//! writes the resulting model summary as JSON.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use model_builder::builder::ModelSummary;
use model_builder::cli::{confirm_overwrite, run_headless, run_wizard, Cli, WizardResult};
use model_builder::report::{display_summary, export_model_summary};
use model_builder::utils::logging;
use model_builder::utils::{
    create_spinner, finish_with_error, finish_with_success, print_banner, print_completion,
    print_info, print_saved, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = !cli.no_confirm;

    if let Err(e) = logging::init(cli.log_file.as_deref(), cli.verbose, interactive) {
        print_warning(&format!("Logging disabled: {}", e));
    }

    // Either the TUI or the flags produce the model summary
    let summary: ModelSummary = if interactive {
        match run_wizard(&cli)? {
            WizardResult::Train(summary) => *summary,
            WizardResult::Quit => {
                println!("Cancelled by user.");
                return Ok(());
            }
        }
    } else {
        run_headless(&cli)?
    };

    print_banner(env!("CARGO_PKG_VERSION"));

    let output_path = cli.output_path(&summary.name);
    if interactive && output_path.exists() && !confirm_overwrite(&output_path)? {
        print_info("Model summary not saved.");
        return Ok(());
    }

    let spinner = create_spinner("Saving model summary...");
    if let Err(e) = export_model_summary(&summary, &output_path) {
        finish_with_error(&spinner, "Saving failed");
        return Err(e);
    }
    finish_with_success(&spinner, "Model summary saved");
    info!(path = %output_path.display(), "model summary written");
    print_saved(&output_path);

    display_summary(&summary);
    print_completion(&summary.name);

    Ok(())
}
