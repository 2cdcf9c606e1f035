//! CLI module - argument parsing, interactive wizard and prompts

mod args;
pub mod headless;
mod prompts;
pub mod wizard;

pub use args::{slug, Cli};
pub use headless::run_headless;
pub use prompts::*;
pub use wizard::{run_wizard, WizardResult};
