//! Terminal styling utilities for messages printed outside the wizard

use std::path::Path;

use console::{style, Emoji};

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("◆").magenta().bold(),
        style("MODEL BUILDER").cyan().bold()
    );
    println!(
        "    {}",
        style("Configure a predictive model step by step").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning to stderr
pub fn print_warning(message: &str) {
    eprintln!("    {} {}", WARN, style(message).yellow());
}

/// Print where the model summary was written
pub fn print_saved(path: &Path) {
    println!(
        "    {} Model summary saved to {}",
        SAVE,
        style(truncate_path(path, 60)).cyan()
    );
}

/// Print the final completion message
pub fn print_completion(model_name: &str) {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style(format!("Model '{}' submitted for training!", model_name))
            .green()
            .bold()
    );
    println!();
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    let chars: Vec<char> = path_str.chars().collect();
    if chars.len() <= max_len {
        path_str
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
