//! Logging setup for the application.
//!
//! The interactive wizard owns the terminal, so log events go to a file when
//! one is given. Headless runs without a log file write to stderr instead.

use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to create or open the log file.
    #[error("Failed to open log file at {path}: {source}")]
    OpenLogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to set the global tracing subscriber.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(tracing::subscriber::SetGlobalDefaultError),
}

/// Where log events end up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
    Disabled,
}

/// Pick the log destination for a run
pub fn log_target(log_file: Option<&Path>, interactive: bool) -> LogTarget {
    match log_file {
        Some(path) => LogTarget::File(path.to_path_buf()),
        None if interactive => LogTarget::Disabled,
        None => LogTarget::Stderr,
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `verbose`. Failures are returned so the
/// caller can carry on without logging.
pub fn init(log_file: Option<&Path>, verbose: bool, interactive: bool) -> Result<(), LoggingError> {
    let env_filter = build_env_filter(verbose);

    match log_target(log_file, interactive) {
        LogTarget::File(path) => {
            let file = open_log_file(&path)?;
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file));
            let subscriber = Registry::default().with(env_filter).with(file_layer);
            tracing::subscriber::set_global_default(subscriber)
                .map_err(LoggingError::SetGlobal)?;
            tracing::info!("Logging initialized; log file at {}", path.display());
        }
        LogTarget::Stderr => {
            let stderr_layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            let subscriber = Registry::default().with(env_filter).with(stderr_layer);
            tracing::subscriber::set_global_default(subscriber)
                .map_err(LoggingError::SetGlobal)?;
        }
        LogTarget::Disabled => {}
    }
    Ok(())
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::OpenLogFile {
            path: path.to_path_buf(),
            source,
        })
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}
