//! Utility module - logging, progress and terminal styling

pub mod logging;
pub mod progress;
pub mod styling;

pub use progress::*;
pub use styling::*;
