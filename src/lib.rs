//! Model Builder: guided configuration of predictive models
//!
//! A seven-step wizard (type, data, training data filters, goal, data
//! preparation, algorithm, save & train) driven by a single controller,
//! with a terminal UI, a headless command-line runner and JSON export.

pub mod builder;
pub mod cli;
pub mod report;
pub mod utils;
