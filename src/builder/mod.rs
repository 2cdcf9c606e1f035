//! Builder module - the model builder wizard engine

pub mod catalog;
pub mod controller;
pub mod gate;
pub mod review;
pub mod settings;
pub mod steps;

pub use catalog::{
    Algorithm, CatalogEntry, ConditionMatch, DataSource, FilterOperator, GroupBy, ModelType,
    Objective, ReplaceWith, Transformation, VariableTransform, VariableType,
};
pub use controller::{ModelBuilder, Transition, WizardCommand};
pub use gate::{can_advance, GateRejection};
pub use review::{ModelSummary, ReviewError, ReviewSection, TrainRequest};
pub use settings::*;
pub use steps::{steps, StepDescriptor, WizardStep};
