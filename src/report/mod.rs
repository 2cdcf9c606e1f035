//! Report module - presenting and exporting the trained model configuration

pub mod model_export;
pub mod summary;

pub use model_export::*;
pub use summary::*;
