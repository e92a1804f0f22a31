//! Container App Manifest Library
//!
//! Creates and inspects cloud container apps from declarative YAML/JSON
//! manifests. The centerpiece is the override resolver: values in the
//! manifest always win over command-line overrides, and a disagreement
//! produces a warning instead of an error.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
