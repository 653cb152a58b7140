//! Error types for the Prism recommendation engine.
//!
//! Fallible operations inside the engine return `PrismResult<T>`. The
//! `Browser` session absorbs these into well-defined empty states, so callers
//! at the presentation boundary never see them as failures.

use thiserror::Error;

use crate::catalog::Dataset;

/// The unified error type for the Prism crates.
#[derive(Debug, Error)]
pub enum PrismError {
    /// One of the three catalog datasets could not be fetched.
    #[error("failed to load {dataset}: {reason}")]
    LoadFailed { dataset: Dataset, reason: String },

    /// A phase was requested that the active condition does not define.
    #[error("phase '{phase}' is not defined for condition '{condition}'")]
    InvalidPhase { phase: String, condition: String },

    /// A phase or patient-type view change arrived while nothing is selected.
    #[error("no condition is currently selected")]
    NoActiveCondition,

    /// The requested condition is not part of the current filtered set.
    #[error("condition '{id}' is not in the filtered catalog")]
    UnknownCondition { id: String },

    /// A condition record failed semantic validation.
    #[error("condition '{id}' is invalid: {reason}")]
    InvalidCondition { id: String, reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A catalog document failed JSON Schema validation.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },

    /// Session output could not be rendered for the presentation boundary.
    #[error("failed to render output: {reason}")]
    Render { reason: String },
}

/// Convenience alias used throughout the Prism crates.
pub type PrismResult<T> = Result<T, PrismError>;
