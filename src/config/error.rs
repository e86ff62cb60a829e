//! Configuration error types.

use crate::scene::PlanViolation;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading flow configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration parsed but failed validation
    #[error("Config validation failed with {} violation(s)", .0.len())]
    Invalid(Vec<ConfigViolation>),
}

/// A single problem found while validating a [`FlowConfig`](super::FlowConfig)
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("Protected scene list contains an empty name")]
    EmptyProtectedScene,

    #[error("Preloaded scene list contains an empty name")]
    EmptyPreloadedScene,

    #[error("Boot plan: {0}")]
    BootPlan(PlanViolation),
}
