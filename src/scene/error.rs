//! Scene errors, plan violations and controller build errors.

use thiserror::Error;

/// Errors reported by a scene loader or the scene controller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SceneError {
    #[error("Scene '{0}' not found")]
    NotFound(String),

    #[error("Loading scene '{scene}' failed: {reason}")]
    LoadFailed { scene: String, reason: String },

    #[error("Unloading scene '{scene}' failed: {reason}")]
    UnloadFailed { scene: String, reason: String },

    #[error("Scene '{0}' is not loaded")]
    NotLoaded(String),

    #[error("Scene plan rejected with {} violation(s)", .0.len())]
    InvalidPlan(Vec<PlanViolation>),

    #[error("Scene plan {0} aborted before completing")]
    Aborted(String),
}

/// A problem found while validating a [`SceneTransitionPlan`](super::SceneTransitionPlan).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlanViolation {
    #[error("Load set contains an empty scene name")]
    EmptyLoadTarget,

    #[error("Unload set contains an empty scene name")]
    EmptyUnloadTarget,

    #[error("Active scene target is an empty name")]
    EmptyActiveTarget,
}

/// Errors that can occur when building a scene controller.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Scene loader not specified. Call .loader(loader) before .build()")]
    MissingLoader,

    #[error("Empty scene name passed to .{0}()")]
    EmptySceneName(&'static str),
}
