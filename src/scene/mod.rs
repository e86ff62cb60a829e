//! Scene transition planning and execution.
//!
//! A [`SceneTransitionPlan`] declares which scenes to load, unload and make
//! active. A [`SceneController`] reconciles that plan with the set of scenes
//! it knows to be loaded, through a [`SceneLoader`] supplied by the
//! embedding engine.

mod builder;
mod collaborators;
mod controller;
mod error;
mod memory;
mod plan;

pub use builder::SceneControllerBuilder;
pub use collaborators::{
    AssetReclaimer, LoadingOverlay, NoOverlay, NoReclaim, SceneLoader, SceneOperation,
};
pub use controller::{ExecutionReport, SceneController, SceneFailure};
pub use error::{BuildError, PlanViolation, SceneError};
pub use memory::MemorySceneLoader;
pub use plan::SceneTransitionPlan;
