//! Declarative batches of scene loads, unloads and activation.

use crate::config::PlanDefaults;
use crate::scene::error::PlanViolation;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use uuid::Uuid;

fn enabled() -> bool {
    true
}

/// A batch of scene changes executed as one unit.
///
/// Built by chaining onto [`SceneTransitionPlan::begin`]. Loads and unloads
/// are sets, so naming a scene twice has no extra effect; the active target
/// and the two flags keep the last value given. Executing a plan consumes
/// it.
///
/// # Example
///
/// ```rust
/// use sceneflow::scene::SceneTransitionPlan;
///
/// let plan = SceneTransitionPlan::begin()
///     .unload("MainMenu")
///     .load("Session")
///     .load("Session")
///     .set_active("Session")
///     .with_cleanup(false);
///
/// assert_eq!(plan.to_load().len(), 1);
/// assert!(plan.use_overlay());
/// assert!(!plan.clean_unused_assets());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneTransitionPlan {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,

    #[serde(default)]
    to_load: HashSet<String>,

    #[serde(default)]
    to_unload: HashSet<String>,

    #[serde(default)]
    active_scene: Option<String>,

    #[serde(default = "enabled")]
    use_overlay: bool,

    #[serde(default = "enabled")]
    clean_unused_assets: bool,
}

impl SceneTransitionPlan {
    /// Start an empty plan with the overlay and asset cleanup enabled.
    pub fn begin() -> Self {
        Self {
            id: Uuid::new_v4(),
            to_load: HashSet::new(),
            to_unload: HashSet::new(),
            active_scene: None,
            use_overlay: true,
            clean_unused_assets: true,
        }
    }

    /// Start an empty plan using configured defaults for the flags.
    pub fn with_defaults(defaults: &PlanDefaults) -> Self {
        Self::begin()
            .with_overlay(defaults.use_overlay)
            .with_cleanup(defaults.clean_unused_assets)
    }

    /// Load `scene` additively.
    pub fn load(mut self, scene: impl Into<String>) -> Self {
        self.to_load.insert(scene.into());
        self
    }

    /// Unload `scene`.
    pub fn unload(mut self, scene: impl Into<String>) -> Self {
        self.to_unload.insert(scene.into());
        self
    }

    /// Make `scene` the active scene once loads and unloads are done.
    pub fn set_active(mut self, scene: impl Into<String>) -> Self {
        self.active_scene = Some(scene.into());
        self
    }

    /// Fade a loading overlay in and out around the batch.
    pub fn with_overlay(mut self, on: bool) -> Self {
        self.use_overlay = on;
        self
    }

    /// Reclaim unused assets after the batch.
    pub fn with_cleanup(mut self, on: bool) -> Self {
        self.clean_unused_assets = on;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn to_load(&self) -> &HashSet<String> {
        &self.to_load
    }

    pub fn to_unload(&self) -> &HashSet<String> {
        &self.to_unload
    }

    pub fn active_scene(&self) -> Option<&str> {
        self.active_scene.as_deref()
    }

    pub fn use_overlay(&self) -> bool {
        self.use_overlay
    }

    pub fn clean_unused_assets(&self) -> bool {
        self.clean_unused_assets
    }

    /// Whether the plan changes any scene at all.
    pub fn is_empty(&self) -> bool {
        self.to_load.is_empty() && self.to_unload.is_empty() && self.active_scene.is_none()
    }

    /// Validate the plan, accumulating every violation.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<PlanViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<PlanViolation>>> = Vec::new();

        if self.to_load.iter().any(|s| s.trim().is_empty()) {
            checks.push(Validation::fail(PlanViolation::EmptyLoadTarget));
        }

        if self.to_unload.iter().any(|s| s.trim().is_empty()) {
            checks.push(Validation::fail(PlanViolation::EmptyUnloadTarget));
        }

        if self
            .active_scene
            .as_deref()
            .is_some_and(|s| s.trim().is_empty())
        {
            checks.push(Validation::fail(PlanViolation::EmptyActiveTarget));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// [`validate`](Self::validate) as a `Result` listing every violation.
    pub fn check(&self) -> Result<(), Vec<PlanViolation>> {
        match self.validate() {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
        }
    }
}

impl Default for SceneTransitionPlan {
    fn default() -> Self {
        Self::begin()
    }
}
