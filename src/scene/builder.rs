//! Builder for constructing scene controllers.

use crate::config::{FlowConfig, PlanDefaults};
use crate::scene::collaborators::{
    AssetReclaimer, LoadingOverlay, NoOverlay, NoReclaim, SceneLoader,
};
use crate::scene::controller::SceneController;
use crate::scene::error::BuildError;
use std::collections::HashSet;
use std::sync::Arc;

/// Builder for constructing a [`SceneController`] with a fluent API.
///
/// Only the loader is required. Without an overlay or reclaimer the
/// controller uses [`NoOverlay`] and [`NoReclaim`].
pub struct SceneControllerBuilder {
    loader: Option<Arc<dyn SceneLoader>>,
    overlay: Option<Arc<dyn LoadingOverlay>>,
    reclaimer: Option<Arc<dyn AssetReclaimer>>,
    defaults: PlanDefaults,
    preloaded: Vec<String>,
    protected: Vec<String>,
}

impl SceneControllerBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            loader: None,
            overlay: None,
            reclaimer: None,
            defaults: PlanDefaults::default(),
            preloaded: Vec::new(),
            protected: Vec::new(),
        }
    }

    /// Set the scene loader (required).
    pub fn loader(mut self, loader: Arc<dyn SceneLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Set the loading overlay (optional).
    pub fn overlay(mut self, overlay: Arc<dyn LoadingOverlay>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Set the asset reclaimer (optional).
    pub fn reclaimer(mut self, reclaimer: Arc<dyn AssetReclaimer>) -> Self {
        self.reclaimer = Some(reclaimer);
        self
    }

    /// Flags given to plans started with [`SceneController::plan`].
    pub fn defaults(mut self, defaults: PlanDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Record a scene that is already resident, such as the hosting scene.
    pub fn preloaded(mut self, scene: impl Into<String>) -> Self {
        self.preloaded.push(scene.into());
        self
    }

    /// Protect a scene from unloading from the start.
    pub fn protect(mut self, scene_name: impl Into<String>) -> Self {
        self.protected.push(scene_name.into());
        self
    }

    /// Apply protected scenes, preloaded scenes and plan defaults from
    /// configuration.
    pub fn config(mut self, config: &FlowConfig) -> Self {
        self.defaults = config.plan_defaults.clone();
        self.preloaded.extend(config.preloaded_scenes.iter().cloned());
        self.protected.extend(config.protected_scenes.iter().cloned());
        self
    }

    /// Build the controller.
    /// Returns an error if the loader is missing or a scene name is empty.
    pub fn build(self) -> Result<SceneController, BuildError> {
        let loader = self.loader.ok_or(BuildError::MissingLoader)?;

        if self.preloaded.iter().any(|s| s.trim().is_empty()) {
            return Err(BuildError::EmptySceneName("preloaded"));
        }
        if self.protected.iter().any(|s| s.trim().is_empty()) {
            return Err(BuildError::EmptySceneName("protect"));
        }

        let loaded: HashSet<String> = self.preloaded.into_iter().collect();
        let protected: HashSet<String> = self.protected.into_iter().collect();

        Ok(SceneController::from_parts(
            loader,
            self.overlay.unwrap_or_else(|| Arc::new(NoOverlay)),
            self.reclaimer.unwrap_or_else(|| Arc::new(NoReclaim)),
            self.defaults,
            loaded,
            protected,
        ))
    }
}

impl Default for SceneControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
