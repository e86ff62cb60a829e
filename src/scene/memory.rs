//! Headless scene loader backed by an in-memory catalog.

use crate::scene::collaborators::{SceneLoader, SceneOperation};
use crate::scene::error::SceneError;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Registry {
    loaded: HashSet<String>,
    active: Option<String>,
    operations: Vec<(SceneOperation, String)>,
}

/// A [`SceneLoader`] with no engine behind it.
///
/// Knows a fixed catalog of scene ids; loading anything else fails with
/// [`SceneError::NotFound`]. Scenes registered with
/// [`with_failing`](Self::with_failing) are in the catalog but the engine
/// refuses to load or unload them. Every call is yielded once to the scheduler to
/// behave like an engine operation that completes on a later frame, and is
/// recorded in order.
pub struct MemorySceneLoader {
    catalog: HashSet<String>,
    failing: HashSet<String>,
    registry: Mutex<Registry>,
}

impl MemorySceneLoader {
    pub fn new<I, S>(catalog: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            catalog: catalog.into_iter().map(Into::into).collect(),
            failing: HashSet::new(),
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Make every load and unload of `scenes` fail.
    pub fn with_failing<I, S>(mut self, scenes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing.extend(scenes.into_iter().map(Into::into));
        self
    }

    /// Mark scenes as resident before any plan runs.
    pub fn with_loaded<I, S>(self, scenes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().loaded.extend(scenes.into_iter().map(Into::into));
        self
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Operations performed so far, in order.
    pub fn operations(&self) -> Vec<(SceneOperation, String)> {
        self.lock().operations.clone()
    }

    /// The scene last marked active.
    pub fn active_scene(&self) -> Option<String> {
        self.lock().active.clone()
    }

    pub fn loaded_scenes(&self) -> Vec<String> {
        let mut scenes: Vec<String> = self.lock().loaded.iter().cloned().collect();
        scenes.sort();
        scenes
    }
}

#[async_trait]
impl SceneLoader for MemorySceneLoader {
    async fn load_additive(&self, scene: &str) -> Result<(), SceneError> {
        tokio::task::yield_now().await;
        if !self.catalog.contains(scene) {
            return Err(SceneError::NotFound(scene.to_string()));
        }
        if self.failing.contains(scene) {
            return Err(SceneError::LoadFailed {
                scene: scene.to_string(),
                reason: "engine refused the load".to_string(),
            });
        }
        let mut registry = self.lock();
        registry
            .operations
            .push((SceneOperation::Load, scene.to_string()));
        registry.loaded.insert(scene.to_string());
        Ok(())
    }

    async fn unload(&self, scene: &str) -> Result<(), SceneError> {
        tokio::task::yield_now().await;
        let mut registry = self.lock();
        if !registry.loaded.contains(scene) {
            return Err(SceneError::NotLoaded(scene.to_string()));
        }
        if self.failing.contains(scene) {
            return Err(SceneError::UnloadFailed {
                scene: scene.to_string(),
                reason: "engine refused the unload".to_string(),
            });
        }
        registry.loaded.remove(scene);
        registry
            .operations
            .push((SceneOperation::Unload, scene.to_string()));
        if registry.active.as_deref() == Some(scene) {
            registry.active = None;
        }
        Ok(())
    }

    fn set_active(&self, scene: &str) -> Result<(), SceneError> {
        let mut registry = self.lock();
        if !registry.loaded.contains(scene) {
            return Err(SceneError::NotLoaded(scene.to_string()));
        }
        registry
            .operations
            .push((SceneOperation::SetActive, scene.to_string()));
        registry.active = Some(scene.to_string());
        Ok(())
    }

    fn is_loaded(&self, scene: &str) -> bool {
        self.lock().loaded.contains(scene)
    }
}
