//! Engine-facing interfaces the scene controller drives.
//!
//! The controller only talks to these narrow traits, never to engine scene
//! objects, so it runs the same against a real engine, a headless server or
//! a test double.

use crate::scene::error::SceneError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of operation performed on a scene
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneOperation {
    Load,
    Unload,
    SetActive,
}

impl fmt::Display for SceneOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load => f.write_str("load"),
            Self::Unload => f.write_str("unload"),
            Self::SetActive => f.write_str("set-active"),
        }
    }
}

/// Loads and unloads engine scenes.
#[async_trait]
pub trait SceneLoader: Send + Sync {
    /// Load `scene` next to the scenes already resident.
    async fn load_additive(&self, scene: &str) -> Result<(), SceneError>;

    /// Unload `scene`, resolving once the engine reports it gone.
    async fn unload(&self, scene: &str) -> Result<(), SceneError>;

    /// Mark a loaded scene as the active one.
    fn set_active(&self, scene: &str) -> Result<(), SceneError>;

    /// Whether the engine currently has `scene` loaded.
    fn is_loaded(&self, scene: &str) -> bool;
}

/// Cosmetic mask shown while a batch runs.
#[async_trait]
pub trait LoadingOverlay: Send + Sync {
    async fn fade_in(&self);
    async fn fade_out(&self);
}

/// Reclaims assets no longer referenced by any loaded scene.
#[async_trait]
pub trait AssetReclaimer: Send + Sync {
    async fn reclaim_unused(&self);
}

/// Overlay that shows nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOverlay;

#[async_trait]
impl LoadingOverlay for NoOverlay {
    async fn fade_in(&self) {}
    async fn fade_out(&self) {}
}

/// Reclaimer that frees nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoReclaim;

#[async_trait]
impl AssetReclaimer for NoReclaim {
    async fn reclaim_unused(&self) {}
}
