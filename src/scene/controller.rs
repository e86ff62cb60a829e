//! Executes scene transition plans against a scene loader.

use crate::config::PlanDefaults;
use crate::scene::builder::SceneControllerBuilder;
use crate::scene::collaborators::{AssetReclaimer, LoadingOverlay, SceneLoader, SceneOperation};
use crate::scene::error::SceneError;
use crate::scene::plan::SceneTransitionPlan;
use crate::worker::Mailbox;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;
use uuid::Uuid;

/// A scene operation that the loader rejected
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneFailure {
    pub scene: String,
    pub operation: SceneOperation,
    pub reason: String,
}

/// What one plan execution actually did.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExecutionReport {
    pub plan_id: Uuid,

    /// Scenes loaded by this execution
    pub loaded: Vec<String>,

    /// Scenes unloaded by this execution
    pub unloaded: Vec<String>,

    /// Load targets skipped because they were already loaded
    pub already_loaded: Vec<String>,

    /// Unload targets skipped because they were not loaded
    pub not_loaded: Vec<String>,

    /// Unload targets dropped because they are protected
    pub protected: Vec<String>,

    /// Operations the loader rejected
    pub failed: Vec<SceneFailure>,

    /// Active scene applied after the batch
    pub active_scene: Option<String>,

    /// Active target that was requested but not loaded
    pub missing_active_scene: Option<String>,
}

impl ExecutionReport {
    fn new(plan_id: Uuid) -> Self {
        Self {
            plan_id,
            loaded: Vec::new(),
            unloaded: Vec::new(),
            already_loaded: Vec::new(),
            not_loaded: Vec::new(),
            protected: Vec::new(),
            failed: Vec::new(),
            active_scene: None,
            missing_active_scene: None,
        }
    }

    /// Whether every requested operation went through.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.protected.is_empty() && self.missing_active_scene.is_none()
    }
}

/// Tracks which scenes are loaded and reconciles them with plans.
///
/// Executions are serialized: plans run one at a time, in the order
/// `execute` was called, each fading its overlay back out before the next
/// starts. Within one execution every unload completes before the first
/// load starts, and each set runs one scene at a time.
///
/// Plans run on a worker task, so abandoning the future returned by
/// `execute` never leaves a plan half done: the overlay still fades out and
/// every load and unload is recorded.
///
/// Scenes marked unloadable are never unloaded by a plan; they are dropped
/// from the unload set with a warning.
pub struct SceneController {
    scenes: Arc<Scenes>,
    mailbox: Mailbox<Execution>,
}

struct Execution {
    plan: SceneTransitionPlan,
    reply: oneshot::Sender<ExecutionReport>,
}

/// Bookkeeping shared with the worker task.
struct Scenes {
    loader: Arc<dyn SceneLoader>,
    overlay: Arc<dyn LoadingOverlay>,
    reclaimer: Arc<dyn AssetReclaimer>,
    defaults: PlanDefaults,
    loaded: RwLock<HashSet<String>>,
    protected: RwLock<HashSet<String>>,
}

impl SceneController {
    pub fn builder() -> SceneControllerBuilder {
        SceneControllerBuilder::new()
    }

    pub(crate) fn from_parts(
        loader: Arc<dyn SceneLoader>,
        overlay: Arc<dyn LoadingOverlay>,
        reclaimer: Arc<dyn AssetReclaimer>,
        defaults: PlanDefaults,
        loaded: HashSet<String>,
        protected: HashSet<String>,
    ) -> Self {
        Self {
            scenes: Arc::new(Scenes {
                loader,
                overlay,
                reclaimer,
                defaults,
                loaded: RwLock::new(loaded),
                protected: RwLock::new(protected),
            }),
            mailbox: Mailbox::new(),
        }
    }

    /// Start a plan using this controller's configured defaults.
    pub fn plan(&self) -> SceneTransitionPlan {
        SceneTransitionPlan::with_defaults(&self.scenes.defaults)
    }

    /// Whether `scene` is loaded according to this controller.
    pub fn is_loaded(&self, scene: &str) -> bool {
        self.scenes.is_loaded(scene)
    }

    /// Loaded scene ids, sorted.
    pub fn loaded_scenes(&self) -> Vec<String> {
        let mut scenes: Vec<String> = self.scenes.loaded_read().iter().cloned().collect();
        scenes.sort();
        scenes
    }

    /// Protect a scene from being unloaded by any plan.
    pub fn mark_scene_as_unloadable(&self, scene_name: &str) {
        if scene_name.trim().is_empty() {
            warn!("Cannot mark an empty scene name as unloadable");
            return;
        }

        if self.scenes.protected_write().insert(scene_name.to_string()) {
            info!("Scene '{}' marked as unloadable", scene_name);
        } else {
            debug!("Scene '{}' already marked as unloadable", scene_name);
        }
    }

    /// Lift the protection set by [`mark_scene_as_unloadable`](Self::mark_scene_as_unloadable).
    pub fn unmark_scene_as_unloadable(&self, scene_name: &str) {
        if scene_name.trim().is_empty() {
            warn!("Cannot unmark an empty scene name");
            return;
        }

        if self.scenes.protected_write().remove(scene_name) {
            info!("Scene '{}' unmarked as unloadable", scene_name);
        } else {
            warn!("Scene '{}' was not marked as unloadable", scene_name);
        }
    }

    /// Whether `scene_name` is protected from unloading.
    pub fn is_scene_unloadable(&self, scene_name: &str) -> bool {
        self.scenes.is_scene_unloadable(scene_name)
    }

    /// Run a plan to completion.
    ///
    /// Only an invalid plan is an error, and it is rejected before anything
    /// changes. Loader failures, protected unload targets and a missing
    /// active target are logged and listed in the report.
    ///
    /// The plan is queued before this returns.
    pub fn execute(
        &self,
        plan: SceneTransitionPlan,
    ) -> impl Future<Output = Result<ExecutionReport, SceneError>> + Send + 'static {
        let plan_id = plan.id();
        let queued = self.enqueue(plan);
        async move {
            queued?
                .await
                .map_err(|_| SceneError::Aborted(plan_id.to_string()))
        }
    }

    fn enqueue(
        &self,
        plan: SceneTransitionPlan,
    ) -> Result<oneshot::Receiver<ExecutionReport>, SceneError> {
        if let Err(violations) = plan.check() {
            for violation in &violations {
                error!("Scene plan {} rejected: {}", plan.id(), violation);
            }
            return Err(SceneError::InvalidPlan(violations));
        }

        let plan_id = plan.id();
        let (reply, report) = oneshot::channel();
        let scenes = Arc::clone(&self.scenes);
        self.mailbox
            .send(Execution { plan, reply }, move |queue| drain(scenes, queue))
            .map_err(|_| {
                error!("Scene worker is gone; dropping plan {}", plan_id);
                SceneError::Aborted(plan_id.to_string())
            })?;
        Ok(report)
    }
}

/// Worker loop: one plan at a time, each in its own task so a panicking
/// loader only loses that plan.
async fn drain(scenes: Arc<Scenes>, mut queue: UnboundedReceiver<Execution>) {
    while let Some(Execution { plan, reply }) = queue.recv().await {
        let plan_id = plan.id();
        let scenes = Arc::clone(&scenes);
        let task = tokio::spawn(async move {
            let report = scenes.run(plan).await;
            let _ = reply.send(report);
        });
        if let Err(err) = task.await {
            error!("Scene plan {} aborted: {}", plan_id, err);
        }
    }
    debug!("Scene worker stopped");
}

impl Scenes {
    fn loaded_read(&self) -> RwLockReadGuard<'_, HashSet<String>> {
        self.loaded.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn loaded_write(&self) -> RwLockWriteGuard<'_, HashSet<String>> {
        self.loaded.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn protected_read(&self) -> RwLockReadGuard<'_, HashSet<String>> {
        self.protected.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn protected_write(&self) -> RwLockWriteGuard<'_, HashSet<String>> {
        self.protected.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_loaded(&self, scene: &str) -> bool {
        self.loaded_read().contains(scene)
    }

    fn is_scene_unloadable(&self, scene_name: &str) -> bool {
        !scene_name.trim().is_empty() && self.protected_read().contains(scene_name)
    }

    /// Protection applies to the id itself and to its file stem, so
    /// protecting `Core` also covers `Assets/Scenes/Core.unity`.
    fn is_protected(&self, scene: &str) -> bool {
        if self.is_scene_unloadable(scene) {
            return true;
        }
        Path::new(scene)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| self.is_scene_unloadable(stem))
    }

    async fn run(&self, plan: SceneTransitionPlan) -> ExecutionReport {
        info!(
            "Executing scene plan {} (load {:?}, unload {:?})",
            plan.id(),
            plan.to_load(),
            plan.to_unload()
        );
        let mut report = ExecutionReport::new(plan.id());

        if plan.use_overlay() {
            self.overlay.fade_in().await;
        }

        let mut to_load = Vec::new();
        for scene in plan.to_load() {
            if self.is_loaded(scene) {
                debug!("Skipping load of '{}': already loaded", scene);
                report.already_loaded.push(scene.clone());
            } else {
                to_load.push(scene.clone());
            }
        }

        let mut to_unload = Vec::new();
        for scene in plan.to_unload() {
            if !self.is_loaded(scene) {
                debug!("Skipping unload of '{}': not loaded", scene);
                report.not_loaded.push(scene.clone());
            } else if self.is_protected(scene) {
                warn!("Prevented unloading of protected scene '{}'", scene);
                report.protected.push(scene.clone());
            } else {
                to_unload.push(scene.clone());
            }
        }

        for scene in to_unload {
            match self.loader.unload(&scene).await {
                Ok(()) => {
                    self.loaded_write().remove(&scene);
                    debug!("Unloaded scene '{}'", scene);
                    report.unloaded.push(scene);
                }
                Err(err) => {
                    error!("Failed to unload scene '{}': {}", scene, err);
                    report.failed.push(SceneFailure {
                        scene,
                        operation: SceneOperation::Unload,
                        reason: err.to_string(),
                    });
                }
            }
        }

        for scene in to_load {
            match self.loader.load_additive(&scene).await {
                Ok(()) => {
                    self.loaded_write().insert(scene.clone());
                    debug!("Loaded scene '{}'", scene);
                    report.loaded.push(scene);
                }
                Err(err) => {
                    error!("Failed to load scene '{}': {}", scene, err);
                    report.failed.push(SceneFailure {
                        scene,
                        operation: SceneOperation::Load,
                        reason: err.to_string(),
                    });
                }
            }
        }

        if let Some(active) = plan.active_scene() {
            self.apply_active_scene(active, &mut report);
        }

        if plan.clean_unused_assets() {
            debug!("Reclaiming unused assets");
            self.reclaimer.reclaim_unused().await;
        }

        if plan.use_overlay() {
            self.overlay.fade_out().await;
        }

        info!(
            "Scene plan {} done: {} loaded, {} unloaded, {} failed",
            report.plan_id,
            report.loaded.len(),
            report.unloaded.len(),
            report.failed.len()
        );
        report
    }

    fn apply_active_scene(&self, active: &str, report: &mut ExecutionReport) {
        if !self.is_loaded(active) && !self.loader.is_loaded(active) {
            warn!("Active target not loaded: {}", active);
            report.missing_active_scene = Some(active.to_string());
            return;
        }

        match self.loader.set_active(active) {
            Ok(()) => {
                debug!("Active scene is now '{}'", active);
                report.active_scene = Some(active.to_string());
            }
            Err(err) => {
                error!("Failed to activate scene '{}': {}", active, err);
                report.failed.push(SceneFailure {
                    scene: active.to_string(),
                    operation: SceneOperation::SetActive,
                    reason: err.to_string(),
                });
            }
        }
    }
}
