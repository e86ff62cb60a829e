//! Main menu fixture shared by the integration tests.
//!
//! Home, Credits and Settings pages wired the way a game's main menu is:
//! Home opens Credits or Settings, Back returns Home, and StartGame loads
//! the game scene without leaving Home.

#![allow(dead_code)]

use async_trait::async_trait;
use sceneflow::flow::{FlowDefinition, FlowError, FlowHandle, FlowState, Next};
use sceneflow::scene::{
    ExecutionReport, MemorySceneLoader, SceneController, SceneError, SceneLoader,
};
use sceneflow::flow_event;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

flow_event! {
    pub enum MainMenuEvent {
        StartGame,
        ShowCredits,
        ShowSettings,
        Back,
    }
}

#[derive(Default)]
pub struct Panel {
    visible: AtomicBool,
    shown: AtomicUsize,
}

impl Panel {
    pub fn show(&self) {
        self.visible.store(true, Ordering::SeqCst);
        self.shown.fetch_add(1, Ordering::SeqCst);
    }

    pub fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    pub fn times_shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }
}

pub struct MenuContext {
    pub main: Panel,
    pub credits: Panel,
    pub settings: Panel,
    pub scenes: Arc<SceneController>,
    pub loader: Arc<MemorySceneLoader>,
    journal: Mutex<Vec<String>>,
    pending_load: Mutex<Option<JoinHandle<Result<ExecutionReport, SceneError>>>>,
}

impl MenuContext {
    pub fn new() -> Arc<Self> {
        let loader = Arc::new(
            MemorySceneLoader::new(["Core", "MainMenu", "Game"]).with_loaded(["Core", "MainMenu"]),
        );
        let scenes = SceneController::builder()
            .loader(Arc::clone(&loader) as Arc<dyn SceneLoader>)
            .preloaded("Core")
            .preloaded("MainMenu")
            .protect("Core")
            .build()
            .unwrap();

        Arc::new(Self {
            main: Panel::default(),
            credits: Panel::default(),
            settings: Panel::default(),
            scenes: Arc::new(scenes),
            loader,
            journal: Mutex::new(Vec::new()),
            pending_load: Mutex::new(None),
        })
    }

    pub fn journal(&self) -> Vec<String> {
        self.journal.lock().unwrap().clone()
    }

    pub fn clear_journal(&self) {
        self.journal.lock().unwrap().clear();
    }

    pub fn count(&self, entry: &str) -> usize {
        self.journal().iter().filter(|e| e.as_str() == entry).count()
    }

    pub async fn wait_for_game_load(&self) -> Option<Result<ExecutionReport, SceneError>> {
        let pending = self.pending_load.lock().unwrap().take()?;
        Some(pending.await.unwrap())
    }

    async fn phase(&self, phase: &str, state: &str) {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:{}:begin", phase, state));
        tokio::task::yield_now().await;
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:{}:end", phase, state));
    }
}

pub struct HomeState {
    ctx: Arc<MenuContext>,
}

pub struct CreditsState {
    ctx: Arc<MenuContext>,
}

pub struct SettingsState {
    ctx: Arc<MenuContext>,
}

#[async_trait]
impl FlowState<MainMenuEvent> for HomeState {
    fn name(&self) -> &str {
        "Home"
    }

    async fn enter(&self) -> Result<(), FlowError> {
        self.ctx.main.show();
        self.ctx.credits.hide();
        self.ctx.phase("enter", "Home").await;
        Ok(())
    }

    async fn exit(&self) -> Result<(), FlowError> {
        self.ctx.phase("exit", "Home").await;
        Ok(())
    }

    fn handle(&self, event: MainMenuEvent) -> Result<Next<MainMenuEvent>, FlowError> {
        match event {
            MainMenuEvent::StartGame => {
                let scenes = Arc::clone(&self.ctx.scenes);
                let plan = scenes.plan().load("Game").set_active("Game");
                let pending = tokio::spawn(async move { scenes.execute(plan).await });
                *self.ctx.pending_load.lock().unwrap() = Some(pending);
                Ok(Next::Stay)
            }
            MainMenuEvent::ShowCredits => Ok(Next::goto(CreditsState {
                ctx: Arc::clone(&self.ctx),
            })),
            MainMenuEvent::ShowSettings => Ok(Next::goto(SettingsState {
                ctx: Arc::clone(&self.ctx),
            })),
            MainMenuEvent::Back => Ok(Next::Stay),
        }
    }
}

#[async_trait]
impl FlowState<MainMenuEvent> for CreditsState {
    fn name(&self) -> &str {
        "Credits"
    }

    async fn enter(&self) -> Result<(), FlowError> {
        self.ctx.credits.show();
        self.ctx.phase("enter", "Credits").await;
        Ok(())
    }

    async fn exit(&self) -> Result<(), FlowError> {
        self.ctx.credits.hide();
        self.ctx.phase("exit", "Credits").await;
        Ok(())
    }

    fn handle(&self, event: MainMenuEvent) -> Result<Next<MainMenuEvent>, FlowError> {
        match event {
            MainMenuEvent::Back => Ok(Next::goto(HomeState {
                ctx: Arc::clone(&self.ctx),
            })),
            _ => Ok(Next::Stay),
        }
    }
}

#[async_trait]
impl FlowState<MainMenuEvent> for SettingsState {
    fn name(&self) -> &str {
        "Settings"
    }

    async fn enter(&self) -> Result<(), FlowError> {
        self.ctx.credits.hide();
        self.ctx.settings.show();
        self.ctx.phase("enter", "Settings").await;
        Ok(())
    }

    async fn exit(&self) -> Result<(), FlowError> {
        self.ctx.settings.hide();
        self.ctx.phase("exit", "Settings").await;
        Ok(())
    }

    fn handle(&self, event: MainMenuEvent) -> Result<Next<MainMenuEvent>, FlowError> {
        match event {
            MainMenuEvent::Back => Ok(Next::goto(HomeState {
                ctx: Arc::clone(&self.ctx),
            })),
            _ => Ok(Next::Stay),
        }
    }
}

pub struct MainMenuFlow {
    pub ctx: Arc<MenuContext>,
}

impl FlowDefinition<MainMenuEvent> for MainMenuFlow {
    fn create_initial_state(
        &self,
        _handle: FlowHandle<MainMenuEvent>,
    ) -> Result<Arc<dyn FlowState<MainMenuEvent>>, FlowError> {
        Ok(Arc::new(HomeState {
            ctx: Arc::clone(&self.ctx),
        }))
    }
}

/// Assert the journal is a run of begin/end pairs with nothing in between.
pub fn assert_no_interleaving(journal: &[String]) {
    assert_eq!(journal.len() % 2, 0, "unbalanced journal: {:?}", journal);
    for pair in journal.chunks(2) {
        let begin = pair[0].strip_suffix(":begin").expect("expected a begin entry");
        let end = pair[1].strip_suffix(":end").expect("expected an end entry");
        assert_eq!(begin, end, "interleaved journal: {:?}", journal);
    }
}
