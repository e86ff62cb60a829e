//! Main Menu Flow
//!
//! This example drives a main menu through a scene flow controller.
//!
//! Key concepts:
//! - Transient states built by `handle`
//! - Async enter/exit hooks
//! - Serialized dispatch (a double click enters Credits once)
//! - Loading a scene without leaving the menu
//!
//! Run with: cargo run --example main_menu

use async_trait::async_trait;
use sceneflow::flow::{
    FlowDefinition, FlowError, FlowHandle, FlowState, Next, SceneFlowController,
};
use sceneflow::flow_event;
use sceneflow::scene::{MemorySceneLoader, SceneController, SceneLoader};
use std::sync::Arc;

flow_event! {
    enum MenuEvent {
        StartGame,
        ShowCredits,
        Back,
    }
}

struct Home {
    scenes: Arc<SceneController>,
}

struct Credits {
    scenes: Arc<SceneController>,
}

#[async_trait]
impl FlowState<MenuEvent> for Home {
    fn name(&self) -> &str {
        "Home"
    }

    async fn enter(&self) -> Result<(), FlowError> {
        println!("  [Home] main panel shown");
        Ok(())
    }

    async fn exit(&self) -> Result<(), FlowError> {
        println!("  [Home] main panel hidden");
        Ok(())
    }

    fn handle(&self, event: MenuEvent) -> Result<Next<MenuEvent>, FlowError> {
        match event {
            MenuEvent::ShowCredits => Ok(Next::goto(Credits {
                scenes: Arc::clone(&self.scenes),
            })),
            MenuEvent::StartGame => {
                let scenes = Arc::clone(&self.scenes);
                let plan = scenes.plan().load("Game").set_active("Game");
                tokio::spawn(async move {
                    match scenes.execute(plan).await {
                        Ok(report) => println!("  [Scenes] loaded {:?}", report.loaded),
                        Err(err) => println!("  [Scenes] plan rejected: {}", err),
                    }
                });
                Ok(Next::Stay)
            }
            MenuEvent::Back => Ok(Next::Stay),
        }
    }
}

#[async_trait]
impl FlowState<MenuEvent> for Credits {
    fn name(&self) -> &str {
        "Credits"
    }

    async fn enter(&self) -> Result<(), FlowError> {
        println!("  [Credits] fading in");
        tokio::task::yield_now().await;
        println!("  [Credits] shown");
        Ok(())
    }

    async fn exit(&self) -> Result<(), FlowError> {
        println!("  [Credits] hidden");
        Ok(())
    }

    fn handle(&self, event: MenuEvent) -> Result<Next<MenuEvent>, FlowError> {
        match event {
            MenuEvent::Back => Ok(Next::goto(Home {
                scenes: Arc::clone(&self.scenes),
            })),
            _ => Ok(Next::Stay),
        }
    }
}

struct MainMenu {
    scenes: Arc<SceneController>,
}

impl FlowDefinition<MenuEvent> for MainMenu {
    fn create_initial_state(
        &self,
        _handle: FlowHandle<MenuEvent>,
    ) -> Result<Arc<dyn FlowState<MenuEvent>>, FlowError> {
        Ok(Arc::new(Home {
            scenes: Arc::clone(&self.scenes),
        }))
    }
}

#[tokio::main]
async fn main() {
    println!("=== Main Menu Flow ===\n");

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

    let controller = SceneFlowController::new(MainMenu {
        scenes: Arc::new(scenes),
    });
    controller.start().await.unwrap();
    println!("Started in: {:?}\n", controller.current_name());

    println!("Double click on Credits:");
    let (first, second) = tokio::join!(
        controller.dispatch(MenuEvent::ShowCredits),
        controller.dispatch(MenuEvent::ShowCredits),
    );
    println!("  first:  {:?}", first);
    println!("  second: {:?}\n", second);

    println!("Back:");
    controller.dispatch(MenuEvent::Back).await;

    println!("\nStart game:");
    controller.dispatch(MenuEvent::StartGame).await;
    while !loader.is_loaded("Game") {
        tokio::task::yield_now().await;
    }
    println!("  still in: {:?}", controller.current_name());
    println!("  active scene: {:?}", loader.active_scene());

    println!("\nPath: {:?}", controller.machine().history().get_path());

    println!("\n=== Example Complete ===");
}
