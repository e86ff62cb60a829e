//! Boot Sequence
//!
//! This example brings up an application from a persistent Core scene,
//! through a Session scene, to the main menu.
//!
//! Key concepts:
//! - Configuration-driven boot plan
//! - Protected scenes survive unload requests
//! - Unloads run before loads inside one plan
//!
//! Run with: cargo run --example boot_sequence

use sceneflow::config::FlowConfig;
use sceneflow::scene::{MemorySceneLoader, SceneController, SceneLoader};
use std::sync::Arc;

const CONFIG: &str = r#"{
    "protected_scenes": ["Core"],
    "preloaded_scenes": ["Core"],
    "plan_defaults": { "use_overlay": true, "clean_unused_assets": false },
    "boot_plan": { "to_load": ["Session"], "use_overlay": false }
}"#;

#[tokio::main]
async fn main() {
    println!("=== Boot Sequence ===\n");

    let config = FlowConfig::from_json_str(CONFIG).unwrap();
    let loader = Arc::new(
        MemorySceneLoader::new(["Core", "Session", "MainMenu", "Game"]).with_loaded(["Core"]),
    );
    let scenes = SceneController::builder()
        .loader(Arc::clone(&loader) as Arc<dyn SceneLoader>)
        .config(&config)
        .build()
        .unwrap();
    println!("Loaded at start: {:?}\n", scenes.loaded_scenes());

    if let Some(boot) = config.boot_plan.clone() {
        let report = scenes.execute(boot).await.unwrap();
        println!("Core -> Session: loaded {:?}", report.loaded);
    }

    scenes.mark_scene_as_unloadable("Session");
    let report = scenes
        .execute(scenes.plan().load("MainMenu").set_active("MainMenu"))
        .await
        .unwrap();
    println!("Session -> MainMenu: loaded {:?}", report.loaded);
    println!("Active scene: {:?}\n", loader.active_scene());

    println!("Entering the game, asking to unload everything else:");
    let report = scenes
        .execute(
            scenes
                .plan()
                .unload("Core")
                .unload("Session")
                .unload("MainMenu")
                .load("Game")
                .set_active("Game"),
        )
        .await
        .unwrap();
    println!("  unloaded:  {:?}", report.unloaded);
    println!("  protected: {:?}", report.protected);
    println!("  loaded:    {:?}", report.loaded);
    println!("  resident:  {:?}", scenes.loaded_scenes());

    println!("\nLoader operations:");
    for (operation, scene) in loader.operations() {
        println!("  {} {}", operation, scene);
    }

    println!("\n=== Example Complete ===");
}
