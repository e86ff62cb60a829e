//! Sceneflow: serialized flow-state machines and scene transition plans
//!
//! Sceneflow drives the screen and scene flow of an interactive application
//! from outside any particular engine. The engine supplies a frame tick, a
//! scene loader and cosmetic collaborators; sceneflow decides what runs when.
//!
//! # Core Concepts
//!
//! - **FlowEvent**: opaque trigger tokens (`flow_event!` derives them)
//! - **FlowState**: one mode of the experience with async enter/exit
//! - **StateMachine**: runs dispatched events strictly one after another
//! - **SceneTransitionPlan**: a declarative batch of loads, unloads and
//!   activation, executed by a **SceneController**
//!
//! # Example
//!
//! ```rust
//! use sceneflow::flow::{FlowError, FlowState, Next, StateMachine};
//! use sceneflow::flow_event;
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! flow_event! {
//!     enum MenuEvent { ShowCredits, Back }
//! }
//!
//! struct Home;
//! struct Credits;
//!
//! #[async_trait]
//! impl FlowState<MenuEvent> for Home {
//!     fn name(&self) -> &str { "Home" }
//!
//!     fn handle(&self, event: MenuEvent) -> Result<Next<MenuEvent>, FlowError> {
//!         match event {
//!             MenuEvent::ShowCredits => Ok(Next::goto(Credits)),
//!             MenuEvent::Back => Ok(Next::Stay),
//!         }
//!     }
//! }
//!
//! #[async_trait]
//! impl FlowState<MenuEvent> for Credits {
//!     fn name(&self) -> &str { "Credits" }
//!
//!     fn handle(&self, event: MenuEvent) -> Result<Next<MenuEvent>, FlowError> {
//!         match event {
//!             MenuEvent::Back => Ok(Next::goto(Home)),
//!             MenuEvent::ShowCredits => Ok(Next::Stay),
//!         }
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let machine = StateMachine::new();
//! machine.set_initial_state(Arc::new(Home)).await.unwrap();
//! machine.dispatch(MenuEvent::ShowCredits).await;
//! assert_eq!(machine.current_name().as_deref(), Some("Credits"));
//! # });
//! ```

// `flow_event!` names serde through this path, including inside this crate.
extern crate self as sceneflow;

pub mod config;
pub mod core;
pub mod flow;
pub mod scene;
mod worker;

#[doc(hidden)]
pub use serde as __serde;

// Re-export commonly used types
pub use config::{FlowConfig, PlanDefaults};
pub use core::{FlowEvent, TransitionHistory, TransitionRecord};
pub use flow::{
    DispatchOutcome, FlowDefinition, FlowError, FlowHandle, FlowState, Next, SceneFlowController,
    StateMachine,
};
pub use scene::{
    ExecutionReport, SceneController, SceneError, SceneLoader, SceneTransitionPlan,
};
