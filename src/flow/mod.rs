//! Asynchronous flow engine.
//!
//! This module is the "imperative shell" around the pure core: states that
//! suspend while entering and exiting, a machine that serializes dispatched
//! events, and a per-scene controller that hosts one machine.
//!
//! # Key Concepts
//!
//! - **FlowState**: one mode of the experience, with enter/exit/tick/handle
//! - **StateMachine**: runs exit(old) then enter(new) for each requested
//!   change, one dispatch at a time, in dispatch order
//! - **SceneFlowController**: builds the initial state from a
//!   [`FlowDefinition`] and forwards frames and events

mod controller;
mod error;
mod machine;
mod state;

pub use controller::{FlowDefinition, SceneFlowController};
pub use error::FlowError;
pub use machine::{DispatchOutcome, StateMachine};
pub use state::{FlowHandle, FlowState, Next};
