//! Core flow types.
//!
//! This module contains the pure part of the crate:
//! - Event definitions via the `FlowEvent` trait
//! - The `flow_event!` macro for plain event enums
//! - Immutable transition history
//!
//! Nothing in here suspends or performs I/O; the asynchronous shell lives
//! in [`crate::flow`] and [`crate::scene`].

mod event;
mod history;
mod macros;

pub use event::FlowEvent;
pub use history::{TransitionHistory, TransitionRecord};
