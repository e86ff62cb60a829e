//! Errors raised by flow states and the state machine.

use thiserror::Error;

/// Errors that can occur while driving a flow state machine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FlowError {
    #[error("State machine has no current state. Call .set_initial_state(state) first")]
    NotInitialized,

    #[error("State machine already initialized in state '{current}'")]
    AlreadyInitialized { current: String },

    #[error("Initial state could not be created: {0}")]
    MissingInitialState(String),

    #[error("State '{state}' failed: {reason}")]
    StateFailed { state: String, reason: String },

    #[error("State machine was dropped before the event could be dispatched")]
    MachineDropped,

    #[error("Transition aborted before completing: {0}")]
    Aborted(String),
}

impl FlowError {
    /// Shorthand for a failure raised by a state's own logic.
    pub fn state(state: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StateFailed {
            state: state.into(),
            reason: reason.into(),
        }
    }
}
