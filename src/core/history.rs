//! Flow transition history.
//!
//! Provides immutable tracking of completed state changes, following the
//! same record-returns-a-new-value discipline as the rest of the core.

use super::event::FlowEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single completed transition.
///
/// States are transient objects, so the record keeps their names rather
/// than the states themselves.
///
/// # Example
///
/// ```rust
/// use sceneflow::flow_event;
/// use sceneflow::core::TransitionRecord;
/// use chrono::Utc;
///
/// flow_event! {
///     enum MenuEvent { ShowCredits }
/// }
///
/// let record = TransitionRecord {
///     from: "Home".to_string(),
///     to: "Credits".to_string(),
///     event: MenuEvent::ShowCredits,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, "Credits");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<E: FlowEvent> {
    /// Name of the state that was exited
    pub from: String,
    /// Name of the state that was entered
    pub to: String,
    /// The event whose handler requested the change
    pub event: E,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of completed transitions.
///
/// `record` returns a new history with the transition appended; the
/// original is left untouched.
///
/// # Example
///
/// ```rust
/// use sceneflow::flow_event;
/// use sceneflow::core::{TransitionHistory, TransitionRecord};
/// use chrono::Utc;
///
/// flow_event! {
///     enum MenuEvent { ShowCredits, Back }
/// }
///
/// let history = TransitionHistory::new()
///     .record(TransitionRecord {
///         from: "Home".to_string(),
///         to: "Credits".to_string(),
///         event: MenuEvent::ShowCredits,
///         timestamp: Utc::now(),
///     })
///     .record(TransitionRecord {
///         from: "Credits".to_string(),
///         to: "Home".to_string(),
///         event: MenuEvent::Back,
///         timestamp: Utc::now(),
///     });
///
/// assert_eq!(history.get_path(), vec!["Home", "Credits", "Home"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionHistory<E: FlowEvent> {
    transitions: Vec<TransitionRecord<E>>,
}

impl<E: FlowEvent> Default for TransitionHistory<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: FlowEvent> TransitionHistory<E> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: TransitionRecord<E>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Get the path of state names traversed.
    ///
    /// The first entry is the `from` of the first transition, followed by
    /// the `to` of every transition.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(first.from.as_str());
        }
        for transition in &self.transitions {
            path.push(transition.to.as_str());
        }
        path
    }

    /// Events that caused a state change, in order.
    pub fn events(&self) -> Vec<E> {
        self.transitions.iter().map(|t| t.event).collect()
    }

    /// Time between the first and last recorded transition.
    ///
    /// Returns `None` if nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all transitions.
    pub fn transitions(&self) -> &[TransitionRecord<E>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
