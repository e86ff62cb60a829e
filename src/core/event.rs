//! Event tokens that drive flow state machines.
//!
//! Events are plain identities: no payload, compared by value. The state
//! machine never inspects them beyond handing them to the current state and
//! recording them in the transition history.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for flow events.
///
/// Events are small `Copy` values (usually fieldless enums) that distinguish
/// triggers such as "start game", "show credits" or "back".
///
/// # Required Traits
///
/// - `Copy` + `Eq`: events are compared by identity
/// - `Debug`: events appear in diagnostics
/// - `Serialize` + `Deserialize`: events are kept in serializable history
///
/// # Example
///
/// ```rust
/// use sceneflow::core::FlowEvent;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
/// enum MenuEvent {
///     StartGame,
///     ShowCredits,
///     Back,
/// }
///
/// impl FlowEvent for MenuEvent {
///     fn name(&self) -> &str {
///         match self {
///             Self::StartGame => "StartGame",
///             Self::ShowCredits => "ShowCredits",
///             Self::Back => "Back",
///         }
///     }
/// }
///
/// assert_eq!(MenuEvent::Back.name(), "Back");
/// ```
pub trait FlowEvent:
    Copy + Eq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}
