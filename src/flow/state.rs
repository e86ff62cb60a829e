//! Flow states and the handle they use to reach their machine.

use crate::core::FlowEvent;
use crate::flow::error::FlowError;
use crate::flow::machine::{DispatchOutcome, StateMachine};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};

/// One mode of a scene or UI experience.
///
/// A state is entered once when it becomes current and exited once when it
/// stops being current. While current it receives `tick` once per external
/// frame and `handle` for every dispatched event.
///
/// States are transient: `handle` usually builds a fresh destination state
/// carrying whatever collaborators it needs, rather than picking one from a
/// fixed pool. Methods take `&self`, so a state that changes while active
/// keeps that data behind interior mutability.
///
/// # Example
///
/// ```rust
/// use sceneflow::flow::{FlowError, FlowState, Next};
/// use sceneflow::flow_event;
/// use async_trait::async_trait;
///
/// flow_event! {
///     enum MenuEvent { ShowCredits, Back }
/// }
///
/// struct Home;
/// struct Credits;
///
/// #[async_trait]
/// impl FlowState<MenuEvent> for Home {
///     fn name(&self) -> &str {
///         "Home"
///     }
///
///     fn handle(&self, event: MenuEvent) -> Result<Next<MenuEvent>, FlowError> {
///         match event {
///             MenuEvent::ShowCredits => Ok(Next::goto(Credits)),
///             MenuEvent::Back => Ok(Next::Stay),
///         }
///     }
/// }
///
/// #[async_trait]
/// impl FlowState<MenuEvent> for Credits {
///     fn name(&self) -> &str {
///         "Credits"
///     }
///
///     fn handle(&self, event: MenuEvent) -> Result<Next<MenuEvent>, FlowError> {
///         match event {
///             MenuEvent::Back => Ok(Next::goto(Home)),
///             MenuEvent::ShowCredits => Ok(Next::Stay),
///         }
///     }
/// }
/// ```
///
/// # Nested flows
///
/// A state can own a machine of its own for a modal or sub-flow (a settings
/// screen with its own pages). The outer state starts the inner machine on
/// `enter`, forwards frames on `tick` and shuts it down on `exit`.
///
/// ```rust
/// use sceneflow::flow::{FlowError, FlowState, Next, StateMachine};
/// use sceneflow::flow_event;
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// flow_event! {
///     enum MenuEvent { ShowSettings, Back }
/// }
///
/// flow_event! {
///     enum SettingsEvent { ShowSound }
/// }
///
/// struct Display;
/// struct Sound;
///
/// #[async_trait]
/// impl FlowState<SettingsEvent> for Display {
///     fn name(&self) -> &str { "Display" }
///
///     fn handle(&self, _event: SettingsEvent) -> Result<Next<SettingsEvent>, FlowError> {
///         Ok(Next::goto(Sound))
///     }
/// }
///
/// #[async_trait]
/// impl FlowState<SettingsEvent> for Sound {
///     fn name(&self) -> &str { "Sound" }
/// }
///
/// struct Settings {
///     pages: Arc<StateMachine<SettingsEvent>>,
/// }
///
/// #[async_trait]
/// impl FlowState<MenuEvent> for Settings {
///     fn name(&self) -> &str { "Settings" }
///
///     async fn enter(&self) -> Result<(), FlowError> {
///         self.pages.set_initial_state(Arc::new(Display)).await
///     }
///
///     async fn exit(&self) -> Result<(), FlowError> {
///         self.pages.shutdown().await
///     }
///
///     fn tick(&self) {
///         self.pages.tick();
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let pages = Arc::new(StateMachine::new());
/// let menu = StateMachine::<MenuEvent>::new();
/// menu.set_initial_state(Arc::new(Settings { pages: Arc::clone(&pages) }))
///     .await
///     .unwrap();
///
/// pages.dispatch(SettingsEvent::ShowSound).await;
/// assert_eq!(pages.current_name().as_deref(), Some("Sound"));
///
/// menu.shutdown().await.unwrap();
/// assert!(!pages.is_ready());
/// # });
/// ```
#[async_trait]
pub trait FlowState<E: FlowEvent>: Send + Sync {
    /// Get the state's name for logging and history.
    fn name(&self) -> &str;

    /// Called when the state becomes current.
    ///
    /// May suspend (fades, frame waits). Only the very first state of a
    /// machine is entered without a preceding `exit`.
    async fn enter(&self) -> Result<(), FlowError> {
        Ok(())
    }

    /// Called when the state stops being current, before the next state's
    /// `enter`.
    async fn exit(&self) -> Result<(), FlowError> {
        Ok(())
    }

    /// Called once per external frame while current. Must not block.
    fn tick(&self) {}

    /// Decide what an event means in this state.
    ///
    /// Must be a pure function of the state and the event.
    fn handle(&self, _event: E) -> Result<Next<E>, FlowError> {
        Ok(Next::Stay)
    }
}

/// The result of [`FlowState::handle`].
pub enum Next<E: FlowEvent> {
    /// Remain in the current state; no exit/enter cycle runs.
    Stay,

    /// Transition to another state.
    Goto(Arc<dyn FlowState<E>>),
}

impl<E: FlowEvent> Next<E> {
    /// Transition to a freshly built state.
    pub fn goto<S>(state: S) -> Self
    where
        S: FlowState<E> + 'static,
    {
        Self::Goto(Arc::new(state))
    }

    pub fn is_stay(&self) -> bool {
        matches!(self, Self::Stay)
    }
}

impl<E: FlowEvent> fmt::Debug for Next<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stay => f.write_str("Stay"),
            Self::Goto(state) => f.debug_tuple("Goto").field(&state.name()).finish(),
        }
    }
}

/// Weak reference from a state back to its owning machine.
///
/// States live inside the machine, so they hold this instead of an `Arc`
/// to avoid a reference cycle.
pub struct FlowHandle<E: FlowEvent> {
    machine: Weak<StateMachine<E>>,
}

impl<E: FlowEvent> FlowHandle<E> {
    pub(crate) fn new(machine: Weak<StateMachine<E>>) -> Self {
        Self { machine }
    }

    /// Dispatch an event and wait for its outcome.
    ///
    /// The event is queued before this returns. Never await the result from
    /// inside the same machine's `enter` or `exit`: the dispatch runs after
    /// the transition that is awaiting it. Use [`FlowHandle::post`] there.
    pub fn dispatch(
        &self,
        event: E,
    ) -> impl Future<Output = Result<DispatchOutcome, FlowError>> + Send + 'static {
        let queued = self
            .machine
            .upgrade()
            .map(|machine| machine.dispatch(event))
            .ok_or(FlowError::MachineDropped);
        async move { Ok::<_, FlowError>(queued?.await) }
    }

    /// Queue an event on the machine without waiting for it.
    ///
    /// Events posted one after another run in posting order, behind every
    /// command already queued. Safe to call from `enter` and `exit`.
    pub fn post(&self, event: E) -> Result<(), FlowError> {
        let machine = self.machine.upgrade().ok_or(FlowError::MachineDropped)?;
        drop(machine.dispatch(event));
        Ok(())
    }

    /// Whether the owning machine is still alive.
    pub fn is_attached(&self) -> bool {
        self.machine.strong_count() > 0
    }
}

impl<E: FlowEvent> Clone for FlowHandle<E> {
    fn clone(&self) -> Self {
        Self {
            machine: Weak::clone(&self.machine),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::flow_event! {
        enum TestEvent {
            Go,
            Ignore,
        }
    }

    struct Start;
    struct End;

    #[async_trait]
    impl FlowState<TestEvent> for Start {
        fn name(&self) -> &str {
            "Start"
        }

        fn handle(&self, event: TestEvent) -> Result<Next<TestEvent>, FlowError> {
            match event {
                TestEvent::Go => Ok(Next::goto(End)),
                TestEvent::Ignore => Ok(Next::Stay),
            }
        }
    }

    #[async_trait]
    impl FlowState<TestEvent> for End {
        fn name(&self) -> &str {
            "End"
        }
    }

    #[test]
    fn handle_builds_destination_state() {
        let next = Start.handle(TestEvent::Go).unwrap();
        match next {
            Next::Goto(state) => assert_eq!(state.name(), "End"),
            Next::Stay => panic!("Expected Goto"),
        }
    }

    #[test]
    fn default_handle_stays() {
        assert!(End.handle(TestEvent::Go).unwrap().is_stay());
        assert!(Start.handle(TestEvent::Ignore).unwrap().is_stay());
    }

    #[tokio::test]
    async fn default_enter_and_exit_succeed() {
        assert!(End.enter().await.is_ok());
        assert!(End.exit().await.is_ok());
    }

    #[test]
    fn next_debug_shows_state_name() {
        let next: Next<TestEvent> = Next::goto(End);
        assert_eq!(format!("{:?}", next), "Goto(\"End\")");
        assert_eq!(format!("{:?}", Next::<TestEvent>::Stay), "Stay");
    }

    #[tokio::test]
    async fn detached_handle_reports_dropped_machine() {
        let handle = {
            let machine = Arc::new(StateMachine::<TestEvent>::new());
            machine.handle()
        };

        assert!(!handle.is_attached());
        assert_eq!(
            handle.dispatch(TestEvent::Go).await,
            Err(FlowError::MachineDropped)
        );
        assert_eq!(handle.post(TestEvent::Go), Err(FlowError::MachineDropped));
    }
}
