//! Per-scene host for a flow state machine.

use crate::core::FlowEvent;
use crate::flow::error::FlowError;
use crate::flow::machine::{DispatchOutcome, StateMachine};
use crate::flow::state::{FlowHandle, FlowState};
use log::{error, info};
use std::future::Future;
use std::sync::Arc;

/// Describes how a scene's flow begins.
///
/// Implementors carry the collaborators their states need (panels, a scene
/// controller, services) and build the first state from them. Missing
/// collaborators are a configuration error: return
/// [`FlowError::MissingInitialState`] and the controller stays idle.
pub trait FlowDefinition<E: FlowEvent>: Send + Sync + 'static {
    /// Build the state the flow starts in.
    ///
    /// `handle` lets the created states raise events on their own machine.
    fn create_initial_state(&self, handle: FlowHandle<E>)
        -> Result<Arc<dyn FlowState<E>>, FlowError>;
}

/// Owns one [`StateMachine`] and connects it to the outside world.
///
/// The embedding application calls [`start`](Self::start) when the scene
/// comes up, [`tick`](Self::tick) every frame, and [`dispatch`](Self::dispatch)
/// from UI handlers.
pub struct SceneFlowController<E: FlowEvent, D: FlowDefinition<E>> {
    machine: Arc<StateMachine<E>>,
    definition: D,
}

impl<E: FlowEvent, D: FlowDefinition<E>> SceneFlowController<E, D> {
    pub fn new(definition: D) -> Self {
        Self {
            machine: Arc::new(StateMachine::new()),
            definition,
        }
    }

    /// Build the initial state and enter it.
    ///
    /// On a configuration error nothing is entered; later dispatches report
    /// [`DispatchOutcome::NotReady`].
    pub fn start(&self) -> impl Future<Output = Result<(), FlowError>> + Send + 'static {
        let started = self
            .definition
            .create_initial_state(self.machine.handle())
            .inspect_err(|err| error!("Flow not started: {}", err))
            .map(|initial| {
                info!("Starting flow in '{}'", initial.name());
                self.machine.set_initial_state(initial)
            });
        async move { started?.await }
    }

    /// Dispatch an event into the flow.
    ///
    /// The event is queued before this returns.
    pub fn dispatch(&self, event: E) -> impl Future<Output = DispatchOutcome> + Send + 'static {
        self.machine.dispatch(event)
    }

    /// Forward one frame to the active state.
    pub fn tick(&self) {
        self.machine.tick();
    }

    /// Exit the active state when the scene goes away.
    pub fn stop(&self) -> impl Future<Output = Result<(), FlowError>> + Send + 'static {
        info!("Stopping flow");
        self.machine.shutdown()
    }

    pub fn machine(&self) -> &Arc<StateMachine<E>> {
        &self.machine
    }

    pub fn handle(&self) -> FlowHandle<E> {
        self.machine.handle()
    }

    pub fn definition(&self) -> &D {
        &self.definition
    }

    pub fn current_name(&self) -> Option<String> {
        self.machine.current_name()
    }
}
