//! State machine that serializes dispatched events into exit/enter cycles.

use crate::core::{FlowEvent, TransitionHistory, TransitionRecord};
use crate::flow::error::FlowError;
use crate::flow::state::{FlowHandle, FlowState, Next};
use crate::worker::Mailbox;
use chrono::Utc;
use log::{debug, error, warn};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;

/// Result of a single dispatch
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchOutcome {
    /// The current state changed
    Transitioned { from: String, to: String },

    /// The current state handled the event and stayed current
    Stayed,

    /// No initial state has been set (or the machine was shut down)
    NotReady,

    /// A state's handle, exit or enter failed; the machine stays usable
    Failed(FlowError),
}

impl DispatchOutcome {
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }
}

type Reply<T> = oneshot::Sender<T>;

enum Command<E: FlowEvent> {
    Start {
        state: Arc<dyn FlowState<E>>,
        reply: Reply<Result<(), FlowError>>,
    },
    Dispatch {
        event: E,
        reply: Reply<DispatchOutcome>,
    },
    Shutdown {
        reply: Reply<Result<(), FlowError>>,
    },
}

impl<E: FlowEvent> Command<E> {
    fn reject(self, err: FlowError) {
        match self {
            Self::Start { reply, .. } | Self::Shutdown { reply } => {
                let _ = reply.send(Err(err));
            }
            Self::Dispatch { reply, .. } => {
                let _ = reply.send(DispatchOutcome::Failed(err));
            }
        }
    }
}

struct Inner<E: FlowEvent> {
    current: Option<Arc<dyn FlowState<E>>>,
    history: TransitionHistory<E>,
}

/// State shared between the machine and its worker task.
struct Core<E: FlowEvent> {
    inner: RwLock<Inner<E>>,
    pending: AtomicUsize,
}

/// Finite state machine over [`FlowState`]s.
///
/// Every command (initial state, dispatch, shutdown) is queued the moment
/// it is called and run by a single worker task, so the Nth dispatch never
/// starts until the (N-1)th has finished its exit and enter. A slow `enter`
/// therefore holds back every later event; nothing is dropped or timed out.
///
/// The returned futures only wait for the reply. Dropping one (a timeout,
/// a lost `select!` branch) does not cancel or reorder the command.
///
/// Failures inside a state are logged and reported as
/// [`DispatchOutcome::Failed`]. A panic inside a state aborts only that
/// command, so one faulty transition never wedges the machine.
///
/// The worker is spawned on the first command issued inside a tokio
/// runtime.
pub struct StateMachine<E: FlowEvent> {
    core: Arc<Core<E>>,
    mailbox: Mailbox<Command<E>>,
}

impl<E: FlowEvent> StateMachine<E> {
    /// Create a machine with no current state.
    pub fn new() -> Self {
        Self {
            core: Arc::new(Core {
                inner: RwLock::new(Inner {
                    current: None,
                    history: TransitionHistory::new(),
                }),
                pending: AtomicUsize::new(0),
            }),
            mailbox: Mailbox::new(),
        }
    }

    /// Weak handle for states that need to raise events on this machine.
    pub fn handle(self: &Arc<Self>) -> FlowHandle<E> {
        FlowHandle::new(Arc::downgrade(self))
    }

    /// Get the current state, if any.
    pub fn current(&self) -> Option<Arc<dyn FlowState<E>>> {
        self.core.current()
    }

    /// Name of the current state, if any.
    pub fn current_name(&self) -> Option<String> {
        self.current().map(|state| state.name().to_string())
    }

    /// Whether an initial state has been set.
    pub fn is_ready(&self) -> bool {
        self.core.read().current.is_some()
    }

    /// Whether any command is queued or running right now.
    pub fn is_transitioning(&self) -> bool {
        self.core.pending.load(Ordering::SeqCst) > 0
    }

    /// Completed transitions so far.
    pub fn history(&self) -> TransitionHistory<E> {
        self.core.read().history.clone()
    }

    /// Make `state` current and enter it.
    ///
    /// Dispatches issued after this call queue behind it. Calling it on a
    /// machine that already has a state is rejected.
    pub fn set_initial_state(
        &self,
        state: Arc<dyn FlowState<E>>,
    ) -> impl Future<Output = Result<(), FlowError>> + Send + 'static {
        let (reply, outcome) = oneshot::channel();
        self.post(Command::Start { state, reply });
        async move { outcome.await.unwrap_or_else(|_| Err(aborted())) }
    }

    /// Send an event to the current state and run the transition it asks for.
    ///
    /// The event takes its place in the queue before this returns; the
    /// future resolves once the transition has finished.
    pub fn dispatch(&self, event: E) -> impl Future<Output = DispatchOutcome> + Send + 'static {
        let (reply, outcome) = oneshot::channel();
        self.post(Command::Dispatch { event, reply });
        async move {
            outcome
                .await
                .unwrap_or_else(|_| DispatchOutcome::Failed(aborted()))
        }
    }

    /// Forward one external frame to the current state.
    pub fn tick(&self) {
        if let Some(state) = self.current() {
            state.tick();
        }
    }

    /// Exit the current state and return the machine to "not ready".
    ///
    /// Queued like a dispatch. The state is cleared even if its `exit`
    /// fails.
    pub fn shutdown(&self) -> impl Future<Output = Result<(), FlowError>> + Send + 'static {
        let (reply, outcome) = oneshot::channel();
        self.post(Command::Shutdown { reply });
        async move { outcome.await.unwrap_or_else(|_| Err(aborted())) }
    }

    fn post(&self, command: Command<E>) {
        self.core.pending.fetch_add(1, Ordering::SeqCst);
        let core = Arc::clone(&self.core);
        if let Err(command) = self.mailbox.send(command, move |commands| drain(core, commands)) {
            self.core.settle();
            error!("Flow worker is gone; rejecting command");
            command.reject(FlowError::MachineDropped);
        }
    }
}

impl<E: FlowEvent> Default for StateMachine<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn aborted() -> FlowError {
    FlowError::Aborted("the state panicked".to_string())
}

/// Worker loop: one command at a time, each in its own task so a panicking
/// state cannot take the loop down with it.
async fn drain<E: FlowEvent>(core: Arc<Core<E>>, mut commands: UnboundedReceiver<Command<E>>) {
    while let Some(command) = commands.recv().await {
        let task = tokio::spawn(Arc::clone(&core).run(command));
        if let Err(err) = task.await {
            error!("Flow command aborted: {}", err);
            core.settle();
        }
    }
    debug!("Flow worker stopped");
}

impl<E: FlowEvent> Core<E> {
    fn read(&self) -> RwLockReadGuard<'_, Inner<E>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<E>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn current(&self) -> Option<Arc<dyn FlowState<E>>> {
        self.read().current.clone()
    }

    fn settle(&self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }

    async fn run(self: Arc<Self>, command: Command<E>) {
        match command {
            Command::Start { state, reply } => {
                let result = self.start(state).await;
                self.settle();
                let _ = reply.send(result);
            }
            Command::Dispatch { event, reply } => {
                let outcome = self.apply(event).await;
                self.settle();
                let _ = reply.send(outcome);
            }
            Command::Shutdown { reply } => {
                let result = self.shutdown().await;
                self.settle();
                let _ = reply.send(result);
            }
        }
    }

    async fn start(&self, state: Arc<dyn FlowState<E>>) -> Result<(), FlowError> {
        if let Some(current) = self.current() {
            let current = current.name().to_string();
            warn!(
                "Ignoring initial state '{}': machine already in '{}'",
                state.name(),
                current
            );
            return Err(FlowError::AlreadyInitialized { current });
        }

        debug!("Entering initial state '{}'", state.name());
        self.write().current = Some(Arc::clone(&state));

        state.enter().await.inspect_err(|err| {
            error!("Initial state '{}' failed to enter: {}", state.name(), err);
        })
    }

    async fn apply(&self, event: E) -> DispatchOutcome {
        let Some(current) = self.current() else {
            warn!("Dropping event {:?}: no current state", event);
            return DispatchOutcome::NotReady;
        };

        let next = match current.handle(event) {
            Ok(Next::Stay) => {
                debug!("'{}' stays on {:?}", current.name(), event);
                return DispatchOutcome::Stayed;
            }
            Ok(Next::Goto(next)) if same_state(&current, &next) => {
                debug!("'{}' returned itself on {:?}", current.name(), event);
                return DispatchOutcome::Stayed;
            }
            Ok(Next::Goto(next)) => next,
            Err(err) => {
                error!("'{}' failed to handle {:?}: {}", current.name(), event, err);
                return DispatchOutcome::Failed(err);
            }
        };

        let from = current.name().to_string();
        let to = next.name().to_string();
        debug!("Transition '{}' -> '{}' on {:?}", from, to, event);

        if let Err(err) = current.exit().await {
            error!("'{}' failed to exit, staying: {}", from, err);
            return DispatchOutcome::Failed(err);
        }

        self.write().current = Some(Arc::clone(&next));
        let entered = next.enter().await;

        {
            let mut inner = self.write();
            inner.history = inner.history.record(TransitionRecord {
                from: from.clone(),
                to: to.clone(),
                event,
                timestamp: Utc::now(),
            });
        }

        match entered {
            Ok(()) => DispatchOutcome::Transitioned { from, to },
            Err(err) => {
                error!("'{}' failed to enter after '{}': {}", to, from, err);
                DispatchOutcome::Failed(err)
            }
        }
    }

    async fn shutdown(&self) -> Result<(), FlowError> {
        let Some(current) = self.current() else {
            return Err(FlowError::NotInitialized);
        };

        debug!("Shutting down in state '{}'", current.name());
        let exited = current.exit().await;
        self.write().current = None;

        exited.inspect_err(|err| {
            error!("'{}' failed to exit on shutdown: {}", current.name(), err);
        })
    }
}

fn same_state<E: FlowEvent>(a: &Arc<dyn FlowState<E>>, b: &Arc<dyn FlowState<E>>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
