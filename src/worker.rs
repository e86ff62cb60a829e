//! Command queues drained by a single background task.

use log::warn;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// FIFO queue of commands owned by one worker task.
///
/// [`send`](Self::send) fixes a command's position synchronously, so the
/// order of calls is the order of execution no matter when (or whether) the
/// caller awaits the reply. The worker is spawned on the first send made
/// inside a tokio runtime; commands sent before that wait in the queue.
pub(crate) struct Mailbox<C> {
    sender: UnboundedSender<C>,
    idle: Mutex<Option<UnboundedReceiver<C>>>,
}

impl<C: Send + 'static> Mailbox<C> {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            idle: Mutex::new(Some(receiver)),
        }
    }

    /// Queue `command`, starting `worker` on the receiving end if it is not
    /// running yet.
    ///
    /// Hands the command back if the worker is gone (its runtime shut down).
    pub(crate) fn send<W, F>(&self, command: C, worker: W) -> Result<(), C>
    where
        W: FnOnce(UnboundedReceiver<C>) -> F,
        F: Future<Output = ()> + Send + 'static,
    {
        self.sender.send(command).map_err(|rejected| rejected.0)?;

        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.is_none() {
            return Ok(());
        }
        match Handle::try_current() {
            Ok(runtime) => {
                if let Some(receiver) = idle.take() {
                    runtime.spawn(worker(receiver));
                }
            }
            Err(_) => warn!("No tokio runtime yet; command stays queued until one is available"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    type Command = (u32, oneshot::Sender<u32>);

    async fn collect(mut receiver: UnboundedReceiver<Command>, seen: Arc<Mutex<Vec<u32>>>) {
        while let Some((value, reply)) = receiver.recv().await {
            seen.lock().unwrap().push(value);
            let _ = reply.send(value);
        }
    }

    #[tokio::test]
    async fn commands_run_in_send_order() {
        let mailbox = Mailbox::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let mut replies = Vec::new();
        for value in 0..5 {
            let (reply, answer) = oneshot::channel();
            let seen = Arc::clone(&seen);
            assert!(mailbox
                .send((value, reply), move |receiver| collect(receiver, seen))
                .is_ok());
            replies.push(answer);
        }
        // Await in reverse; execution order is fixed by send order.
        for answer in replies.into_iter().rev() {
            answer.await.unwrap();
        }

        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn commands_wait_for_a_runtime() {
        let mailbox = Mailbox::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let (reply, answer) = oneshot::channel();
        let early = Arc::clone(&seen);
        assert!(mailbox
            .send((1, reply), move |receiver| collect(receiver, early))
            .is_ok());
        assert!(seen.lock().unwrap().is_empty());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        runtime.block_on(async {
            let (reply, second) = oneshot::channel();
            let late = Arc::clone(&seen);
            assert!(mailbox
                .send((2, reply), move |receiver| collect(receiver, late))
                .is_ok());
            assert_eq!(answer.await.unwrap(), 1);
            assert_eq!(second.await.unwrap(), 2);
        });

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }
}
