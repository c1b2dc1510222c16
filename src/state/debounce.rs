//! Trailing debounce owned by a single background task.
//!
//! Every [`Debouncer::touch`] (re)arms one deadline; when it elapses without another
//! touch the flush action runs once. [`Debouncer::close`] cancels the deadline and runs
//! the flush immediately, so callers never have to pair a manual cancel with a manual
//! write. All flushes run on the owned task, one at a time.

use std::{future::Future, time::Duration};

use futures::future::BoxFuture;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tracing::{debug, warn};

/// Default quiet period before buffered edits are written.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(500);

enum Command {
    Touch,
    Flush(oneshot::Sender<()>),
    Close(oneshot::Sender<()>),
}

/// Handle to the task owning the debounce deadline.
pub struct Debouncer {
    tx: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl Debouncer {
    /// Spawn the task. `flush` runs whenever the window elapses or a flush is forced
    /// while a deadline is armed.
    pub fn spawn<F, Fut>(window: Duration, flush: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(window, rx, flush));
        Self { tx, task }
    }

    /// Arm the deadline, pushing it back if it is already armed.
    pub fn touch(&self) {
        if self.tx.send(Command::Touch).is_err() {
            warn!("debounce task is gone; edit will not be persisted automatically");
        }
    }

    /// Write now if a deadline is armed, then keep running.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Cancel the armed deadline and flush immediately, then stop the task.
    ///
    /// Resolves only once the flush completed.
    pub async fn close(self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Close(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
        if let Err(err) = self.task.await {
            warn!(error = %err, "debounce task ended abnormally");
        }
    }
}

async fn run<F, Fut>(window: Duration, mut rx: mpsc::UnboundedReceiver<Command>, mut flush: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut deadline: Option<Instant> = None;

    loop {
        let timer: BoxFuture<'static, ()> = match deadline {
            Some(at) => Box::pin(sleep_until(at)),
            None => Box::pin(std::future::pending()),
        };

        tokio::select! {
            command = rx.recv() => match command {
                Some(Command::Touch) => {
                    deadline = Some(Instant::now() + window);
                }
                Some(Command::Flush(ack)) => {
                    if deadline.take().is_some() {
                        flush().await;
                    }
                    let _ = ack.send(());
                }
                Some(Command::Close(ack)) => {
                    if deadline.take().is_some() {
                        debug!("flushing pending edits on close");
                        flush().await;
                    }
                    let _ = ack.send(());
                    return;
                }
                None => {
                    // Handle dropped without close: still honour pending edits.
                    if deadline.take().is_some() {
                        flush().await;
                    }
                    return;
                }
            },
            _ = timer => {
                deadline = None;
                flush().await;
            }
        }
    }
}
