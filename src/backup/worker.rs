//! Background execution of a backup run for interactive front-ends.
//!
//! The worker owns a dedicated thread with its own current-thread tokio
//! runtime. It talks back to the front-end only through [`WorkerEvent`]s: any
//! number of `Progress` lines followed by exactly one `Finished` or `Failed`.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::thread::{self, JoinHandle};

use futures::FutureExt;
use log::{error, info};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use super::processor::BackupProcessor;
use super::progress::ProgressReporter;
use super::request::BackupRequest;
use crate::email::BackupSummary;
use crate::mailbox::Connector;

const STOPPED_UNEXPECTEDLY: &str = "Backup worker stopped unexpectedly";

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Notification sent from the worker thread to the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    Progress(String),
    Finished(BackupSummary),
    Failed(String),
}

impl WorkerEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkerEvent::Progress(_))
    }
}

/// Forwards progress lines over the event channel.
struct ChannelReporter<N> {
    events: UnboundedSender<WorkerEvent>,
    notify: N,
}

impl<N: Fn()> ChannelReporter<N> {
    fn send(&self, event: WorkerEvent) {
        // The receiver may already be gone if the window was closed.
        if self.events.send(event).is_ok() {
            (self.notify)();
        }
    }
}

impl<N: Fn()> ProgressReporter for ChannelReporter<N> {
    fn report(&self, line: &str) {
        info!("{}", line);
        self.send(WorkerEvent::Progress(line.to_string()));
    }
}

/// Handle to a running backup.
pub struct BackupWorker {
    events: UnboundedReceiver<WorkerEvent>,
    cancel: CancellationToken,
    thread: Option<JoinHandle<()>>,
    finished: bool,
}

impl BackupWorker {
    /// Starts `request` on a new thread. `notify` is called after every event,
    /// typically to wake up the UI.
    pub fn spawn<C, N>(connector: C, request: BackupRequest, notify: N) -> std::io::Result<Self>
    where
        C: Connector + 'static,
        N: Fn() + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        let thread = thread::Builder::new()
            .name("backup-worker".to_string())
            .spawn(move || {
                let reporter = ChannelReporter { events: tx, notify };

                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        error!("Unable to start worker runtime: {}", e);
                        reporter.send(WorkerEvent::Failed(format!(
                            "Unable to start worker runtime: {}",
                            e
                        )));
                        return;
                    }
                };

                let processor =
                    BackupProcessor::new(request, reporter).with_cancellation(worker_cancel);
                let result = runtime
                    .block_on(AssertUnwindSafe(processor.run(&connector)).catch_unwind());

                let terminal = match result {
                    Ok(Ok(summary)) => WorkerEvent::Finished(summary),
                    Ok(Err(e)) => {
                        error!("Backup failed: {}", e);
                        WorkerEvent::Failed(e.to_string())
                    }
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        error!("Backup worker panicked: {}", message);
                        WorkerEvent::Failed(format!("{}: {}", STOPPED_UNEXPECTEDLY, message))
                    }
                };
                processor.reporter().send(terminal);
            })?;

        Ok(BackupWorker {
            events: rx,
            cancel,
            thread: Some(thread),
            finished: false,
        })
    }

    /// Asks the worker to stop at the next message boundary.
    pub fn cancel(&self) {
        info!("Cancellation requested");
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Next pending event without blocking, for polling from a UI loop.
    ///
    /// If the worker thread went away without a terminal event, a single
    /// `Failed` is produced in its place.
    pub fn try_next(&mut self) -> Option<WorkerEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(self.track(event)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => self.lost(),
        }
    }

    /// Blocks until the next event; `None` once the worker is gone.
    /// Must not be called from inside an async context.
    pub fn next_blocking(&mut self) -> Option<WorkerEvent> {
        match self.events.blocking_recv() {
            Some(event) => Some(self.track(event)),
            None => self.lost(),
        }
    }

    fn track(&mut self, event: WorkerEvent) -> WorkerEvent {
        self.finished |= event.is_terminal();
        event
    }

    fn lost(&mut self) -> Option<WorkerEvent> {
        if self.finished {
            return None;
        }
        self.finished = true;
        error!("Backup worker exited without reporting a result");
        Some(WorkerEvent::Failed(STOPPED_UNEXPECTEDLY.to_string()))
    }

    /// Waits for the worker thread to exit.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Backup worker thread panicked");
            }
        }
    }
}

impl Drop for BackupWorker {
    fn drop(&mut self) {
        // A dropped handle can no longer observe the run.
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detached(events: UnboundedReceiver<WorkerEvent>) -> BackupWorker {
        BackupWorker {
            events,
            cancel: CancellationToken::new(),
            thread: None,
            finished: false,
        }
    }

    #[test]
    fn test_lost_worker_yields_single_failure() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(WorkerEvent::Progress("Connecting to mail server...".to_string()))
            .unwrap();
        drop(tx);

        let mut worker = detached(rx);
        assert_eq!(
            worker.try_next(),
            Some(WorkerEvent::Progress("Connecting to mail server...".to_string()))
        );
        assert_eq!(
            worker.try_next(),
            Some(WorkerEvent::Failed(STOPPED_UNEXPECTEDLY.to_string()))
        );
        assert_eq!(worker.try_next(), None);
    }

    #[test]
    fn test_closed_channel_after_terminal_is_quiet() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(WorkerEvent::Failed("Search failed: boom".to_string()))
            .unwrap();
        drop(tx);

        let mut worker = detached(rx);
        assert!(worker.next_blocking().unwrap().is_terminal());
        assert_eq!(worker.next_blocking(), None);
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&"owned".to_string()), "owned");
        assert_eq!(panic_message(&42_u8), "unknown panic");
    }
}
