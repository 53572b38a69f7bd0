use std::fs;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;

use super::progress::ProgressReporter;
use super::request::BackupRequest;
use crate::email::{build_filename, decide, BackupSummary, MessageRecord, Verdict};
use crate::error::{BackupError, Result};
use crate::mailbox::{Connector, Mailbox};

/// Upper bound on CLOSE + LOGOUT.
const LOGOUT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs one backup pass: connect, select, search, then fetch/filter/save
/// every match.
pub struct BackupProcessor<R: ProgressReporter> {
    request: BackupRequest,
    reporter: R,
    cancel: CancellationToken,
}

impl<R: ProgressReporter> BackupProcessor<R> {
    pub fn new(request: BackupRequest, reporter: R) -> Self {
        Self {
            request,
            reporter,
            cancel: CancellationToken::new(),
        }
    }

    /// Stops the run at the next message boundary once `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub async fn run<C: Connector>(&self, connector: &C) -> Result<BackupSummary> {
        let destination = self.prepare_destination()?;
        let mut summary = BackupSummary::new(destination);

        self.report(format!(
            "Messages will be saved to: {}",
            summary.destination.display()
        ));
        self.report(format!(
            "Saving {} messages since {}",
            self.request.folder,
            self.request.since.format("%d.%m.%Y")
        ));

        if self.cancel.is_cancelled() {
            summary.cancelled = true;
            self.report("Backup cancelled before connecting");
            return Ok(summary);
        }

        self.report("Connecting to mail server...");
        let Some(connected) = self
            .until_cancelled(connector.connect(&self.request.credentials))
            .await
        else {
            summary.cancelled = true;
            self.report("Backup cancelled while connecting");
            return Ok(summary);
        };
        let mut mailbox = connected?;

        let result = self.process_mailbox(&mut mailbox, &mut summary).await;

        match tokio::time::timeout(LOGOUT_TIMEOUT, mailbox.logout()).await {
            Ok(Ok(())) => debug!("Logged out"),
            Ok(Err(e)) => warn!("Logout failed: {}", e),
            Err(_) => warn!("Logout timed out after {:?}", LOGOUT_TIMEOUT),
        }

        result?;

        info!(
            "Backup finished: {} found, {} saved, {} skipped, {} failed{}",
            summary.found,
            summary.saved,
            summary.skipped,
            summary.failed,
            if summary.cancelled { " (cancelled)" } else { "" }
        );

        Ok(summary)
    }

    fn prepare_destination(&self) -> Result<PathBuf> {
        let destination = &self.request.destination;
        if !destination.exists() {
            fs::create_dir_all(destination)?;
            self.report(format!("Created folder: {}", destination.display()));
        } else if !destination.is_dir() {
            return Err(BackupError::Config(format!(
                "Destination is not a folder: {}",
                destination.display()
            )));
        }

        Ok(fs::canonicalize(destination).unwrap_or_else(|_| destination.clone()))
    }

    async fn process_mailbox<M: Mailbox>(
        &self,
        mailbox: &mut M,
        summary: &mut BackupSummary,
    ) -> Result<()> {
        let Some(folder) = self
            .until_cancelled(mailbox.select_folder(self.request.folder.candidates()))
            .await
        else {
            self.cancelled_early(summary);
            return Ok(());
        };
        self.report(format!("Selected folder: {}", folder?));

        let Some(ids) = self
            .until_cancelled(mailbox.search_since(self.request.since.date_naive()))
            .await
        else {
            self.cancelled_early(summary);
            return Ok(());
        };
        let ids = ids?;
        summary.found = ids.len();
        self.report(format!(
            "Found {} message(s) since {}",
            ids.len(),
            self.request.since.format("%d.%m.%Y")
        ));

        if ids.is_empty() {
            self.report("No messages found for this period");
            return Ok(());
        }

        for (index, id) in ids.iter().enumerate() {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                self.report(format!(
                    "Backup cancelled after {} of {} message(s)",
                    index,
                    ids.len()
                ));
                break;
            }

            match self.process_message(mailbox, *id, summary).await {
                Ok(line) => self.report(line),
                Err(e) => {
                    error!("Error processing message {}: {}", id, e);
                    summary.failure();
                    self.report(format!("Error processing message {}: {}", id, e));
                }
            }
        }

        Ok(())
    }

    /// Handles one message and returns its progress line.
    async fn process_message<M: Mailbox>(
        &self,
        mailbox: &mut M,
        id: u32,
        summary: &mut BackupSummary,
    ) -> Result<String> {
        let content = mailbox.fetch_message(id).await?;
        let record = MessageRecord::parse(id, content)?;

        let verdict = decide(record.date.as_ref(), &self.request.since);
        debug!("Message {}: {:?}", id, verdict);

        if !verdict.is_kept() {
            summary.skipped();
            return Ok(format!(
                "Skipped message {} (date: {})",
                id,
                record.date_header.as_deref().unwrap_or_default()
            ));
        }

        let filename = build_filename(
            self.request.naming,
            summary.next_sequence(),
            record.date.as_ref(),
            record.subject.as_deref(),
        );
        fs::write(summary.destination.join(&filename), &record.content)?;
        summary.saved();

        Ok(match (verdict, record.date_header.is_some()) {
            (Verdict::KeepUndated, true) => format!(
                "Saved: {} (could not parse date of message {})",
                filename, id
            ),
            (Verdict::KeepUndated, false) => {
                format!("Saved: {} (message {} has no Date header)", filename, id)
            }
            _ => format!("Saved: {}", filename),
        })
    }

    /// Races `operation` against the cancellation token. `None` means the
    /// run was cancelled first.
    async fn until_cancelled<T>(&self, operation: impl Future<Output = T>) -> Option<T> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            result = operation => Some(result),
        }
    }

    fn cancelled_early(&self, summary: &mut BackupSummary) {
        summary.cancelled = true;
        self.report("Backup cancelled before any message was processed");
    }

    fn report(&self, line: impl AsRef<str>) {
        self.reporter.report(line.as_ref());
    }
}
