#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use secrecy::SecretString;

use mailbackup::backup::BackupRequest;
use mailbackup::email::FolderKind;
use mailbackup::error::{BackupError, Result};
use mailbackup::mailbox::{Connector, Credentials, Mailbox};

/// In-memory server used in place of IMAP.
#[derive(Debug, Clone, Default)]
pub struct FakeConnector {
    pub folders: Vec<String>,
    pub messages: Vec<(u32, Vec<u8>)>,
    pub broken_ids: HashSet<u32>,
    pub reject_login: bool,
    pub fail_search: bool,
    /// Never completes the corresponding call.
    pub hang_on_connect: bool,
    pub hang_on_search: bool,
    pub panic_on_connect: bool,
}

impl FakeConnector {
    pub fn with_inbox(messages: Vec<(u32, Vec<u8>)>) -> Self {
        Self {
            folders: vec!["INBOX".to_string()],
            messages,
            ..Self::default()
        }
    }
}

pub struct FakeMailbox {
    server: FakeConnector,
    selected: Option<String>,
}

#[async_trait]
impl Connector for FakeConnector {
    type Mailbox = FakeMailbox;

    async fn connect(&self, credentials: &Credentials) -> Result<FakeMailbox> {
        if self.panic_on_connect {
            panic!("connection handler crashed");
        }
        if self.hang_on_connect {
            std::future::pending::<()>().await;
        }
        if self.reject_login {
            return Err(BackupError::Authentication(format!(
                "invalid credentials for {}",
                credentials.username
            )));
        }
        Ok(FakeMailbox {
            server: self.clone(),
            selected: None,
        })
    }
}

#[async_trait]
impl Mailbox for FakeMailbox {
    async fn select_folder(&mut self, candidates: &[&str]) -> Result<String> {
        for candidate in candidates {
            if self.server.folders.iter().any(|f| f == candidate) {
                self.selected = Some(candidate.to_string());
                return Ok(candidate.to_string());
            }
        }
        Err(BackupError::FolderNotFound(
            candidates.iter().map(|c| c.to_string()).collect(),
        ))
    }

    async fn search_since(&mut self, _since: NaiveDate) -> Result<Vec<u32>> {
        if self.selected.is_none() {
            return Err(BackupError::Search("no folder selected".to_string()));
        }
        if self.server.hang_on_search {
            std::future::pending::<()>().await;
        }
        if self.server.fail_search {
            return Err(BackupError::Search("BAD command SEARCH".to_string()));
        }
        Ok(self.server.messages.iter().map(|(id, _)| *id).collect())
    }

    async fn fetch_message(&mut self, id: u32) -> Result<Vec<u8>> {
        if self.server.broken_ids.contains(&id) {
            return Err(BackupError::Fetch {
                id,
                reason: "connection reset".to_string(),
            });
        }
        self.server
            .messages
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, raw)| raw.clone())
            .ok_or_else(|| BackupError::Fetch {
                id,
                reason: "no such message".to_string(),
            })
    }

    async fn logout(self) -> Result<()> {
        Ok(())
    }
}

pub fn raw_message(date: Option<&str>, subject: &str) -> Vec<u8> {
    let mut raw = String::from("From: Sender <sender@example.com>\r\nTo: me@example.com\r\n");
    if let Some(date) = date {
        raw.push_str(&format!("Date: {}\r\n", date));
    }
    raw.push_str(&format!(
        "Subject: {}\r\nContent-Type: text/plain\r\n\r\nBody of {}\r\n",
        subject, subject
    ));
    raw.into_bytes()
}

pub fn cutoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 12, 0, 0, 0).unwrap()
}

pub fn request(destination: &Path, folder: FolderKind) -> BackupRequest {
    BackupRequest::new(
        "user@mail.ru",
        SecretString::from("app-password".to_string()),
        destination.to_str().unwrap(),
        cutoff(),
        folder,
    )
    .unwrap()
}

/// File names in `dir`, sorted.
pub fn saved_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
