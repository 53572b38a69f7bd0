/// Common structures for a backup run
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use mail_parser::MessageParser;

use super::date_parser::{extract_date_header, parse_email_date};
use crate::error::{BackupError, Result};

/// One fetched message, kept only while it is being processed.
#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub id: u32,
    pub content: Vec<u8>,
    pub date_header: Option<String>,
    pub date: Option<DateTime<FixedOffset>>,
    pub subject: Option<String>,
}

impl MessageRecord {
    /// Decodes the subject and date of a raw RFC 822 message.
    pub fn parse(id: u32, content: Vec<u8>) -> Result<Self> {
        let subject = MessageParser::default()
            .parse(&content)
            .ok_or_else(|| BackupError::Decode {
                id,
                reason: "not an RFC 822 message".to_string(),
            })?
            .subject()
            .map(str::to_string);
        let date_header = extract_date_header(&content);
        let date = date_header.as_deref().and_then(parse_email_date);

        Ok(MessageRecord {
            id,
            content,
            date_header,
            date,
            subject,
        })
    }
}

/// Tally of one backup run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupSummary {
    pub found: usize,
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub destination: PathBuf,
}

impl BackupSummary {
    pub fn new(destination: PathBuf) -> Self {
        Self {
            destination,
            ..Self::default()
        }
    }

    pub fn saved(&mut self) {
        self.saved += 1;
    }

    pub fn skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn failure(&mut self) {
        self.failed += 1;
    }

    /// Sequence number for the next saved file (1-based).
    pub fn next_sequence(&self) -> usize {
        self.saved + 1
    }
}
