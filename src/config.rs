use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};

use crate::email::date_parser::parse_cutoff;

/// Default IMAP endpoint (Mail.ru, implicit TLS).
pub const DEFAULT_IMAP_SERVER: &str = "imap.mail.ru";
pub const DEFAULT_IMAP_PORT: u16 = 993;

#[derive(Debug, Clone)]
pub struct Config {
    pub imap: ImapConfig,
    pub since: DateTime<Utc>,
    pub backup_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImapConfig {
    pub server: String,
    pub port: u16,
}

/// Cutoff used by the console when nothing else is configured.
pub fn default_since() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 12, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl Config {
    /// Loads the configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn new() -> Result<Self> {
        let port = match std::env::var("IMAP_PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("IMAP_PORT must be a port number, got '{}'", raw))?,
            Err(_) => DEFAULT_IMAP_PORT,
        };

        let since = match std::env::var("BACKUP_SINCE") {
            Ok(raw) => parse_cutoff(&raw).context("Invalid BACKUP_SINCE")?,
            Err(_) => default_since(),
        };

        Ok(Config {
            imap: ImapConfig {
                server: std::env::var("IMAP_SERVER")
                    .unwrap_or_else(|_| DEFAULT_IMAP_SERVER.to_string()),
                port,
            },
            since,
            backup_dir: std::env::var("BACKUP_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty()),
        })
    }
}
