//! Error types for a backup run.

use thiserror::Error;

/// Errors that can occur while backing up a mailbox.
///
/// Connection, authentication, folder and search errors abort the run.
/// `Fetch` and `Decode` only concern one message; the processor logs them and
/// moves on.
#[derive(Error, Debug)]
pub enum BackupError {
    /// A required input was left blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Failed to reach the IMAP server.
    #[error("IMAP connection failed: {0}")]
    Connection(String),

    /// TLS handshake failed.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The server rejected the credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// None of the candidate folder names could be selected.
    #[error("No folder could be selected (tried: {})", .0.join(", "))]
    FolderNotFound(Vec<String>),

    /// The SEARCH command failed.
    #[error("Search failed: {0}")]
    Search(String),

    /// A single message could not be fetched.
    #[error("Failed to fetch message {id}: {reason}")]
    Fetch { id: u32, reason: String },

    /// A single message could not be decoded.
    #[error("Failed to decode message {id}: {reason}")]
    Decode { id: u32, reason: String },

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<async_native_tls::Error> for BackupError {
    fn from(err: async_native_tls::Error) -> Self {
        BackupError::Tls(err.to_string())
    }
}

/// Result type for backup operations.
pub type Result<T> = std::result::Result<T, BackupError>;
