use std::path::PathBuf;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::email::{FileNaming, FolderKind};
use crate::error::{BackupError, Result};
use crate::mailbox::Credentials;

/// Everything one backup run needs, fixed once the run starts.
#[derive(Debug)]
pub struct BackupRequest {
    pub credentials: Credentials,
    pub destination: PathBuf,
    pub since: DateTime<Utc>,
    pub folder: FolderKind,
    pub naming: FileNaming,
}

impl BackupRequest {
    /// Validates user input. Blank address, password or destination is
    /// rejected before anything touches the network.
    pub fn new(
        email: &str,
        password: SecretString,
        destination: &str,
        since: DateTime<Utc>,
        folder: FolderKind,
    ) -> Result<Self> {
        let email = email.trim();
        if email.is_empty() {
            return Err(BackupError::MissingField("email address"));
        }

        if password.expose_secret().trim().is_empty() {
            return Err(BackupError::MissingField("application password"));
        }

        let destination = destination.trim();
        if destination.is_empty() {
            return Err(BackupError::MissingField("destination folder"));
        }

        Ok(BackupRequest {
            credentials: Credentials {
                username: email.to_string(),
                password,
            },
            destination: PathBuf::from(destination),
            since,
            folder,
            naming: FileNaming::Sequential,
        })
    }

    pub fn with_naming(mut self, naming: FileNaming) -> Self {
        self.naming = naming;
        self
    }
}
