//! Seams between the backup loop and the mail server.

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::SecretString;

use crate::error::Result;

/// Login pair supplied by the user for one run.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// An authenticated mailbox session.
#[async_trait]
pub trait Mailbox: Send {
    /// Selects the first candidate folder the server accepts and returns its
    /// name.
    async fn select_folder(&mut self, candidates: &[&str]) -> Result<String>;

    /// Returns the identifiers of messages received on or after `since`,
    /// in ascending order.
    async fn search_since(&mut self, since: NaiveDate) -> Result<Vec<u32>>;

    /// Fetches the full raw content of one message.
    async fn fetch_message(&mut self, id: u32) -> Result<Vec<u8>>;

    /// Ends the session.
    async fn logout(self) -> Result<()>
    where
        Self: Sized;
}

/// Opens mailbox sessions.
#[async_trait]
pub trait Connector: Send + Sync {
    type Mailbox: Mailbox;

    async fn connect(&self, credentials: &Credentials) -> Result<Self::Mailbox>;
}
