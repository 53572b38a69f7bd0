use async_imap::Session;
use async_native_tls::{TlsConnector, TlsStream};
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::StreamExt;
use log::{debug, info, warn};
use secrecy::ExposeSecret;
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};

use crate::config::ImapConfig;
use crate::error::{BackupError, Result};
use crate::mailbox::{Connector, Credentials, Mailbox};

type ImapSession = Session<TlsStream<Compat<TcpStream>>>;

pub struct ImapClient {
    session: ImapSession,
}

impl ImapClient {
    pub async fn new(config: &ImapConfig, credentials: &Credentials) -> Result<Self> {
        info!("Connecting to IMAP server {}:{}", config.server, config.port);

        let tcp_stream = TcpStream::connect((config.server.as_str(), config.port))
            .await
            .map_err(|e| BackupError::Connection(format!("{}:{}: {}", config.server, config.port, e)))?;

        // futures-io compatibility for async-native-tls
        let tcp_stream_compat = tcp_stream.compat();

        let tls = TlsConnector::new();
        let tls_stream = tls.connect(&config.server, tcp_stream_compat).await?;

        let client = async_imap::Client::new(tls_stream);

        let session = client
            .login(&credentials.username, credentials.password.expose_secret())
            .await
            .map_err(|(e, _)| BackupError::Authentication(e.to_string()))?;

        info!("IMAP session established for {}", credentials.username);

        Ok(ImapClient { session })
    }

    /// `SINCE` criterion in the `DD-Mon-YYYY` form IMAP expects.
    pub fn since_criterion(since: NaiveDate) -> String {
        format!("SINCE \"{}\"", since.format("%d-%b-%Y"))
    }
}

#[async_trait]
impl Mailbox for ImapClient {
    async fn select_folder(&mut self, candidates: &[&str]) -> Result<String> {
        for candidate in candidates {
            debug!("Trying to select folder '{}'", candidate);
            match self.session.select(*candidate).await {
                Ok(mailbox) => {
                    info!("Selected folder '{}' ({} messages)", candidate, mailbox.exists);
                    return Ok(candidate.to_string());
                }
                Err(e) => debug!("Folder '{}' not selectable: {}", candidate, e),
            }
        }

        Err(BackupError::FolderNotFound(
            candidates.iter().map(|c| c.to_string()).collect(),
        ))
    }

    async fn search_since(&mut self, since: NaiveDate) -> Result<Vec<u32>> {
        let criteria = Self::since_criterion(since);
        debug!("Search criteria: {}", criteria);

        let ids = self
            .session
            .search(&criteria)
            .await
            .map_err(|e| BackupError::Search(e.to_string()))?;

        let mut ids: Vec<u32> = ids.into_iter().collect();
        ids.sort_unstable();
        info!("Found {} message(s) since {}", ids.len(), since);

        Ok(ids)
    }

    async fn fetch_message(&mut self, id: u32) -> Result<Vec<u8>> {
        debug!("Fetching message {}", id);

        let messages_stream = self
            .session
            .fetch(id.to_string(), "RFC822")
            .await
            .map_err(|e| BackupError::Fetch {
                id,
                reason: e.to_string(),
            })?;

        let messages: Vec<_> = messages_stream
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .filter_map(|r| r.ok())
            .collect();

        match messages.first().and_then(|m| m.body()) {
            Some(body) if !body.is_empty() => {
                debug!("Message {} fetched, {} bytes", id, body.len());
                Ok(body.to_vec())
            }
            _ => Err(BackupError::Fetch {
                id,
                reason: "empty or missing body".to_string(),
            }),
        }
    }

    async fn logout(mut self) -> Result<()> {
        info!("Logging out from IMAP server");
        if let Err(e) = self.session.close().await {
            warn!("CLOSE failed: {}", e);
        }
        self.session
            .logout()
            .await
            .map_err(|e| BackupError::Connection(e.to_string()))
    }
}

/// Opens [`ImapClient`] sessions against a fixed server.
#[derive(Debug, Clone)]
pub struct ImapConnector {
    config: ImapConfig,
}

impl ImapConnector {
    pub fn new(config: ImapConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for ImapConnector {
    type Mailbox = ImapClient;

    async fn connect(&self, credentials: &Credentials) -> Result<ImapClient> {
        ImapClient::new(&self.config, credentials).await
    }
}
