//! Remote quote transport.
//!
//! # Responsibility
//! - Define the async fetch contract consumed by the reconciler.
//! - Provide the HTTP adapter for the mock posts endpoint.
//!
//! # Invariants
//! - Adapters either return a full validated snapshot or an error.
//! - Timeouts surface as `TransportError::Timeout`, never as a hang.

use crate::model::quote::Quote;
use crate::sync::config::{SyncConfig, REMOTE_CATEGORY};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Remote fetch failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Network(String),
    Status(u16),
    Decode(String),
    Timeout,
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(message) => write!(f, "network error: {message}"),
            Self::Status(code) => write!(f, "remote returned HTTP {code}"),
            Self::Decode(message) => write!(f, "remote payload could not be decoded: {message}"),
            Self::Timeout => write!(f, "remote request timed out"),
        }
    }
}

impl Error for TransportError {}

/// Source of remote quote snapshots.
#[async_trait]
pub trait QuoteTransport: Send + Sync {
    async fn fetch_remote_quotes(&self) -> Result<Vec<Quote>, TransportError>;
}

#[derive(Debug, Deserialize)]
struct RemotePost {
    #[serde(default)]
    title: String,
}

/// HTTP adapter for an endpoint returning `[{ "title": ... }, ...]`.
pub struct HttpQuoteTransport {
    client: Client,
    endpoint: String,
    limit: usize,
}

impl HttpQuoteTransport {
    pub fn new(config: &SyncConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| TransportError::Network(err.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            limit: config.limit,
        })
    }
}

#[async_trait]
impl QuoteTransport for HttpQuoteTransport {
    async fn fetch_remote_quotes(&self) -> Result<Vec<Quote>, TransportError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(map_request_error)?;
        let quotes = parse_remote_posts(&body, self.limit)?;
        debug!(
            "event=remote_fetch module=sync status=ok http_status={} count={}",
            status.as_u16(),
            quotes.len()
        );
        Ok(quotes)
    }
}

/// Maps a posts payload to quotes.
///
/// Takes the first `limit` posts, maps `title` to `text` and assigns the
/// remote category. Posts with a blank title are skipped.
pub fn parse_remote_posts(body: &str, limit: usize) -> Result<Vec<Quote>, TransportError> {
    let posts: Vec<RemotePost> =
        serde_json::from_str(body).map_err(|err| TransportError::Decode(err.to_string()))?;

    Ok(posts
        .into_iter()
        .take(limit)
        .filter_map(|post| Quote::new(&post.title, REMOTE_CATEGORY).ok())
        .collect())
}

fn map_request_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_decode() {
        TransportError::Decode(err.to_string())
    } else {
        TransportError::Network(err.to_string())
    }
}
