//! Remote sync client.
//!
//! Fetches the remote quote collection. One GET per call: no retry, no
//! backoff, no pagination.

use std::time::Duration;

use quotebook_engine::{Quote, RemoteQuote};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

/// Errors from a single fetch.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(StatusCode),

    #[error("invalid payload: {0}")]
    Decode(String),
}

/// Accepted shapes of the remote body.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemotePayload {
    List(Vec<RemoteQuote>),
    Wrapped { quotes: Vec<RemoteQuote> },
}

/// Decode a remote body into quotes.
///
/// The body is either an array of items or an object with a `quotes` array.
/// Items with blank text are dropped.
pub fn decode_payload(body: &[u8]) -> Result<Vec<Quote>, SyncError> {
    let payload: RemotePayload =
        serde_json::from_slice(body).map_err(|e| SyncError::Decode(e.to_string()))?;

    let items = match payload {
        RemotePayload::List(items) => items,
        RemotePayload::Wrapped { quotes } => quotes,
    };

    let total = items.len();
    let quotes: Vec<Quote> = items
        .into_iter()
        .filter_map(RemoteQuote::into_quote)
        .collect();

    if quotes.len() < total {
        tracing::debug!(
            dropped = total - quotes.len(),
            "Dropped remote items with blank text"
        );
    }

    Ok(quotes)
}

/// HTTP client for the remote quote endpoint.
#[derive(Debug, Clone)]
pub struct RemoteSyncClient {
    http: Client,
    url: String,
}

impl RemoteSyncClient {
    /// Create a client for `url` with a per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SyncError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// The endpoint this client polls.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and decode the remote collection.
    pub async fn fetch(&self) -> Result<Vec<Quote>, SyncError> {
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status));
        }

        let body = response.bytes().await?;
        let quotes = decode_payload(&body)?;

        tracing::debug!(url = %self.url, count = quotes.len(), "Fetched remote quotes");
        Ok(quotes)
    }
}
