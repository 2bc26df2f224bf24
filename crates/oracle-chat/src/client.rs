//! HTTP access to the oracle backend.
//!
//! One [`OracleClient`] serves both endpoints under the configured base URL:
//! `GET /stream/search?query=` for the event stream and `GET /cards/{id}`
//! for card records.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use oracle_core::config::ApiConfig;
use oracle_core::Card;
use reqwest::header::ACCEPT;

use crate::error::{ChatError, LookupError};
use crate::resolver::{CardId, CardLookup};

/// Raw response body, chunked however the network delivers it.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, ChatError>>;

const EVENT_STREAM_MIME_TYPE: &str = "text/event-stream";

/// Opens the search event stream for a query.
#[async_trait]
pub trait StreamSource: Send + Sync {
    async fn open_stream(&self, query: &str) -> Result<ByteStream, ChatError>;
}

/// reqwest-backed client for the oracle backend.
#[derive(Clone, Debug)]
pub struct OracleClient {
    http: reqwest::Client,
    base_url: String,
}

impl OracleClient {
    /// Build a client from the API section of the configuration.
    pub fn new(api: &ApiConfig) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(api.connect_timeout_secs))
            .build()
            .map_err(|e| ChatError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: api.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the search stream for `query`.
    pub fn stream_url(&self, query: &str) -> String {
        format!(
            "{}/stream/search?query={}",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    /// URL of the card record for `id`.
    pub fn card_url(&self, id: &CardId) -> String {
        format!(
            "{}/cards/{}",
            self.base_url,
            urlencoding::encode(id.as_str())
        )
    }
}

#[async_trait]
impl StreamSource for OracleClient {
    async fn open_stream(&self, query: &str) -> Result<ByteStream, ChatError> {
        let url = self.stream_url(query);
        tracing::info!(url = %url, "Opening search stream");

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, EVENT_STREAM_MIME_TYPE)
            .send()
            .await
            .map_err(|e| ChatError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Transport(format!(
                "Request failed with {}",
                status.as_u16()
            )));
        }

        let body = response.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|e| ChatError::Transport(format!("Stream read failed: {}", e)))
        });
        Ok(body.boxed())
    }
}

#[async_trait]
impl CardLookup for OracleClient {
    async fn fetch_card(&self, id: &CardId) -> Result<Card, LookupError> {
        let response = self
            .http
            .get(self.card_url(id))
            .send()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response
            .json::<Card>()
            .await
            .map_err(|e| LookupError::InvalidRecord(e.to_string()))
    }
}
