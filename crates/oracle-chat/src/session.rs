//! Chat session: the per-user controller owning the conversation.
//!
//! A session accepts one submission at a time. Each submission appends a
//! user turn and an empty assistant turn, then streams the backend response
//! into that assistant turn until a terminal state is reached.

use std::sync::Arc;

use oracle_core::config::ApiConfig;
use serde::Serialize;
use tokio::sync::watch;

use crate::cancel::CancelHandle;
use crate::client::{OracleClient, StreamSource};
use crate::driver::StreamDriver;
use crate::error::ChatError;
use crate::resolver::{CardLookup, CardResolver};
use crate::transcript::Transcript;
use crate::types::Turn;

/// Lifecycle of the current (or most recent) submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    /// No submission yet.
    #[default]
    Idle,
    Streaming,
    /// A `done` event was received.
    Completed,
    /// Transport failure or premature end of stream. See the session error.
    Failed,
    /// Abandoned by the caller.
    Cancelled,
}

impl StreamStatus {
    pub fn is_streaming(self) -> bool {
        self == StreamStatus::Streaming
    }
}

/// Point-in-time view of a session for display.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SessionSnapshot {
    pub turns: Vec<Turn>,
    pub is_streaming: bool,
    pub error: Option<String>,
    pub status: StreamStatus,
}

#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) transcript: Transcript,
    pub(crate) status: StreamStatus,
    pub(crate) error: Option<String>,
}

impl SessionState {
    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            turns: self.transcript.turns().to_vec(),
            is_streaming: self.status.is_streaming(),
            error: self.error.clone(),
            status: self.status,
        }
    }
}

/// Session-scoped owner of the conversation and its stream driver.
pub struct ChatSession {
    source: Arc<dyn StreamSource>,
    resolver: CardResolver,
    cancel: CancelHandle,
    state: SessionState,
    updates: watch::Sender<SessionSnapshot>,
}

impl ChatSession {
    /// Create a session with an empty conversation.
    pub fn new(source: Arc<dyn StreamSource>, lookup: Arc<dyn CardLookup>) -> Self {
        let state = SessionState::default();
        let (updates, _) = watch::channel(state.snapshot());
        Self {
            source,
            resolver: CardResolver::new(lookup),
            cancel: CancelHandle::new(),
            state,
            updates,
        }
    }

    /// Create a session talking to the backend at `api.base_url`.
    pub fn from_config(api: &ApiConfig) -> Result<Self, ChatError> {
        let client = Arc::new(OracleClient::new(api)?);
        let source: Arc<dyn StreamSource> = client.clone();
        Ok(Self::new(source, client))
    }

    /// Submit a query and stream the answer into a new assistant turn.
    ///
    /// Returns the terminal status (`Completed` or `Cancelled`), or the
    /// stream-level error that ended the submission. The transcript keeps
    /// whatever was applied before a failure.
    pub async fn submit(&mut self, query: &str) -> Result<StreamStatus, ChatError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ChatError::EmptyQuery);
        }
        if self.state.status.is_streaming() {
            tracing::warn!("Submission rejected while a response is streaming");
            return Err(ChatError::AlreadyStreaming);
        }

        self.cancel.reset();
        self.state.error = None;
        self.state.status = StreamStatus::Streaming;
        self.state.transcript.begin_exchange(query);
        self.updates.send_replace(self.state.snapshot());
        tracing::info!(query = %query, "Query submitted");

        let mut driver = StreamDriver {
            state: &mut self.state,
            source: self.source.as_ref(),
            resolver: &self.resolver,
            cancel: &self.cancel,
            updates: &self.updates,
        };
        driver.run(query).await
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }

    /// Receiver notified after every transcript mutation and status change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    /// Handle for abandoning the active stream from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn turns(&self) -> &[Turn] {
        self.state.transcript.turns()
    }

    pub fn status(&self) -> StreamStatus {
        self.state.status
    }

    pub fn is_streaming(&self) -> bool {
        self.state.status.is_streaming()
    }

    /// Message of the stream-level error that ended the last submission.
    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }
}
