//! Stream driver: the read loop behind one submission.
//!
//! Reads chunks, splits them into frames, decodes each frame and applies the
//! resulting event to the active turn, in arrival order. Card lookups are
//! awaited inline so no two mutations of the turn ever overlap. The driver
//! is the only place that suspends; every suspension also watches the
//! session's cancel handle.

use std::future::Future;

use futures::StreamExt;
use tokio::sync::watch;

use crate::cancel::CancelHandle;
use crate::client::StreamSource;
use crate::decoder::{decode_event, StreamEvent, DONE_SENTINEL};
use crate::error::ChatError;
use crate::frame::{frame_payload, FrameSplitter};
use crate::resolver::{CardId, CardResolver};
use crate::session::{SessionSnapshot, SessionState, StreamStatus};
use crate::transcript::Transcript;

/// What the loop does after one event.
enum Step {
    Continue,
    Done,
    Cancelled,
}

/// Borrowed view of a session for the duration of one stream.
///
/// If dropped while still streaming (the `submit` future was abandoned),
/// the active turn is sealed and the session is marked cancelled.
pub(crate) struct StreamDriver<'a> {
    pub(crate) state: &'a mut SessionState,
    pub(crate) source: &'a dyn StreamSource,
    pub(crate) resolver: &'a CardResolver,
    pub(crate) cancel: &'a CancelHandle,
    pub(crate) updates: &'a watch::Sender<SessionSnapshot>,
}

impl StreamDriver<'_> {
    /// Consume the stream for `query` until a terminal state is reached.
    pub(crate) async fn run(&mut self, query: &str) -> Result<StreamStatus, ChatError> {
        let cancel = self.cancel;
        let source = self.source;

        let Some(opened) = unless_cancelled(cancel, source.open_stream(query)).await else {
            return Ok(self.cancelled());
        };
        let mut stream = match opened {
            Ok(stream) => stream,
            Err(e) => return Err(self.fail(e)),
        };

        let mut splitter = FrameSplitter::new();
        let mut done_seen = false;

        while !done_seen {
            let Some(next) = unless_cancelled(cancel, stream.next()).await else {
                return Ok(self.cancelled());
            };
            let chunk = match next {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => return Err(self.fail(e)),
                None => break,
            };

            for payload in splitter.push(&chunk) {
                if payload == DONE_SENTINEL {
                    continue;
                }
                match self.dispatch(decode_event(&payload)).await {
                    Step::Continue => {}
                    Step::Done => {
                        done_seen = true;
                        break;
                    }
                    Step::Cancelled => return Ok(self.cancelled()),
                }
            }
        }

        if !done_seen {
            self.apply_trailing(&splitter.finish());
            return Err(self.fail(ChatError::PrematureTermination));
        }

        Ok(self.complete())
    }

    async fn dispatch(&mut self, event: StreamEvent) -> Step {
        match event {
            StreamEvent::Chunk { text } => self.mutate(|t| t.append_text(&text)),
            StreamEvent::SeekingCard { label } => {
                let notice = StreamEvent::seeking_notice(label.as_deref());
                self.mutate(|t| t.append_notice(&notice));
            }
            StreamEvent::FoundCard { raw_id } => {
                let Some(id) = CardId::normalize(&raw_id) else {
                    tracing::debug!(raw_id = %raw_id, "Skipping card reference with empty id");
                    return Step::Continue;
                };
                let resolver = self.resolver;
                match unless_cancelled(self.cancel, resolver.resolve(&id)).await {
                    None => return Step::Cancelled,
                    Some(Ok(card)) => self.mutate(|t| t.merge_card(card)),
                    Some(Err(e)) => {
                        let notice = e.to_string();
                        self.mutate(|t| t.append_notice(&notice));
                    }
                }
            }
            StreamEvent::Done => return Step::Done,
            StreamEvent::Meta => tracing::debug!("Ignoring stream metadata"),
            StreamEvent::Malformed { raw } => self.mutate(|t| t.append_text(&raw)),
        }
        Step::Continue
    }

    /// Best-effort use of text that never reached a frame boundary.
    fn apply_trailing(&mut self, leftover: &str) {
        if leftover.trim().is_empty() {
            return;
        }
        let payload = frame_payload(leftover).unwrap_or_else(|| leftover.trim().to_string());
        if payload == DONE_SENTINEL {
            return;
        }
        match decode_event(&payload) {
            StreamEvent::Chunk { text } => self.mutate(|t| t.append_text(&text)),
            StreamEvent::Malformed { raw } => self.mutate(|t| t.append_text(&raw)),
            other => tracing::debug!(event = ?other, "Ignoring trailing event after stream end"),
        }
    }

    fn mutate(&mut self, apply: impl FnOnce(&mut Transcript) -> bool) {
        if apply(&mut self.state.transcript) {
            self.publish();
        }
    }

    fn complete(&mut self) -> StreamStatus {
        tracing::info!("Stream completed");
        self.settle(StreamStatus::Completed);
        StreamStatus::Completed
    }

    fn cancelled(&mut self) -> StreamStatus {
        tracing::info!("Stream cancelled");
        self.settle(StreamStatus::Cancelled);
        StreamStatus::Cancelled
    }

    fn fail(&mut self, err: ChatError) -> ChatError {
        tracing::error!(error = %err, "Stream failed");
        self.state.error = Some(err.to_string());
        self.settle(StreamStatus::Failed);
        err
    }

    fn settle(&mut self, status: StreamStatus) {
        self.state.transcript.finish();
        self.state.status = status;
        self.publish();
    }

    fn publish(&self) {
        self.updates.send_replace(self.state.snapshot());
    }
}

impl Drop for StreamDriver<'_> {
    fn drop(&mut self) {
        if self.state.status == StreamStatus::Streaming {
            tracing::info!("Stream abandoned before completion");
            self.settle(StreamStatus::Cancelled);
        }
    }
}

/// Run `fut` unless the handle is cancelled first.
async fn unless_cancelled<F: Future>(cancel: &CancelHandle, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        out = fut => Some(out),
    }
}
