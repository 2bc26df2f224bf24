//! Decoding of frame payloads into typed stream events.
//!
//! Decoding never fails: anything that is not a recognized JSON event is
//! returned as [`StreamEvent::Malformed`] so the driver can show it verbatim.

use serde::Deserialize;

/// Literal payload some backends send as an end-of-stream sentinel. The
/// driver skips it before decoding.
pub const DONE_SENTINEL: &str = "[DONE]";

/// One decoded application event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Text to append to the assistant turn.
    Chunk { text: String },
    /// A card lookup is starting upstream.
    SeekingCard { label: Option<String> },
    /// A card reference to resolve. The identifier is not yet normalized.
    FoundCard { raw_id: String },
    /// Normal end of the response.
    Done,
    /// Response metadata. Carries nothing the transcript needs.
    Meta,
    /// Payload that did not decode as a known event.
    Malformed { raw: String },
}

impl StreamEvent {
    /// Status line shown in the transcript for a `SeekingCard` event.
    pub fn seeking_notice(label: Option<&str>) -> String {
        match label {
            Some(label) if !label.trim().is_empty() => format!("Searching card: {}", label),
            _ => "Searching for card...".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireEvent {
    Chunk {
        content: String,
    },
    SeekingCard {
        #[serde(default)]
        content: Option<String>,
    },
    FoundCard {
        id: String,
    },
    Done {},
    Meta {},
}

impl From<WireEvent> for StreamEvent {
    fn from(wire: WireEvent) -> Self {
        match wire {
            WireEvent::Chunk { content } => StreamEvent::Chunk { text: content },
            WireEvent::SeekingCard { content } => StreamEvent::SeekingCard { label: content },
            WireEvent::FoundCard { id } => StreamEvent::FoundCard { raw_id: id },
            WireEvent::Done {} => StreamEvent::Done,
            WireEvent::Meta {} => StreamEvent::Meta,
        }
    }
}

/// Decode one frame payload.
pub fn decode_event(payload: &str) -> StreamEvent {
    match serde_json::from_str::<WireEvent>(payload) {
        Ok(wire) => wire.into(),
        Err(e) => {
            tracing::debug!(error = %e, len = payload.len(), "Undecodable frame, keeping as text");
            StreamEvent::Malformed {
                raw: payload.to_string(),
            }
        }
    }
}
