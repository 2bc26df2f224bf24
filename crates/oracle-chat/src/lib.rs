//! Streaming chat client for the card oracle.
//!
//! Reads the backend's search event stream, splits it into frames, decodes
//! each frame into a typed event and folds the events into a growing
//! conversation transcript, resolving card references along the way.

pub mod cancel;
pub mod client;
pub mod decoder;
mod driver;
pub mod error;
pub mod frame;
pub mod resolver;
pub mod session;
pub mod transcript;
pub mod types;

pub use cancel::CancelHandle;
pub use client::{ByteStream, OracleClient, StreamSource};
pub use decoder::{decode_event, StreamEvent, DONE_SENTINEL};
pub use error::{ChatError, LookupError};
pub use frame::{frame_payload, split_frames, FrameSplitter, SplitFrames};
pub use resolver::{CardId, CardLookup, CardResolver};
pub use session::{ChatSession, SessionSnapshot, StreamStatus};
pub use transcript::Transcript;
pub use types::{Conversation, Role, Turn};
