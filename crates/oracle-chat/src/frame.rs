//! Frame splitting for the search event stream.
//!
//! The backend writes blank-line-delimited frames whose payload lines are
//! prefixed with `data:`. Network chunks can end anywhere, including inside
//! a frame, inside a line break pair, or inside a multi-byte character, so
//! everything after the last complete boundary is carried into the next call.

use std::sync::LazyLock;

use regex::Regex;

/// Blank line between frames, with bare or CR-prefixed line endings.
static FRAME_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\r?\n").expect("Invalid frame boundary regex"));

const DATA_FIELD: &str = "data:";

// =============================================================================
// Pure splitting
// =============================================================================

/// Result of splitting a text buffer on frame boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitFrames {
    /// Payloads of the complete frames, in stream order. Empty payloads are
    /// already dropped.
    pub payloads: Vec<String>,
    /// Trailing text with no boundary yet. Prefix of the next buffer.
    pub remainder: String,
}

/// Split `buffer` into complete frame payloads plus the unterminated tail.
pub fn split_frames(buffer: &str) -> SplitFrames {
    let mut segments: Vec<&str> = FRAME_BOUNDARY.split(buffer).collect();
    // `split` always yields at least one segment; the last one has no
    // boundary after it yet.
    let remainder = segments.pop().unwrap_or_default().to_string();
    let payloads = segments.into_iter().filter_map(frame_payload).collect();

    SplitFrames {
        payloads,
        remainder,
    }
}

/// Extract the payload of one complete frame.
///
/// Lines are trimmed and blank lines dropped. Only `data:` lines contribute,
/// with the field marker and at most one following space removed; several
/// data lines are joined with `\n`. Returns `None` when nothing remains.
pub fn frame_payload(frame: &str) -> Option<String> {
    let data_lines: Vec<&str> = frame
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.strip_prefix(DATA_FIELD))
        .map(|rest| rest.strip_prefix([' ', '\t']).unwrap_or(rest))
        .collect();

    let payload = data_lines.join("\n");
    if payload.is_empty() {
        None
    } else {
        Some(payload)
    }
}

// =============================================================================
// FrameSplitter
// =============================================================================

/// Incremental splitter fed with raw network chunks.
///
/// Owns the carry-over state between chunks: undecoded trailing bytes of an
/// incomplete UTF-8 sequence, and text after the last frame boundary.
#[derive(Debug, Default)]
pub struct FrameSplitter {
    pending_bytes: Vec<u8>,
    buffer: String,
}

impl FrameSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of bytes and return the payloads of every frame it
    /// completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.decode(chunk);
        let split = split_frames(&self.buffer);
        self.buffer = split.remainder;
        split.payloads
    }

    /// Text received after the last frame boundary.
    pub fn remainder(&self) -> &str {
        &self.buffer
    }

    /// Consume the splitter and return whatever never reached a boundary.
    ///
    /// Bytes of a truncated UTF-8 sequence are flushed as U+FFFD.
    pub fn finish(mut self) -> String {
        if !self.pending_bytes.is_empty() {
            self.buffer
                .push_str(&String::from_utf8_lossy(&self.pending_bytes));
            self.pending_bytes.clear();
        }
        self.buffer
    }

    fn decode(&mut self, chunk: &[u8]) {
        self.pending_bytes.extend_from_slice(chunk);
        let input = std::mem::take(&mut self.pending_bytes);
        let mut rest: &[u8] = &input;

        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    return;
                }
                Err(e) => {
                    let (valid, tail) = rest.split_at(e.valid_up_to());
                    if let Ok(text) = std::str::from_utf8(valid) {
                        self.buffer.push_str(text);
                    }
                    match e.error_len() {
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            rest = &tail[len..];
                        }
                        None => {
                            // Incomplete sequence at the end: wait for more bytes.
                            self.pending_bytes = tail.to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }
}
