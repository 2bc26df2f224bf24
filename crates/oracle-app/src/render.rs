//! Incremental terminal rendering of an assistant turn.

use std::io::{self, Write};

use oracle_core::Card;

const THINKING: &str = "Thinking...";

/// Prints the growth of one assistant turn as it streams.
///
/// Assistant content only ever grows while streaming, so each update prints
/// just the bytes past what has already been written.
#[derive(Debug, Default)]
pub struct TurnRenderer {
    printed: usize,
    thinking: bool,
}

impl TurnRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the current state of the turn.
    pub fn update(&mut self, out: &mut impl Write, content: &str, streaming: bool) -> io::Result<()> {
        if content.is_empty() {
            if streaming && !self.thinking {
                write!(out, "{}", THINKING)?;
                self.thinking = true;
                out.flush()?;
            }
            return Ok(());
        }

        if self.thinking {
            // Erase the placeholder line.
            write!(out, "\r\x1b[K")?;
            self.thinking = false;
        }
        if let Some(fresh) = content.get(self.printed..) {
            if !fresh.is_empty() {
                write!(out, "{}", fresh)?;
                self.printed = content.len();
            }
        }
        out.flush()
    }

    /// Close the turn: clear a lingering placeholder and end the line.
    pub fn finish(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.thinking {
            write!(out, "\r\x1b[K")?;
            self.thinking = false;
        } else if self.printed > 0 {
            writeln!(out)?;
        }
        out.flush()
    }
}

/// One display line for a resolved card.
pub fn card_line(card: &Card) -> String {
    let mut line = format!("  [card] {}", card.name);
    if let Some(ref type_line) = card.type_line {
        line.push_str(&format!(" ({})", type_line));
    }
    if let Some(image) = card.primary_image() {
        line.push_str(&format!(" {}", image));
    }
    line
}
