//! Transcript accumulator: folds stream events into the active assistant turn.
//!
//! The active turn is tracked by index, set when an exchange begins and
//! cleared when its stream ends. Every mutation is a no-op without an active
//! assistant turn, so late events can never touch a sealed or user turn.

use oracle_core::Card;

use crate::types::{Conversation, Role, Turn};

/// Conversation plus the index of the assistant turn currently streaming.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    conversation: Conversation,
    active: Option<usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn turns(&self) -> &[Turn] {
        self.conversation.turns()
    }

    /// The assistant turn still accepting mutations, if any.
    pub fn active_turn(&self) -> Option<&Turn> {
        self.active.and_then(|index| self.conversation.turns().get(index))
    }

    /// Append a user turn with an empty assistant reply and make the reply
    /// the active turn. Any previously active turn is sealed.
    pub fn begin_exchange(&mut self, query: &str) -> &Turn {
        let index = self.conversation.push_exchange(query);
        self.active = Some(index);
        &self.conversation.turns()[index]
    }

    /// Seal the active turn. Later mutations are ignored.
    pub fn finish(&mut self) {
        self.active = None;
    }

    /// Concatenate streamed text onto the active turn.
    pub fn append_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        match self.active_mut() {
            Some(turn) => {
                turn.content_mut().push_str(text);
                true
            }
            None => false,
        }
    }

    /// Append a notice as its own line, terminated by `\n`.
    pub fn append_notice(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        match self.active_mut() {
            Some(turn) => {
                let content = turn.content_mut();
                if !content.is_empty() {
                    content.push('\n');
                }
                content.push_str(text);
                content.push('\n');
                true
            }
            None => false,
        }
    }

    /// Add a card unless one with the same id is already attached.
    pub fn merge_card(&mut self, card: Card) -> bool {
        match self.active_mut() {
            Some(turn) => {
                if turn.cards().iter().any(|existing| existing.id == card.id) {
                    return false;
                }
                turn.cards_mut().push(card);
                true
            }
            None => false,
        }
    }

    fn active_mut(&mut self) -> Option<&mut Turn> {
        let index = self.active?;
        self.conversation
            .turn_mut(index)
            .filter(|turn| turn.role() == Role::Assistant)
    }
}
