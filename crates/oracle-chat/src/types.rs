//! Conversation records.

use chrono::Local;
use oracle_core::Card;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation.
///
/// Fields are read-only outside this crate; assistant turns grow only
/// through [`crate::transcript::Transcript`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    id: Uuid,
    role: Role,
    content: String,
    cards: Vec<Card>,
    /// Epoch seconds.
    created_at: i64,
}

impl Turn {
    pub(crate) fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            cards: Vec::new(),
            created_at: Local::now().timestamp(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Resolved cards in the order they were merged.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub(crate) fn content_mut(&mut self) -> &mut String {
        &mut self.content
    }

    pub(crate) fn cards_mut(&mut self) -> &mut Vec<Card> {
        &mut self.cards
    }
}

/// Ordered, append-only list of turns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append a user turn and its empty assistant reply together.
    ///
    /// Returns the index of the assistant turn.
    pub(crate) fn push_exchange(&mut self, query: &str) -> usize {
        self.turns.push(Turn::new(Role::User, query));
        self.turns.push(Turn::new(Role::Assistant, String::new()));
        self.turns.len() - 1
    }

    pub(crate) fn turn_mut(&mut self, index: usize) -> Option<&mut Turn> {
        self.turns.get_mut(index)
    }
}
