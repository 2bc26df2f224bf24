//! Card resolution for `found_card` references.
//!
//! Identifiers arrive as free text from the model and often carry quotes,
//! padding, or percent-encoding. They are normalized into a [`CardId`]
//! before a point lookup against the card-data provider.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use oracle_core::Card;

use crate::error::LookupError;

const QUOTE_CHARS: [char; 6] = ['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

/// A normalized, non-empty card identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CardId(String);

impl CardId {
    /// Normalize a raw identifier.
    ///
    /// Percent-decodes when the result is valid UTF-8 (otherwise keeps the
    /// raw text), removes straight and curly quotes, and removes whitespace.
    /// Returns `None` when nothing is left.
    pub fn normalize(raw: &str) -> Option<Self> {
        let decoded = urlencoding::decode(raw)
            .map(|cow| cow.into_owned())
            .unwrap_or_else(|_| raw.to_string());

        let cleaned: String = decoded
            .chars()
            .filter(|c| !QUOTE_CHARS.contains(c) && !c.is_whitespace())
            .collect();

        if cleaned.is_empty() {
            None
        } else {
            Some(Self(cleaned))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Point lookup against a card-data provider.
#[async_trait]
pub trait CardLookup: Send + Sync {
    /// Fetch the full record for `id`.
    async fn fetch_card(&self, id: &CardId) -> Result<Card, LookupError>;
}

/// Resolves card references through a [`CardLookup`].
///
/// Holds no mutable state; each call is independent. Duplicate references
/// are fetched again and collapsed when merged into the transcript.
#[derive(Clone)]
pub struct CardResolver {
    lookup: Arc<dyn CardLookup>,
}

impl CardResolver {
    pub fn new(lookup: Arc<dyn CardLookup>) -> Self {
        Self { lookup }
    }

    pub async fn resolve(&self, id: &CardId) -> Result<Card, LookupError> {
        match self.lookup.fetch_card(id).await {
            Ok(card) => {
                tracing::debug!(card_id = %id, name = %card.name, "Card resolved");
                Ok(card)
            }
            Err(e) => {
                tracing::warn!(card_id = %id, error = %e, "Card lookup failed");
                Err(e)
            }
        }
    }
}
