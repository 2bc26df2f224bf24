use serde::{Deserialize, Serialize};

// =============================================================================
// Card records
// =============================================================================

/// Image renditions published for a card or card face.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageUris {
    pub small: Option<String>,
    pub normal: Option<String>,
    pub large: Option<String>,
    pub png: Option<String>,
    pub art_crop: Option<String>,
    pub border_crop: Option<String>,
}

/// One face of a multi-faced card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardFace {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<ImageUris>,
}

/// A card record returned by the card-data provider.
///
/// Only `id` carries meaning for the streaming core (it is the dedup key).
/// Fields the client does not model are kept verbatim in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uris: Option<ImageUris>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_faces: Option<Vec<CardFace>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Card {
    /// Minimal record with just an identity and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            oracle_text: None,
            type_line: None,
            image_uris: None,
            card_faces: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Whether the card is printed with more than one face.
    pub fn is_multi_faced(&self) -> bool {
        self.card_faces.as_ref().is_some_and(|faces| faces.len() > 1)
    }

    /// The `normal` image of the card, or of its first face for multi-faced
    /// cards that carry no top-level image.
    pub fn primary_image(&self) -> Option<&str> {
        if let Some(url) = self.image_uris.as_ref().and_then(|u| u.normal.as_deref()) {
            return Some(url);
        }
        self.card_faces
            .as_ref()
            .and_then(|faces| faces.first())
            .and_then(|face| face.image_uris.as_ref())
            .and_then(|u| u.normal.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_deserialize_single_face() {
        let json = r#"{
            "id": "abc-123",
            "name": "Lightning Bolt",
            "oracle_text": "Lightning Bolt deals 3 damage to any target.",
            "type_line": "Instant",
            "image_uris": {"small": "s.jpg", "normal": "n.jpg"},
            "cmc": 1.0,
            "set_name": "Alpha"
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, "abc-123");
        assert_eq!(card.name, "Lightning Bolt");
        assert_eq!(card.type_line.as_deref(), Some("Instant"));
        assert_eq!(card.primary_image(), Some("n.jpg"));
        assert!(!card.is_multi_faced());
        assert_eq!(card.extra["set_name"], "Alpha");
        assert_eq!(card.extra["cmc"], 1.0);
    }

    #[test]
    fn test_card_primary_image_falls_back_to_first_face() {
        let json = r#"{
            "id": "dfc-1",
            "name": "Delver of Secrets // Insectile Aberration",
            "card_faces": [
                {"name": "Delver of Secrets", "image_uris": {"normal": "front.jpg"}},
                {"name": "Insectile Aberration", "image_uris": {"normal": "back.jpg"}}
            ]
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert!(card.is_multi_faced());
        assert_eq!(card.primary_image(), Some("front.jpg"));
    }

    #[test]
    fn test_card_requires_id() {
        let result: Result<Card, _> = serde_json::from_str(r#"{"name": "Bolt"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_card_new_has_no_image() {
        let card = Card::new("abc-123", "Bolt");
        assert_eq!(card.primary_image(), None);
        assert!(card.extra.is_empty());
    }

    #[test]
    fn test_card_serialization_keeps_extra_fields() {
        let json = r#"{"id":"x","name":"Y","rarity":"rare"}"#;
        let card: Card = serde_json::from_str(json).unwrap();
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["rarity"], "rare");
        assert!(value.get("oracle_text").is_none());
    }
}
