//! Data model for a parsed document-understanding result.
//!
//! Mirrors the serialized form the OCR backend emits: a full linearized
//! `text`, a flat list of typed entities whose mentions anchor into that
//! text, and per-page table detections whose cells carry anchors only.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DocumentError;

/// A parsed document-understanding result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    /// Full linearized text of the document.
    pub text: String,

    /// Typed entities in document order.
    pub entities: Vec<Entity>,

    /// Pages with detected tables.
    pub pages: Vec<Page>,
}

impl Document {
    /// Parse a serialized document-understanding result.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a serialized document-understanding result from disk.
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Mention text of the last entity carrying the given type.
    ///
    /// Later detections refine earlier ones, so on duplicate types the last
    /// occurrence wins.
    pub fn entity_text(&self, entity_type: &str) -> Option<&str> {
        self.entities
            .iter()
            .rev()
            .find(|e| e.entity_type == entity_type)
            .map(|e| e.mention_text.as_str())
    }

    /// Line-item entities in document order.
    pub fn line_items(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.entity_type == "line_item")
    }
}

/// A typed span detected in the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Entity {
    /// Entity type tag, e.g. `line_item` or `invoice_date`.
    #[serde(rename = "type")]
    pub entity_type: String,

    /// Raw text of the span the entity was detected on.
    pub mention_text: String,

    /// Detection confidence in `[0, 1]`.
    pub confidence: f32,

    /// One level of typed sub-properties, e.g. `line_item/unit_price`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Entity>,

    /// Anchor of the mention into the document text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_anchor: Option<TextAnchor>,
}

impl Entity {
    /// First property carrying the given type.
    pub fn property(&self, property_type: &str) -> Option<&Entity> {
        self.properties.iter().find(|p| p.entity_type == property_type)
    }

    /// Trimmed mention text of the first property carrying the given type.
    pub fn property_text(&self, property_type: &str) -> Option<&str> {
        self.property(property_type).map(|p| p.mention_text.trim())
    }
}

/// One page of the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    /// Tables detected on the page.
    pub tables: Vec<Table>,
}

/// A detected table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    /// Header rows (usually one).
    pub header_rows: Vec<TableRow>,

    /// Body rows.
    pub body_rows: Vec<TableRow>,
}

/// One row of a detected table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRow {
    /// Cells in column order.
    pub cells: Vec<TableCell>,
}

/// One cell of a detected table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableCell {
    /// Layout of the cell; cells carry no text of their own.
    pub layout: Layout,
}

impl TableCell {
    /// Resolved cell text, empty when the cell has no anchor.
    pub fn text(&self, document_text: &str) -> String {
        self.layout
            .text_anchor
            .as_ref()
            .map(|anchor| anchor.resolve(document_text))
            .unwrap_or_default()
    }
}

/// Layout information for a detected element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Anchor into the document text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_anchor: Option<TextAnchor>,
}

/// An anchor tying a detected element back to spans of the document text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAnchor {
    /// Spans in reading order.
    pub text_segments: Vec<TextSegment>,
}

impl TextAnchor {
    /// Build an anchor from `(start, end)` byte offsets.
    pub fn from_segments<I>(segments: I) -> Self
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        Self {
            text_segments: segments
                .into_iter()
                .map(|(start, end)| TextSegment {
                    start_index: Some(start),
                    end_index: Some(end),
                })
                .collect(),
        }
    }

    /// Reconstruct the anchored text by concatenating `text[start..end)` for
    /// every segment in order.
    ///
    /// Never fails: a missing start is 0, a missing end is the full text
    /// length, and hostile offsets (past the end, inverted, or inside a
    /// multi-byte character) clamp to the nearest covered boundary.
    pub fn resolve(&self, text: &str) -> String {
        let mut resolved = String::new();
        for segment in &self.text_segments {
            let start = segment.start_index.unwrap_or(0) as usize;
            let end = segment.end_index.map(|e| e as usize).unwrap_or(text.len());

            let mut end = end.min(text.len());
            let mut start = start.min(end);
            while start > 0 && !text.is_char_boundary(start) {
                start -= 1;
            }
            while end > start && !text.is_char_boundary(end) {
                end -= 1;
            }
            resolved.push_str(&text[start..end]);
        }
        resolved
    }
}

/// One contiguous span of document text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSegment {
    /// Byte offset of the first character, absent for spans starting at 0.
    #[serde(deserialize_with = "index_opt", skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u64>,

    /// Byte offset one past the last character, absent for spans reaching
    /// the end of the text.
    #[serde(deserialize_with = "index_opt", skip_serializing_if = "Option::is_none")]
    pub end_index: Option<u64>,
}

/// Anchor indices arrive as JSON numbers or as decimal strings depending on
/// the serializer that produced the dump; accept both.
fn index_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Index {
        Number(u64),
        Text(String),
    }

    match Option::<Index>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Index::Number(n)) => Ok(Some(n)),
        Some(Index::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_concatenates_segments() {
        let anchor = TextAnchor::from_segments([(0, 3), (5, 8)]);
        assert_eq!(anchor.resolve("abcdefgh"), "abcfgh");
    }

    #[test]
    fn test_resolve_missing_bounds() {
        let anchor = TextAnchor {
            text_segments: vec![TextSegment {
                start_index: None,
                end_index: None,
            }],
        };
        assert_eq!(anchor.resolve("whole text"), "whole text");

        let tail = TextAnchor {
            text_segments: vec![TextSegment {
                start_index: Some(6),
                end_index: None,
            }],
        };
        assert_eq!(tail.resolve("whole text"), "text");
    }

    #[test]
    fn test_resolve_clamps_hostile_offsets() {
        let past_end = TextAnchor::from_segments([(2, 99)]);
        assert_eq!(past_end.resolve("abcd"), "cd");

        let inverted = TextAnchor::from_segments([(5, 2)]);
        assert_eq!(inverted.resolve("abcdefgh"), "");

        // 'é' is two bytes; offset 1 lands inside it.
        let mid_char = TextAnchor::from_segments([(1, 3)]);
        assert_eq!(mid_char.resolve("éa"), "éa");
    }

    #[test]
    fn test_from_json_accepts_string_indices() {
        let json = r#"{
            "text": "Invoice text",
            "entities": [
                {
                    "type": "line_item",
                    "mention_text": "Invoice",
                    "confidence": 0.95,
                    "text_anchor": {
                        "text_segments": [
                            {"start_index": "0", "end_index": 7}
                        ]
                    }
                }
            ]
        }"#;
        let document = Document::from_json(json).unwrap();
        let entity = &document.entities[0];
        assert_eq!(entity.entity_type, "line_item");
        let anchor = entity.text_anchor.as_ref().unwrap();
        assert_eq!(anchor.text_segments[0].start_index, Some(0));
        assert_eq!(anchor.resolve(&document.text), "Invoice");
    }

    #[test]
    fn test_entity_text_last_occurrence_wins() {
        let document = Document {
            entities: vec![
                Entity {
                    entity_type: "invoice_id".to_string(),
                    mention_text: "OLD-1".to_string(),
                    ..Default::default()
                },
                Entity {
                    entity_type: "invoice_id".to_string(),
                    mention_text: "NEW-2".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(document.entity_text("invoice_id"), Some("NEW-2"));
        assert_eq!(document.entity_text("missing"), None);
    }

    #[test]
    fn test_from_file_reads_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        std::fs::write(&path, r#"{"text": "hello", "entities": [], "pages": []}"#).unwrap();
        let document = Document::from_file(&path).unwrap();
        assert_eq!(document.text, "hello");
    }
}
