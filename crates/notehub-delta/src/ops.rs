//! Individual content operations.

use serde::{Deserialize, Serialize};

/// Formatting attributes attached to an insert or retain operation.
///
/// Keys are format names (`"bold"`, `"header"`, ...); a `null` value on a
/// retain removes that format from the retained span.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// One content operation.
///
/// The serialized form matches the conventional rich-text delta wire shape:
/// `{"insert": "text"}`, `{"retain": 4, "attributes": {"bold": true}}`,
/// `{"delete": 2}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeltaOp {
    /// Insert text, optionally formatted.
    Insert {
        /// The text to insert.
        insert: String,
        /// Formatting applied to the inserted text.
        #[serde(skip_serializing_if = "Option::is_none")]
        attributes: Option<Attributes>,
    },
    /// Keep a span of existing content, optionally reformatting it.
    Retain {
        /// Number of characters to keep.
        retain: usize,
        /// Formatting changes applied to the retained span.
        #[serde(skip_serializing_if = "Option::is_none")]
        attributes: Option<Attributes>,
    },
    /// Remove a span of existing content.
    Delete {
        /// Number of characters to remove.
        delete: usize,
    },
}

impl DeltaOp {
    /// Plain insert without formatting.
    pub fn insert(text: impl Into<String>) -> Self {
        Self::Insert {
            insert: text.into(),
            attributes: None,
        }
    }

    /// Formatted insert.
    pub fn insert_with(text: impl Into<String>, attributes: Attributes) -> Self {
        Self::Insert {
            insert: text.into(),
            attributes: Some(attributes),
        }
    }

    /// Plain retain.
    pub fn retain(len: usize) -> Self {
        Self::Retain {
            retain: len,
            attributes: None,
        }
    }

    /// Retain that reformats the span.
    pub fn retain_with(len: usize, attributes: Attributes) -> Self {
        Self::Retain {
            retain: len,
            attributes: Some(attributes),
        }
    }

    /// Delete.
    pub fn delete(len: usize) -> Self {
        Self::Delete { delete: len }
    }
}

/// Merge an attribute change into a base attribute set.
///
/// `null` values in the change remove the key; everything else overwrites.
/// Returns `None` when the merged map ends up empty.
pub fn merge_attributes(
    base: Option<&Attributes>,
    change: Option<&Attributes>,
) -> Option<Attributes> {
    let mut merged = base.cloned().unwrap_or_default();
    if let Some(change) = change {
        for (key, value) in change {
            if value.is_null() {
                merged.remove(key);
            } else {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    if merged.is_empty() { None } else { Some(merged) }
}
