//! Selection ranges.

use serde::{Deserialize, Serialize};

/// A selection within a document: a caret position and a selected length
/// (zero for a bare caret). Character-indexed, like every delta offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    /// Character index of the selection start.
    pub index: usize,
    /// Number of selected characters.
    pub length: usize,
}

impl Range {
    /// A caret at `index` with nothing selected.
    pub fn caret(index: usize) -> Self {
        Self { index, length: 0 }
    }

    /// A selection spanning `length` characters from `index`.
    pub fn span(index: usize, length: usize) -> Self {
        Self { index, length }
    }
}
