//! Row-level domain events.

use serde::{Deserialize, Serialize};

use notehub_core::types::id::FileId;

use crate::document::file::File;

/// A row-level notification from the file table.
///
/// Emitted by the record store's change feed so that clients can keep
/// their navigation trees fresh even for documents they do not have a
/// realtime room open for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileRowChange {
    /// A file row was inserted.
    Inserted(File),
    /// A file row was updated.
    Updated(File),
    /// A file row was deleted.
    Deleted(FileId),
}
