//! Codec between deltas and the persisted `data` column.

use notehub_core::error::{AppError, ErrorKind};
use notehub_core::result::AppResult;

use crate::delta::Delta;

/// Serialize a content delta for the `data` column.
pub fn encode(delta: &Delta) -> AppResult<String> {
    serde_json::to_string(delta).map_err(|e| {
        AppError::with_source(ErrorKind::Serialization, "Failed to encode document content", e)
    })
}

/// Deserialize a `data` payload into a content delta.
///
/// An absent or empty payload short-circuits to `Ok(None)` without
/// touching the parser: it means "no content yet", not an error. Any
/// other malformed payload fails closed with a decode error — callers
/// show an empty document and log, they never crash the buffer.
pub fn decode(data: Option<&str>) -> AppResult<Option<Delta>> {
    let Some(raw) = data else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let delta = serde_json::from_str(raw).map_err(|e| {
        AppError::with_source(ErrorKind::Decode, "Malformed document content payload", e)
    })?;
    Ok(Some(delta))
}
