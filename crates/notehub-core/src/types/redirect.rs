//! Navigation fallback targets.

use serde::{Deserialize, Serialize};

use crate::types::id::WorkspaceId;

/// Where to send the user when the document they are viewing stops
/// existing (missing row, invalid id, deletion under their feet).
///
/// Policy: always the nearest valid ancestor context, never a blank
/// error page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Redirect {
    /// The dashboard root — no workspace context remained.
    Dashboard,
    /// The root page of a workspace.
    Workspace(WorkspaceId),
}
