//! A single document room with member tracking.

use std::collections::HashSet;

use uuid::Uuid;

use crate::message::ConnectionId;

/// A realtime room scoped to one document id.
///
/// Lifetime: as long as at least one client is viewing the document.
#[derive(Debug, Clone)]
pub struct Room {
    /// The document this room is keyed by.
    pub document_id: Uuid,
    /// Set of member connection IDs.
    pub members: HashSet<ConnectionId>,
}

impl Room {
    /// Creates a new empty room.
    pub fn new(document_id: Uuid) -> Self {
        Self {
            document_id,
            members: HashSet::new(),
        }
    }

    /// Adds a member. Joining twice is a no-op.
    pub fn join(&mut self, conn_id: ConnectionId) {
        self.members.insert(conn_id);
    }

    /// Removes a member.
    pub fn leave(&mut self, conn_id: ConnectionId) {
        self.members.remove(&conn_id);
    }

    /// Returns member count.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the room has any members left.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns all member connection IDs.
    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.members.iter().copied().collect()
    }
}
