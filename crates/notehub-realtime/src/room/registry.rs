//! Room registry — manages all active document rooms and memberships.

use std::collections::HashSet;

use dashmap::DashMap;
use uuid::Uuid;

use crate::message::ConnectionId;

use super::room::Room;

/// Registry of all active document rooms, with a reverse index from
/// connection to joined rooms so a disconnect can clean up everything.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    /// Document id → room.
    rooms: DashMap<Uuid, Room>,
    /// Connection id → set of joined document ids.
    memberships: DashMap<ConnectionId, HashSet<Uuid>>,
}

impl RoomRegistry {
    /// Creates a new room registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins a connection to a document's room, creating the room on
    /// first join. Idempotent.
    pub fn join(&self, document_id: Uuid, conn_id: ConnectionId) {
        self.rooms
            .entry(document_id)
            .or_insert_with(|| Room::new(document_id))
            .join(conn_id);

        self.memberships
            .entry(conn_id)
            .or_default()
            .insert(document_id);
    }

    /// Removes a connection from a document's room. The room is dropped
    /// once its last member leaves.
    pub fn leave(&self, document_id: Uuid, conn_id: ConnectionId) {
        if let Some(mut room) = self.rooms.get_mut(&document_id) {
            room.leave(conn_id);
            if room.is_empty() {
                drop(room);
                self.rooms.remove(&document_id);
            }
        }
        if let Some(mut joined) = self.memberships.get_mut(&conn_id) {
            joined.remove(&document_id);
        }
    }

    /// Removes a connection from every room it joined.
    pub fn leave_all(&self, conn_id: ConnectionId) {
        let joined = self
            .memberships
            .remove(&conn_id)
            .map(|(_, rooms)| rooms)
            .unwrap_or_default();
        for document_id in &joined {
            if let Some(mut room) = self.rooms.get_mut(document_id) {
                room.leave(conn_id);
                if room.is_empty() {
                    drop(room);
                    self.rooms.remove(document_id);
                }
            }
        }
    }

    /// Returns all member connection IDs of a document's room.
    pub fn members(&self, document_id: Uuid) -> Vec<ConnectionId> {
        self.rooms
            .get(&document_id)
            .map(|room| room.member_ids())
            .unwrap_or_default()
    }

    /// Returns the member count of a document's room.
    pub fn member_count(&self, document_id: Uuid) -> usize {
        self.rooms
            .get(&document_id)
            .map(|room| room.member_count())
            .unwrap_or(0)
    }

    /// Returns the number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
