//! Presence channels with full-snapshot sync events.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use notehub_entity::CollaboratorIdentity;

/// Events published on a document's presence channel.
#[derive(Debug, Clone)]
pub enum PresenceEvent {
    /// Full snapshot of the room's tracked members. Published after every
    /// membership change; receivers diff against their previous view to
    /// derive joins and leaves.
    Sync {
        /// Everyone currently tracked in the room, including the
        /// receiver's own identity.
        members: Vec<CollaboratorIdentity>,
    },
}

/// One presence room.
#[derive(Debug)]
struct PresenceRoom {
    tx: broadcast::Sender<PresenceEvent>,
    /// Subscriber token → announced identity. A subscriber appears in
    /// snapshots only after it has tracked an identity.
    members: HashMap<Uuid, Option<CollaboratorIdentity>>,
}

/// Registry of presence rooms, one per actively viewed document.
/// Cheap to clone; clones share the same room state.
///
/// Separate from the delta relay on purpose: presence is ephemeral
/// membership/identity state, never persisted, and gone the moment the
/// last subscription is released.
#[derive(Debug, Clone)]
pub struct PresenceRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Debug)]
struct RegistryInner {
    rooms: DashMap<Uuid, PresenceRoom>,
    buffer_size: usize,
}

impl PresenceRegistry {
    /// Creates a presence registry. `buffer_size` bounds each room's
    /// event channel.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                rooms: DashMap::new(),
                buffer_size,
            }),
        }
    }

    /// Subscribes to a document's presence room. The subscriber receives
    /// sync events immediately but is not part of snapshots until it
    /// calls [`PresenceHandle::track`].
    pub fn subscribe(&self, document_id: Uuid) -> PresenceSubscription {
        let token = Uuid::new_v4();
        let events = {
            let mut room = self
                .inner
                .rooms
                .entry(document_id)
                .or_insert_with(|| PresenceRoom {
                    tx: broadcast::channel(self.inner.buffer_size).0,
                    members: HashMap::new(),
                });
            room.members.insert(token, None);
            room.tx.subscribe()
        };
        PresenceSubscription {
            handle: PresenceHandle {
                registry: self.clone(),
                document_id,
                token,
                left: Arc::new(AtomicBool::new(false)),
            },
            events,
        }
    }

    /// Current tracked members of a document's room.
    pub fn members(&self, document_id: Uuid) -> Vec<CollaboratorIdentity> {
        self.inner
            .rooms
            .get(&document_id)
            .map(|room| room.members.values().flatten().cloned().collect())
            .unwrap_or_default()
    }

    fn track(&self, document_id: Uuid, token: Uuid, identity: CollaboratorIdentity) {
        if let Some(mut room) = self.inner.rooms.get_mut(&document_id) {
            room.members.insert(token, Some(identity));
        }
        self.sync(document_id);
    }

    fn leave(&self, document_id: Uuid, token: Uuid) {
        let emptied = match self.inner.rooms.get_mut(&document_id) {
            Some(mut room) => {
                room.members.remove(&token);
                room.members.is_empty()
            }
            None => return,
        };
        if emptied {
            self.inner.rooms.remove(&document_id);
            debug!(%document_id, "presence room released");
        } else {
            self.sync(document_id);
        }
    }

    fn sync(&self, document_id: Uuid) {
        if let Some(room) = self.inner.rooms.get(&document_id) {
            let members = room.members.values().flatten().cloned().collect();
            let _ = room.tx.send(PresenceEvent::Sync { members });
        }
    }
}

/// A track/leave handle on one room membership. Cheap to clone; all
/// clones share the same membership and the same leave-once guard.
#[derive(Debug, Clone)]
pub struct PresenceHandle {
    registry: PresenceRegistry,
    document_id: Uuid,
    token: Uuid,
    left: Arc<AtomicBool>,
}

impl PresenceHandle {
    /// Announces the local identity into the room. Peers (and the caller)
    /// receive a fresh snapshot.
    pub fn track(&self, identity: CollaboratorIdentity) {
        if !self.left.load(Ordering::SeqCst) {
            self.registry.track(self.document_id, self.token, identity);
        }
    }

    /// Leaves the room, so the membership stops receiving and announcing.
    /// Idempotent: only the first call across all clones does anything.
    pub fn leave(&self) {
        if !self.left.swap(true, Ordering::SeqCst) {
            self.registry.leave(self.document_id, self.token);
        }
    }
}

/// A live membership in one document's presence room: the handle plus
/// the event stream. Dropping the subscription leaves the room.
#[derive(Debug)]
pub struct PresenceSubscription {
    handle: PresenceHandle,
    events: broadcast::Receiver<PresenceEvent>,
}

impl PresenceSubscription {
    /// A clone of the track/leave handle, e.g. for a teardown path that
    /// outlives the event loop consuming `self`.
    pub fn handle(&self) -> PresenceHandle {
        self.handle.clone()
    }

    /// Announces the local identity into the room.
    pub fn track(&self, identity: CollaboratorIdentity) {
        self.handle.track(identity);
    }

    /// Leaves the room. Idempotent.
    pub fn leave(&self) {
        self.handle.leave();
    }

    /// Receives the next presence event. Returns `None` once the room is
    /// gone and no further events can arrive.
    pub async fn recv(&mut self) -> Option<PresenceEvent> {
        loop {
            match self.events.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Snapshots are absolute; only the latest matters.
                    debug!(skipped, "presence receiver lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for PresenceSubscription {
    fn drop(&mut self) {
        self.handle.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehub_core::types::id::UserId;

    fn identity(name: &str) -> CollaboratorIdentity {
        CollaboratorIdentity {
            user_id: UserId::new(),
            display_name: name.to_string(),
            avatar_url: None,
        }
    }

    fn registry() -> Arc<PresenceRegistry> {
        Arc::new(PresenceRegistry::new(16))
    }

    #[tokio::test]
    async fn test_track_broadcasts_full_snapshot() {
        let registry = registry();
        let doc = Uuid::new_v4();
        let mut alice = registry.subscribe(doc);
        let bob = registry.subscribe(doc);

        alice.track(identity("alice"));
        bob.track(identity("bob"));

        // Alice sees her own join first, then the two-member snapshot.
        let PresenceEvent::Sync { members } = alice.recv().await.expect("first sync");
        assert_eq!(members.len(), 1);
        let PresenceEvent::Sync { members } = alice.recv().await.expect("second sync");
        assert_eq!(members.len(), 2);
    }

    #[tokio::test]
    async fn test_leave_resyncs_and_releases_empty_rooms() {
        let registry = registry();
        let doc = Uuid::new_v4();
        let mut alice = registry.subscribe(doc);
        let bob = registry.subscribe(doc);

        alice.track(identity("alice"));
        bob.track(identity("bob"));
        bob.leave();
        bob.leave();

        // Skip the two join snapshots, then observe the departure.
        alice.recv().await.expect("join sync");
        alice.recv().await.expect("join sync");
        let PresenceEvent::Sync { members } = alice.recv().await.expect("leave sync");
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].display_name, "alice");

        alice.leave();
        assert!(registry.members(doc).is_empty());
    }

    #[tokio::test]
    async fn test_dropping_subscription_leaves_the_room() {
        let registry = registry();
        let doc = Uuid::new_v4();
        let alice = registry.subscribe(doc);
        alice.track(identity("alice"));
        assert_eq!(registry.members(doc).len(), 1);

        drop(alice);
        assert!(registry.members(doc).is_empty());
    }

    #[tokio::test]
    async fn test_untracked_subscriber_is_invisible() {
        let registry = registry();
        let doc = Uuid::new_v4();
        let _lurker = registry.subscribe(doc);
        let watcher = registry.subscribe(doc);

        watcher.track(identity("watcher"));
        assert_eq!(registry.members(doc).len(), 1);
    }
}
