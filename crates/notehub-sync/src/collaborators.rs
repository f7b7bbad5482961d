//! Collaborator tracking: presence snapshots → labeled cursor markers.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use tracing::trace;

use notehub_core::types::id::UserId;
use notehub_delta::Range;
use notehub_editor::CursorModule;
use notehub_entity::CollaboratorIdentity;

/// One tracked peer.
#[derive(Debug, Clone)]
struct Peer {
    identity: CollaboratorIdentity,
    /// Session-persistent cursor color, generated once when the peer
    /// first appears. Not stable across reconnects.
    color: String,
}

/// Tracks who is viewing the open document and mirrors them into cursor
/// markers through the pluggable [`CursorModule`].
///
/// The local user is never a peer: a snapshot containing only self
/// produces no cursors.
pub struct CollaboratorTracker {
    self_id: UserId,
    cursors: Arc<dyn CursorModule>,
    peers: HashMap<String, Peer>,
    members: Vec<CollaboratorIdentity>,
}

impl CollaboratorTracker {
    /// Creates a tracker for the given local user.
    pub fn new(self_id: UserId, cursors: Arc<dyn CursorModule>) -> Self {
        Self {
            self_id,
            cursors,
            peers: HashMap::new(),
            members: Vec::new(),
        }
    }

    /// Fold a full presence snapshot in: create cursors for new peers,
    /// drop cursors of departed ones, keep existing colors stable.
    pub fn sync(&mut self, members: Vec<CollaboratorIdentity>) {
        let present: Vec<String> = members
            .iter()
            .filter(|member| member.user_id != self.self_id)
            .map(|member| member.cursor_key())
            .collect();

        let departed: Vec<String> = self
            .peers
            .keys()
            .filter(|key| !present.contains(key))
            .cloned()
            .collect();
        for key in departed {
            self.peers.remove(&key);
            self.cursors.remove_cursor(&key);
            trace!(%key, "collaborator left, cursor removed");
        }

        for member in members.iter().filter(|m| m.user_id != self.self_id) {
            let key = member.cursor_key();
            if !self.peers.contains_key(&key) {
                let color = random_cursor_color();
                self.cursors.create_cursor(&key, &member.display_name, &color);
                self.peers.insert(
                    key,
                    Peer {
                        identity: member.clone(),
                        color,
                    },
                );
            }
        }

        self.members = members;
    }

    /// Relocate a peer's cursor. Returns `false` and does nothing when
    /// no matching cursor exists yet; callers drop the event silently.
    pub fn move_cursor(&self, user_key: &str, range: Range) -> bool {
        if !self.peers.contains_key(user_key) {
            return false;
        }
        self.cursors.move_cursor(user_key, range)
    }

    /// The last full member snapshot, local user included (the avatar
    /// strip shows everyone).
    pub fn members(&self) -> Vec<CollaboratorIdentity> {
        self.members.clone()
    }

    /// Number of tracked peers (everyone but self).
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// A peer's assigned cursor color, if tracked.
    pub fn peer_color(&self, user_key: &str) -> Option<String> {
        self.peers.get(user_key).map(|peer| peer.color.clone())
    }

    /// A peer's identity, if tracked.
    pub fn peer(&self, user_key: &str) -> Option<CollaboratorIdentity> {
        self.peers.get(user_key).map(|peer| peer.identity.clone())
    }
}

impl std::fmt::Debug for CollaboratorTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollaboratorTracker")
            .field("self_id", &self.self_id)
            .field("peers", &self.peers.len())
            .finish()
    }
}

/// A random `#rrggbb` color.
fn random_cursor_color() -> String {
    format!("#{:06x}", rand::thread_rng().gen_range(0x000000..=0xffffff))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehub_editor::CursorOverlay;

    fn identity(name: &str) -> CollaboratorIdentity {
        CollaboratorIdentity {
            user_id: UserId::new(),
            display_name: name.to_string(),
            avatar_url: None,
        }
    }

    fn tracker() -> (CollaboratorTracker, Arc<CursorOverlay>, CollaboratorIdentity) {
        let overlay = Arc::new(CursorOverlay::new());
        let me = identity("me");
        let tracker = CollaboratorTracker::new(me.user_id, overlay.clone());
        (tracker, overlay, me)
    }

    #[test]
    fn test_self_never_gets_a_cursor() {
        let (mut tracker, overlay, me) = tracker();
        tracker.sync(vec![me]);
        assert_eq!(tracker.peer_count(), 0);
        assert_eq!(overlay.marker_count(), 0);
    }

    #[test]
    fn test_peer_color_is_session_persistent() {
        let (mut tracker, _, me) = tracker();
        let ada = identity("ada");
        let key = ada.cursor_key();

        tracker.sync(vec![me.clone(), ada.clone()]);
        let color = tracker.peer_color(&key).expect("color assigned");
        assert!(color.starts_with('#') && color.len() == 7);

        tracker.sync(vec![me, ada]);
        assert_eq!(tracker.peer_color(&key), Some(color));
    }

    #[test]
    fn test_departed_peer_cursor_is_removed() {
        let (mut tracker, overlay, me) = tracker();
        let ada = identity("ada");
        let key = ada.cursor_key();

        tracker.sync(vec![me.clone(), ada]);
        assert_eq!(overlay.marker_count(), 1);

        tracker.sync(vec![me]);
        assert_eq!(overlay.marker_count(), 0);
        assert!(tracker.peer(&key).is_none());
    }

    #[test]
    fn test_move_unknown_cursor_is_dropped() {
        let (tracker, _, _) = tracker();
        assert!(!tracker.move_cursor("ghost", Range::caret(1)));
    }

    #[test]
    fn test_move_known_cursor_relocates_marker() {
        let (mut tracker, overlay, me) = tracker();
        let ada = identity("ada");
        let key = ada.cursor_key();
        tracker.sync(vec![me, ada]);

        assert!(tracker.move_cursor(&key, Range::span(2, 3)));
        assert_eq!(
            overlay.marker(&key).expect("marker").range,
            Some(Range::span(2, 3))
        );
    }
}
