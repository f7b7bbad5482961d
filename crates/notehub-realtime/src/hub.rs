//! In-process relay hub.

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use notehub_core::config::realtime::RealtimeConfig;

use crate::message::{ClientMessage, ConnectionId, ServerMessage};
use crate::room::registry::RoomRegistry;

/// The relay standing in for the socket server: accepts client messages,
/// resolves the target room, and fans each event out to every room member
/// **except the sender** — the origin never hears its own event back.
///
/// Per-connection channels preserve send order (FIFO per connection);
/// nothing orders events across connections.
#[derive(Debug)]
pub struct RelayHub {
    rooms: RoomRegistry,
    /// Connection id → outbound event channel.
    connections: DashMap<ConnectionId, broadcast::Sender<ServerMessage>>,
    buffer_size: usize,
}

impl RelayHub {
    /// Creates a hub.
    pub fn new(config: &RealtimeConfig) -> Self {
        Self {
            rooms: RoomRegistry::new(),
            connections: DashMap::new(),
            buffer_size: config.channel_buffer_size,
        }
    }

    /// Registers a new connection and returns its id plus the sender its
    /// event receivers hang off.
    pub(crate) fn register(&self) -> (ConnectionId, broadcast::Sender<ServerMessage>) {
        let conn_id = ConnectionId::new_v4();
        let (tx, _) = broadcast::channel(self.buffer_size);
        self.connections.insert(conn_id, tx.clone());
        debug!(%conn_id, "realtime connection registered");
        (conn_id, tx)
    }

    /// Drops a connection: leaves every joined room and forgets the
    /// outbound channel. Safe to call for an unknown connection.
    pub(crate) fn disconnect(&self, conn_id: ConnectionId) {
        self.rooms.leave_all(conn_id);
        self.connections.remove(&conn_id);
        debug!(%conn_id, "realtime connection closed");
    }

    /// Handles one inbound client message.
    pub(crate) fn handle(&self, from: ConnectionId, msg: ClientMessage) {
        match msg {
            ClientMessage::CreateRoom { document_id } => {
                self.rooms.join(document_id, from);
            }
            ClientMessage::SendChanges { document_id, delta } => {
                self.relay(from, ServerMessage::ReceiveChanges { document_id, delta });
            }
            ClientMessage::SendCursorMove {
                document_id,
                user_key,
                range,
            } => {
                self.relay(
                    from,
                    ServerMessage::ReceiveCursorMove {
                        document_id,
                        user_key,
                        range,
                    },
                );
            }
        }
    }

    /// Removes a connection from one room.
    pub(crate) fn leave_room(&self, conn_id: ConnectionId, document_id: Uuid) {
        self.rooms.leave(document_id, conn_id);
    }

    fn relay(&self, from: ConnectionId, msg: ServerMessage) {
        for member in self.rooms.members(msg.document_id()) {
            if member == from {
                continue;
            }
            if let Some(tx) = self.connections.get(&member) {
                // A lagged or dropped receiver is the receiver's problem;
                // delivery is fire-and-forget.
                let _ = tx.send(msg.clone());
            }
        }
    }

    /// Member count of a document's room.
    pub fn room_member_count(&self, document_id: Uuid) -> usize {
        self.rooms.member_count(document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehub_delta::{Delta, DeltaOp};
    use uuid::Uuid;

    fn hub() -> RelayHub {
        RelayHub::new(&RealtimeConfig::default())
    }

    #[test]
    fn test_relay_skips_the_sender() {
        let hub = hub();
        let doc = Uuid::new_v4();
        let (a, a_tx) = hub.register();
        let (b, b_tx) = hub.register();
        let mut a_rx = a_tx.subscribe();
        let mut b_rx = b_tx.subscribe();

        hub.handle(a, ClientMessage::CreateRoom { document_id: doc });
        hub.handle(b, ClientMessage::CreateRoom { document_id: doc });
        hub.handle(
            a,
            ClientMessage::SendChanges {
                document_id: doc,
                delta: Delta::from_ops([DeltaOp::insert("hi")]),
            },
        );

        let received = b_rx.try_recv().expect("peer receives the delta");
        assert_eq!(received.document_id(), doc);
        assert!(a_rx.try_recv().is_err(), "sender must not hear its own event");
    }

    #[test]
    fn test_relay_is_room_scoped() {
        let hub = hub();
        let doc = Uuid::new_v4();
        let other_doc = Uuid::new_v4();
        let (a, _) = hub.register();
        let (b, b_tx) = hub.register();
        let mut b_rx = b_tx.subscribe();

        hub.handle(a, ClientMessage::CreateRoom { document_id: doc });
        hub.handle(
            b,
            ClientMessage::CreateRoom {
                document_id: other_doc,
            },
        );
        hub.handle(
            a,
            ClientMessage::SendChanges {
                document_id: doc,
                delta: Delta::from_ops([DeltaOp::insert("hi")]),
            },
        );

        assert!(b_rx.try_recv().is_err(), "foreign-room member hears nothing");
    }

    #[test]
    fn test_disconnect_leaves_rooms() {
        let hub = hub();
        let doc = Uuid::new_v4();
        let (a, _) = hub.register();
        hub.handle(a, ClientMessage::CreateRoom { document_id: doc });
        assert_eq!(hub.room_member_count(doc), 1);

        hub.disconnect(a);
        assert_eq!(hub.room_member_count(doc), 0);
    }
}
