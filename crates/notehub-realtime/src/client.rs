//! Client-side connection handles.

use std::sync::{Arc, OnceLock};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::hub::RelayHub;
use crate::message::{ClientMessage, ConnectionId, ServerMessage};

/// Client-process entry point to the realtime transport.
///
/// Holds at most one underlying connection: `connect` lazily creates it
/// and every later call, from any document room in the process, reuses
/// the same handle.
#[derive(Debug)]
pub struct RealtimeClient {
    hub: Arc<RelayHub>,
    connection: OnceLock<Arc<RealtimeConnection>>,
}

impl RealtimeClient {
    /// Creates a client bound to a relay hub.
    pub fn new(hub: Arc<RelayHub>) -> Self {
        Self {
            hub,
            connection: OnceLock::new(),
        }
    }

    /// Returns the process-wide shared connection, creating it on first
    /// use.
    pub fn connect(&self) -> Arc<RealtimeConnection> {
        self.connection
            .get_or_init(|| {
                let (id, events_tx) = self.hub.register();
                Arc::new(RealtimeConnection {
                    id,
                    hub: self.hub.clone(),
                    events_tx,
                })
            })
            .clone()
    }
}

/// One live connection to the relay, shared across all open documents.
#[derive(Debug)]
pub struct RealtimeConnection {
    id: ConnectionId,
    hub: Arc<RelayHub>,
    events_tx: broadcast::Sender<ServerMessage>,
}

impl RealtimeConnection {
    /// This connection's id.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Announces intent to receive/send events scoped to a document.
    /// Idempotent.
    pub fn join_room(&self, document_id: Uuid) {
        self.hub
            .handle(self.id, ClientMessage::CreateRoom { document_id });
    }

    /// Leaves a document's room. Idempotent; safe to call for rooms the
    /// connection never joined.
    pub fn leave_room(&self, document_id: Uuid) {
        self.hub.leave_room(self.id, document_id);
    }

    /// Sends a message to the relay. Fire-and-forget: no acknowledgment,
    /// no ordering guarantee beyond FIFO on this connection.
    pub fn emit(&self, msg: ClientMessage) {
        self.hub.handle(self.id, msg);
    }

    /// Subscribes to server-relayed events. Each subscriber receives
    /// every event once and filters on the document id it cares about.
    /// Dropping the receiver unsubscribes; doing so repeatedly is safe.
    pub fn events(&self) -> broadcast::Receiver<ServerMessage> {
        self.events_tx.subscribe()
    }
}

impl Drop for RealtimeConnection {
    fn drop(&mut self) {
        self.hub.disconnect(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehub_core::config::realtime::RealtimeConfig;
    use notehub_delta::{Delta, DeltaOp};

    #[test]
    fn test_connect_reuses_one_connection() {
        let hub = Arc::new(RelayHub::new(&RealtimeConfig::default()));
        let client = RealtimeClient::new(hub);

        let first = client.connect();
        let second = client.connect();
        assert_eq!(first.id(), second.id());
    }

    #[test]
    fn test_two_clients_exchange_changes() {
        let hub = Arc::new(RelayHub::new(&RealtimeConfig::default()));
        let doc = Uuid::new_v4();

        let a = RealtimeClient::new(hub.clone()).connect();
        let b = RealtimeClient::new(hub.clone()).connect();
        a.join_room(doc);
        b.join_room(doc);
        let mut b_events = b.events();

        a.emit(ClientMessage::SendChanges {
            document_id: doc,
            delta: Delta::from_ops([DeltaOp::insert("hi")]),
        });

        match b_events.try_recv().expect("relayed event") {
            ServerMessage::ReceiveChanges { document_id, delta } => {
                assert_eq!(document_id, doc);
                assert_eq!(delta.plain_text(), "hi");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_leave_room_twice_is_safe() {
        let hub = Arc::new(RelayHub::new(&RealtimeConfig::default()));
        let doc = Uuid::new_v4();
        let conn = RealtimeClient::new(hub.clone()).connect();

        conn.join_room(doc);
        conn.leave_room(doc);
        conn.leave_room(doc);
        assert_eq!(hub.room_member_count(doc), 0);
    }
}
