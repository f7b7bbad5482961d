//! Wire message definitions for document rooms.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use notehub_delta::{Delta, Range};

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// Messages sent by a client to the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Join (or re-join) the room for a document. Idempotent.
    CreateRoom {
        /// The document whose room to join.
        document_id: Uuid,
    },
    /// Broadcast a local edit to the document's room.
    SendChanges {
        /// The room's document id.
        document_id: Uuid,
        /// The change delta, exactly as the editor emitted it.
        delta: Delta,
    },
    /// Broadcast a local cursor move to the document's room.
    SendCursorMove {
        /// The room's document id.
        document_id: Uuid,
        /// Stable per-user cursor key.
        user_key: String,
        /// The new selection.
        range: Range,
    },
}

/// Messages relayed by the server to room peers.
///
/// The relay never reflects a message back at its sender; a client only
/// ever receives peers' events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// A peer edited the document.
    ReceiveChanges {
        /// The room's document id.
        document_id: Uuid,
        /// The peer's change delta.
        delta: Delta,
    },
    /// A peer moved their cursor.
    ReceiveCursorMove {
        /// The room's document id.
        document_id: Uuid,
        /// The peer's cursor key.
        user_key: String,
        /// The peer's new selection.
        range: Range,
    },
}

impl ServerMessage {
    /// The room a relayed message belongs to. Handlers filter on this
    /// against the currently open document and discard foreign-room
    /// events.
    pub fn document_id(&self) -> Uuid {
        match self {
            Self::ReceiveChanges { document_id, .. } => *document_id,
            Self::ReceiveCursorMove { document_id, .. } => *document_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notehub_delta::DeltaOp;

    #[test]
    fn test_client_message_wire_tags() {
        let msg = ClientMessage::SendChanges {
            document_id: Uuid::nil(),
            delta: Delta::from_ops([DeltaOp::insert("hi")]),
        };
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["type"], "send-changes");

        let msg = ClientMessage::CreateRoom {
            document_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["type"], "create-room");
    }

    #[test]
    fn test_server_message_wire_tags() {
        let msg = ServerMessage::ReceiveCursorMove {
            document_id: Uuid::nil(),
            user_key: "u1".to_string(),
            range: Range::caret(2),
        };
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["type"], "receive-cursor-move");
    }
}
