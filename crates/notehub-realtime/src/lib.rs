//! # notehub-realtime
//!
//! The bidirectional message channel abstraction used to propagate edits
//! between clients viewing the same document. Provides:
//!
//! - Document rooms keyed by document id, with membership tracking
//! - An in-process relay hub standing in for the socket relay server
//! - Client connection handles (one shared connection per client process)
//! - A separate presence pub/sub channel with full-snapshot sync events
//!
//! Delivery is fire-and-forget: FIFO per connection, no acknowledgments,
//! and no cross-client ordering guarantee.

pub mod client;
pub mod hub;
pub mod message;
pub mod presence;
pub mod room;

pub use client::{RealtimeClient, RealtimeConnection};
pub use hub::RelayHub;
pub use message::{ClientMessage, ServerMessage};
pub use presence::{PresenceEvent, PresenceHandle, PresenceRegistry, PresenceSubscription};
pub use room::registry::RoomRegistry;
