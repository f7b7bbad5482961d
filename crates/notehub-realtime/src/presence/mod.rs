//! Presence pub/sub, keyed by document id.

pub mod channel;

pub use channel::{PresenceEvent, PresenceHandle, PresenceRegistry, PresenceSubscription};
