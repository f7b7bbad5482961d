//! # notehub-sync
//!
//! The orchestration layer binding the editor buffer, the realtime
//! transport, the presence channel, the shared state store, and the
//! record-access layer into one per-document synchronization pipeline:
//!
//! - local edits broadcast to room peers immediately, persist debounced;
//! - inbound peer deltas apply to the buffer without echoing back out;
//! - presence snapshots become labeled, colored collaborator cursors;
//! - missing documents redirect to the nearest valid ancestor context;
//! - closing a document tears every subscription and timer down exactly
//!   once.

pub mod collaborators;
pub mod coordinator;
pub mod save_state;
pub mod session;

pub use collaborators::CollaboratorTracker;
pub use coordinator::{DocumentContext, OpenOutcome, SyncCoordinator};
pub use save_state::SaveState;
pub use session::DocumentSession;
