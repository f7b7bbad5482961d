//! # notehub-state
//!
//! The single process-wide normalized tree of workspace → folder → file,
//! mutated only through a fixed set of typed actions. Every dispatch runs
//! a pure reducer and swaps in a new immutable snapshot of the whole tree;
//! nothing mutates state in place.
//!
//! The store instance is dependency-injected into whatever needs it —
//! there is no ambient global.

pub mod actions;
pub mod change_feed;
pub mod reducer;
pub mod store;
pub mod tree;

pub use actions::Action;
pub use change_feed::apply_change;
pub use reducer::reduce;
pub use store::StateStore;
pub use tree::{AppState, FolderNode, WorkspaceNode};
