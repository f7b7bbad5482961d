//! The dispatching store around the reducer.

use std::sync::{Arc, RwLock};

use tokio::sync::watch;
use tracing::trace;

use crate::actions::Action;
use crate::reducer::reduce;
use crate::tree::AppState;

/// Owns the current state snapshot and funnels every mutation through the
/// reducer.
///
/// Dispatch is synchronous and single-writer-at-a-time by construction
/// (one write lock around the reduce-and-swap), so the tree needs no
/// further coordination inside a client process. Readers hold cheap
/// `Arc` snapshots that stay valid across later dispatches.
#[derive(Debug)]
pub struct StateStore {
    state: RwLock<Arc<AppState>>,
    tx: watch::Sender<Arc<AppState>>,
}

impl StateStore {
    /// A store holding the empty initial state.
    pub fn new() -> Self {
        let initial = Arc::new(AppState::new());
        let (tx, _) = watch::channel(initial.clone());
        Self {
            state: RwLock::new(initial),
            tx,
        }
    }

    /// Run one action through the reducer and publish the new snapshot.
    /// Returns the snapshot the action produced.
    pub fn dispatch(&self, action: Action) -> Arc<AppState> {
        let mut guard = self.state.write().expect("state lock poisoned");
        trace!(?action, "dispatch");
        let next = Arc::new(reduce(&guard, action));
        *guard = next.clone();
        let _ = self.tx.send(next.clone());
        next
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<AppState> {
        self.state.read().expect("state lock poisoned").clone()
    }

    /// Watch for new snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.tx.subscribe()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
