//! Document synchronization configuration.

use serde::{Deserialize, Serialize};

/// Sync coordinator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Debounce delay before a local edit burst is persisted, in
    /// milliseconds. Reset on every keystroke; only the final edit of a
    /// burst triggers a persist.
    #[serde(default = "default_save_debounce")]
    pub save_debounce_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            save_debounce_ms: default_save_debounce(),
        }
    }
}

fn default_save_debounce() -> u64 {
    850
}
