//! Realtime relay configuration.

use serde::{Deserialize, Serialize};

/// Realtime room/relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Internal buffer size for per-connection event channels.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Internal buffer size for presence event channels.
    #[serde(default = "default_presence_buffer")]
    pub presence_buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            presence_buffer_size: default_presence_buffer(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_presence_buffer() -> usize {
    64
}
