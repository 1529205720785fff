//! Engine tuning knobs, deserialized from the `engine` config section.

use serde::Deserialize;

/// What `CreateThread` does when the named community does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanThreadPolicy {
    /// Reject the command; no thread is stored.
    #[default]
    Reject,
    /// Store the thread in the global map without linking it to any community.
    Detach,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of the inbound command queue. Senders wait when it is full.
    pub queue_capacity: usize,
    pub orphan_threads: OrphanThreadPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            orphan_threads: OrphanThreadPolicy::Reject,
        }
    }
}
