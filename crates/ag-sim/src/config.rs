//! Workload shape, deserialized from the `simulation` config section.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub members: usize,
    pub communities: usize,
    pub threads: usize,
    /// Length of the activity phase, after warm-up
    pub duration_secs: u64,
    /// One activity per tick
    pub tick_interval_ms: u64,
    pub member_pacing_ms: u64,
    pub community_pacing_ms: u64,
    pub thread_pacing_ms: u64,
    /// Share of activity ticks spent on private messages (0.0-1.0)
    pub message_ratio: f64,
    /// Fixed seed for reproducible target selection. Random when omitted.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            members: 10,
            communities: 5,
            threads: 6,
            duration_secs: 60,
            tick_interval_ms: 1000,
            member_pacing_ms: 10,
            community_pacing_ms: 10,
            thread_pacing_ms: 20,
            message_ratio: 0.0,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// No pacing and a fast tick; for tests and benchmarks.
    pub fn unpaced() -> Self {
        Self {
            tick_interval_ms: 1,
            member_pacing_ms: 0,
            community_pacing_ms: 0,
            thread_pacing_ms: 0,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn member_pacing(&self) -> Duration {
        Duration::from_millis(self.member_pacing_ms)
    }

    pub fn community_pacing(&self) -> Duration {
        Duration::from_millis(self.community_pacing_ms)
    }

    pub fn thread_pacing(&self) -> Duration {
        Duration::from_millis(self.thread_pacing_ms)
    }
}
