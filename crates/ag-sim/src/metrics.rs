//! Counters collected while the simulator runs.

use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SimulationMetrics {
    pub started_at: Instant,
    pub members_created: u64,
    pub communities_created: u64,
    pub threads_created: u64,
    pub replies_submitted: u64,
    pub votes_cast: u64,
    pub messages_sent: u64,
    /// Commands the engine refused
    pub rejected: u64,
}

impl SimulationMetrics {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            members_created: 0,
            communities_created: 0,
            threads_created: 0,
            replies_submitted: 0,
            votes_cast: 0,
            messages_sent: 0,
            rejected: 0,
        }
    }

    pub fn report(&self) -> SimulationReport {
        let elapsed = self.started_at.elapsed();
        let operations = self.replies_submitted + self.votes_cast + self.threads_created;
        let secs = elapsed.as_secs_f64();
        SimulationReport {
            elapsed,
            members_created: self.members_created,
            communities_created: self.communities_created,
            threads_created: self.threads_created,
            replies_submitted: self.replies_submitted,
            votes_cast: self.votes_cast,
            messages_sent: self.messages_sent,
            rejected: self.rejected,
            throughput: if secs > 0.0 { operations as f64 / secs } else { 0.0 },
        }
    }
}

impl Default for SimulationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Final simulation report.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub elapsed: Duration,
    pub members_created: u64,
    pub communities_created: u64,
    pub threads_created: u64,
    pub replies_submitted: u64,
    pub votes_cast: u64,
    pub messages_sent: u64,
    pub rejected: u64,
    /// (replies + votes + threads) per second of wall-clock time
    pub throughput: f64,
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Metrics:")?;
        writeln!(f, "  Elapsed Time:        {:.2?}", self.elapsed)?;
        writeln!(f, "  Members Created:     {}", self.members_created)?;
        writeln!(f, "  Communities Created: {}", self.communities_created)?;
        writeln!(f, "  Threads Created:     {}", self.threads_created)?;
        writeln!(f, "  Replies Submitted:   {}", self.replies_submitted)?;
        writeln!(f, "  Votes Cast:          {}", self.votes_cast)?;
        writeln!(f, "  Messages Sent:       {}", self.messages_sent)?;
        writeln!(f, "  Rejected Commands:   {}", self.rejected)?;
        write!(f, "  Throughput:          {:.2} ops/sec", self.throughput)
    }
}
