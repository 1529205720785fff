//! # Community Simulator
//!
//! Issues a scripted warm-up (members, communities, threads) followed by a
//! randomized activity loop against any [`CommunityService`].
//!
//! The simulator keeps its own shadow list of the ids the engine handed
//! back. It only uses that list to pick targets for later commands; it never
//! reads the engine's store directly.

use crate::config::SimulationConfig;
use crate::metrics::{SimulationMetrics, SimulationReport};
use ag_core::{
    AppError, CastVote, CommunityService, CreateCommunity, CreateReply, CreateThread, MemberId,
    RegisterMember, SendMessage, ThreadId,
};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Zipf-like index into a list of `size` items, from a uniform `x` in `[0, 1)`.
///
/// `floor((size + 1)^x) - 1` is heavily biased toward low indices while still
/// reaching every index in `0..size`. The plain `floor(size^x)` never yields
/// 0 and, for `size == 1`, returns 1, past the end of the list.
pub fn zipf_index(size: usize, x: f64) -> usize {
    if size == 0 {
        return 0;
    }
    let raw = ((size + 1) as f64).powf(x).floor() as usize;
    raw.saturating_sub(1).min(size - 1)
}

pub struct Simulator {
    service: Arc<dyn CommunityService>,
    config: SimulationConfig,
    rng: StdRng,
    members: Vec<MemberId>,
    communities: Vec<String>,
    threads: Vec<ThreadId>,
    metrics: SimulationMetrics,
}

impl Simulator {
    pub fn new(service: Arc<dyn CommunityService>, config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            service,
            config,
            rng,
            members: Vec::new(),
            communities: Vec::new(),
            threads: Vec::new(),
            metrics: SimulationMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &SimulationMetrics {
        &self.metrics
    }

    pub fn report(&self) -> SimulationReport {
        self.metrics.report()
    }

    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    pub fn communities(&self) -> &[String] {
        &self.communities
    }

    pub fn threads(&self) -> &[ThreadId] {
        &self.threads
    }

    fn reject(&mut self, command: &'static str, err: AppError) {
        self.metrics.rejected += 1;
        debug!(command, error = %err, "engine rejected simulated command");
    }

    pub async fn create_members(&mut self, count: usize) {
        info!(count, "creating members");
        for i in 0..count {
            let cmd = RegisterMember::new(format!("member_{i}"), format!("password_{i}"));
            match self.service.register_member(cmd).await {
                Ok(id) => {
                    self.members.push(id);
                    self.metrics.members_created += 1;
                }
                Err(err) => self.reject("register_member", err),
            }
            pace(self.config.member_pacing()).await;
        }
        info!(total = self.members.len(), "members created");
    }

    pub async fn create_communities(&mut self, count: usize) {
        info!(count, "creating communities");
        for i in 0..count {
            let cmd = CreateCommunity {
                name: format!("community_{i}"),
                description: format!("Description for community {i}"),
                founder_id: self.members.choose(&mut self.rng).copied(),
            };
            match self.service.create_community(cmd).await {
                Ok(name) => {
                    self.communities.push(name);
                    self.metrics.communities_created += 1;
                }
                Err(err) => self.reject("create_community", err),
            }
            pace(self.config.community_pacing()).await;
        }
        info!(total = self.communities.len(), "communities created");
    }

    pub async fn create_threads(&mut self, count: usize) {
        if self.communities.is_empty() || self.members.is_empty() {
            warn!(
                communities = self.communities.len(),
                members = self.members.len(),
                "no communities or members available, skipping thread creation"
            );
            return;
        }

        info!(count, "creating threads");
        for i in 0..count {
            let x: f64 = self.rng.random();
            let community = self.communities[zipf_index(self.communities.len(), x)].clone();
            let creator = self.members[self.rng.random_range(0..self.members.len())];

            let cmd = CreateThread {
                title: format!("Thread Title {i}"),
                content: format!("Thread Content {i}"),
                creator_id: creator,
                community_id: community,
            };
            match self.service.create_thread(cmd).await {
                Ok(id) => {
                    self.threads.push(id);
                    self.metrics.threads_created += 1;
                }
                Err(err) => self.reject("create_thread", err),
            }
            pace(self.config.thread_pacing()).await;
        }
        info!(total = self.threads.len(), "threads created");
    }

    /// One random activity: a private message (with `message_ratio`), else a
    /// reply or a vote on a random thread with equal odds.
    pub async fn simulate_activity(&mut self) {
        let Some(&member) = self.members.choose(&mut self.rng) else {
            debug!("no members yet, skipping activity");
            return;
        };

        let message_ratio = self.config.message_ratio.clamp(0.0, 1.0);
        if message_ratio > 0.0 && self.rng.random_bool(message_ratio) {
            let Some(&receiver) = self.members.choose(&mut self.rng) else {
                return;
            };
            let cmd = SendMessage {
                sender_id: member,
                receiver_id: receiver,
                content: format!("Message from {member} to {receiver}"),
            };
            match self.service.send_message(cmd).await {
                Ok(_) => self.metrics.messages_sent += 1,
                Err(err) => self.reject("send_message", err),
            }
            return;
        }

        let Some(&thread) = self.threads.choose(&mut self.rng) else {
            debug!("no threads yet, skipping activity");
            return;
        };

        if self.rng.random_bool(0.5) {
            let cmd = CreateReply {
                content: format!("Reply by {member} on {thread}"),
                creator_id: member,
                thread_id: thread,
                parent_id: None,
            };
            match self.service.create_reply(cmd).await {
                Ok(_) => self.metrics.replies_submitted += 1,
                Err(err) => self.reject("create_reply", err),
            }
        } else {
            let cmd = CastVote {
                member_id: member,
                target_id: thread.as_uuid(),
                is_upvote: self.rng.random_bool(0.5),
            };
            match self.service.cast_vote(cmd).await {
                Ok(_) => self.metrics.votes_cast += 1,
                Err(err) => self.reject("cast_vote", err),
            }
        }
    }

    /// Warm-up phase, then one activity per tick until `duration` elapses.
    pub async fn run_simulation(
        &mut self,
        members: usize,
        communities: usize,
        threads: usize,
        duration: Duration,
    ) -> SimulationReport {
        self.create_members(members).await;
        self.create_communities(communities).await;
        self.create_threads(threads).await;

        info!(duration_secs = duration.as_secs_f64(), "starting activity phase");
        let start = Instant::now();
        let mut ticker = tokio::time::interval(self.config.tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if start.elapsed() >= duration {
                break;
            }
            self.simulate_activity().await;
        }

        let report = self.report();
        info!(
            throughput = report.throughput,
            replies = report.replies_submitted,
            votes = report.votes_cast,
            rejected = report.rejected,
            "simulation completed"
        );
        report
    }
}

async fn pace(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
