//! # Community Engine
//!
//! A single tokio task owns the [`EntityStore`] and applies commands from a
//! bounded queue one at a time. Callers hold an [`EngineHandle`]; every
//! request carries a oneshot sender for its typed result.

use crate::config::EngineConfig;
use crate::store::EntityStore;
use ag_core::{
    AppError, CastVote, Community, CommunityService, CreateCommunity, CreateReply, CreateThread,
    FetchFeed, JoinCommunity, MemberId, MemberProfile, MessageId, PrivateMessage, RegisterMember,
    ReplyId, Result, SendMessage, StoreStats, Thread, ThreadId, VoteTally,
};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type Responder<T> = oneshot::Sender<Result<T>>;

/// Messages accepted by the engine task.
#[derive(Debug)]
enum EngineCommand {
    RegisterMember {
        cmd: RegisterMember,
        response_tx: Responder<MemberId>,
    },
    CreateCommunity {
        cmd: CreateCommunity,
        response_tx: Responder<String>,
    },
    JoinCommunity {
        cmd: JoinCommunity,
        response_tx: Responder<()>,
    },
    CreateThread {
        cmd: CreateThread,
        response_tx: Responder<ThreadId>,
    },
    CreateReply {
        cmd: CreateReply,
        response_tx: Responder<ReplyId>,
    },
    CastVote {
        cmd: CastVote,
        response_tx: Responder<VoteTally>,
    },
    SendMessage {
        cmd: SendMessage,
        response_tx: Responder<MessageId>,
    },
    FetchFeed {
        cmd: FetchFeed,
        response_tx: Responder<Vec<Thread>>,
    },
    GetMember {
        id: MemberId,
        response_tx: Responder<MemberProfile>,
    },
    GetCommunity {
        name: String,
        response_tx: Responder<Community>,
    },
    GetThread {
        id: ThreadId,
        response_tx: Responder<Thread>,
    },
    GetInbox {
        member_id: MemberId,
        response_tx: Responder<Vec<PrivateMessage>>,
    },
    Stats {
        response_tx: Responder<StoreStats>,
    },
    /// Stop accepting commands; everything already queued is still applied.
    Shutdown,
}

pub struct CommunityEngine {
    store: EntityStore,
    inbound: mpsc::Receiver<EngineCommand>,
}

impl CommunityEngine {
    fn new(config: &EngineConfig) -> (Self, EngineHandle) {
        let (tx, inbound) = mpsc::channel(config.queue_capacity.max(1));
        let engine = Self {
            store: EntityStore::new(config.orphan_threads),
            inbound,
        };
        (engine, EngineHandle { tx })
    }

    /// Starts the engine task. The join handle yields the final store once
    /// the engine has shut down and drained its queue.
    pub fn spawn(config: &EngineConfig) -> (EngineHandle, JoinHandle<EntityStore>) {
        let (engine, handle) = Self::new(config);
        (handle, tokio::spawn(engine.run()))
    }

    async fn run(mut self) -> EntityStore {
        info!("community engine started");
        let mut processed: u64 = 0;
        while let Some(command) = self.inbound.recv().await {
            if let EngineCommand::Shutdown = command {
                debug!("shutdown requested, draining queued commands");
                self.inbound.close();
                continue;
            }
            self.apply(command);
            processed += 1;
        }
        info!(processed, "community engine stopped");
        self.store
    }

    fn apply(&mut self, command: EngineCommand) {
        let store = &mut self.store;
        match command {
            EngineCommand::RegisterMember { cmd, response_tx } => {
                respond(response_tx, "register_member", Ok(store.register_member(cmd)))
            }
            EngineCommand::CreateCommunity { cmd, response_tx } => {
                respond(response_tx, "create_community", store.create_community(cmd))
            }
            EngineCommand::JoinCommunity { cmd, response_tx } => {
                respond(response_tx, "join_community", store.join_community(cmd))
            }
            EngineCommand::CreateThread { cmd, response_tx } => {
                respond(response_tx, "create_thread", store.create_thread(cmd))
            }
            EngineCommand::CreateReply { cmd, response_tx } => {
                respond(response_tx, "create_reply", store.create_reply(cmd))
            }
            EngineCommand::CastVote { cmd, response_tx } => {
                respond(response_tx, "cast_vote", store.cast_vote(cmd))
            }
            EngineCommand::SendMessage { cmd, response_tx } => {
                respond(response_tx, "send_message", store.send_message(cmd))
            }
            EngineCommand::FetchFeed { cmd, response_tx } => {
                respond(response_tx, "fetch_feed", store.feed(cmd.member_id))
            }
            EngineCommand::GetMember { id, response_tx } => {
                let _ = response_tx.send(store.member(id));
            }
            EngineCommand::GetCommunity { name, response_tx } => {
                let _ = response_tx.send(store.community(&name));
            }
            EngineCommand::GetThread { id, response_tx } => {
                let _ = response_tx.send(store.thread(id));
            }
            EngineCommand::GetInbox {
                member_id,
                response_tx,
            } => {
                let _ = response_tx.send(store.inbox(member_id));
            }
            EngineCommand::Stats { response_tx } => {
                let _ = response_tx.send(Ok(store.stats()));
            }
            EngineCommand::Shutdown => {}
        }
    }
}

fn respond<T>(response_tx: Responder<T>, command: &'static str, result: Result<T>) {
    if let Err(err) = &result {
        warn!(command, error = %err, "command rejected");
    }
    // The caller may have stopped waiting; the mutation stands regardless.
    let _ = response_tx.send(result);
}

/// Cloneable submission side of the engine queue.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    async fn request<T>(&self, build: impl FnOnce(Responder<T>) -> EngineCommand) -> Result<T> {
        let (response_tx, response_rx) = oneshot::channel();
        self.tx
            .send(build(response_tx))
            .await
            .map_err(|_| AppError::EngineStopped)?;
        response_rx.await.map_err(|_| AppError::EngineStopped)?
    }

    /// Asks the engine to stop. Commands queued before this call are applied;
    /// later submissions fail with [`AppError::EngineStopped`].
    pub async fn shutdown(&self) {
        if self.tx.send(EngineCommand::Shutdown).await.is_err() {
            debug!("engine already stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }
}

#[async_trait]
impl CommunityService for EngineHandle {
    async fn register_member(&self, cmd: RegisterMember) -> Result<MemberId> {
        self.request(|response_tx| EngineCommand::RegisterMember { cmd, response_tx })
            .await
    }

    async fn create_community(&self, cmd: CreateCommunity) -> Result<String> {
        self.request(|response_tx| EngineCommand::CreateCommunity { cmd, response_tx })
            .await
    }

    async fn join_community(&self, cmd: JoinCommunity) -> Result<()> {
        self.request(|response_tx| EngineCommand::JoinCommunity { cmd, response_tx })
            .await
    }

    async fn create_thread(&self, cmd: CreateThread) -> Result<ThreadId> {
        self.request(|response_tx| EngineCommand::CreateThread { cmd, response_tx })
            .await
    }

    async fn create_reply(&self, cmd: CreateReply) -> Result<ReplyId> {
        self.request(|response_tx| EngineCommand::CreateReply { cmd, response_tx })
            .await
    }

    async fn cast_vote(&self, cmd: CastVote) -> Result<VoteTally> {
        self.request(|response_tx| EngineCommand::CastVote { cmd, response_tx })
            .await
    }

    async fn send_message(&self, cmd: SendMessage) -> Result<MessageId> {
        self.request(|response_tx| EngineCommand::SendMessage { cmd, response_tx })
            .await
    }

    async fn fetch_feed(&self, cmd: FetchFeed) -> Result<Vec<Thread>> {
        self.request(|response_tx| EngineCommand::FetchFeed { cmd, response_tx })
            .await
    }

    async fn member(&self, id: MemberId) -> Result<MemberProfile> {
        self.request(|response_tx| EngineCommand::GetMember { id, response_tx })
            .await
    }

    async fn community(&self, name: String) -> Result<Community> {
        self.request(|response_tx| EngineCommand::GetCommunity { name, response_tx })
            .await
    }

    async fn thread(&self, id: ThreadId) -> Result<Thread> {
        self.request(|response_tx| EngineCommand::GetThread { id, response_tx })
            .await
    }

    async fn inbox(&self, member_id: MemberId) -> Result<Vec<PrivateMessage>> {
        self.request(|response_tx| EngineCommand::GetInbox {
            member_id,
            response_tx,
        })
        .await
    }

    async fn stats(&self) -> Result<StoreStats> {
        self.request(|response_tx| EngineCommand::Stats { response_tx })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrphanThreadPolicy;

    async fn seeded(handle: &EngineHandle) -> MemberId {
        let alice = handle
            .register_member(RegisterMember::new("alice", "pw"))
            .await
            .unwrap();
        handle
            .create_community(CreateCommunity {
                name: "books".to_string(),
                description: "Books".to_string(),
                founder_id: Some(alice),
            })
            .await
            .unwrap();
        alice
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_thread_creation_loses_no_updates() {
        let (handle, _task) = CommunityEngine::spawn(&EngineConfig {
            queue_capacity: 8,
            ..EngineConfig::default()
        });
        let alice = seeded(&handle).await;

        let tasks: Vec<_> = (0..64)
            .map(|i| {
                let handle = handle.clone();
                tokio::spawn(async move {
                    handle
                        .create_thread(CreateThread {
                            title: format!("Thread {i}"),
                            content: String::new(),
                            creator_id: alice,
                            community_id: "books".to_string(),
                        })
                        .await
                })
            })
            .collect();

        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap().unwrap());
        }
        ids.sort();
        ids.dedup();

        let books = handle.community("books".to_string()).await.unwrap();
        assert_eq!(books.threads.len(), 64);
        assert_eq!(ids.len(), 64);
    }

    #[tokio::test]
    async fn rejected_commands_are_reported_to_the_caller() {
        let (handle, _task) = CommunityEngine::spawn(&EngineConfig::default());
        let alice = seeded(&handle).await;

        let err = handle
            .create_reply(CreateReply {
                content: "lost".to_string(),
                creator_id: alice,
                thread_id: ThreadId::generate(),
                parent_id: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound("thread", _)));
        assert_eq!(handle.stats().await.unwrap().replies, 0);
    }

    #[tokio::test]
    async fn detach_policy_applies_through_the_queue() {
        let (handle, _task) = CommunityEngine::spawn(&EngineConfig {
            orphan_threads: OrphanThreadPolicy::Detach,
            ..EngineConfig::default()
        });
        let alice = seeded(&handle).await;

        let id = handle
            .create_thread(CreateThread {
                title: "lost".to_string(),
                content: String::new(),
                creator_id: alice,
                community_id: "nonexistent".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(handle.thread(id).await.unwrap().community_id, "nonexistent");
        assert!(handle
            .community("books".to_string())
            .await
            .unwrap()
            .threads
            .is_empty());
    }

    #[tokio::test]
    async fn shutdown_drains_queued_commands_then_refuses_new_ones() {
        let (engine, handle) = CommunityEngine::new(&EngineConfig::default());

        let mut pending = Vec::new();
        for i in 0..5 {
            let (response_tx, response_rx) = oneshot::channel();
            handle
                .tx
                .try_send(EngineCommand::RegisterMember {
                    cmd: RegisterMember::new(format!("member_{i}"), "pw"),
                    response_tx,
                })
                .unwrap();
            pending.push(response_rx);
        }
        handle.shutdown().await;

        let store = engine.run().await;

        for response_rx in pending {
            assert!(response_rx.await.unwrap().is_ok());
        }
        assert_eq!(store.stats().members, 5);
        assert!(!handle.is_running());
        let err = handle
            .register_member(RegisterMember::new("late", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err, AppError::EngineStopped);
    }

    #[tokio::test]
    async fn engine_stops_when_every_handle_is_dropped() {
        let (handle, task) = CommunityEngine::spawn(&EngineConfig::default());
        seeded(&handle).await;
        drop(handle);

        let store = task.await.unwrap();
        assert_eq!(store.stats().communities, 1);
    }
}
