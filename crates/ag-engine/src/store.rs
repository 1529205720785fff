//! # Entity Store
//!
//! The in-memory graph of members, communities, threads, reply trees and
//! inboxes. It exposes only command-shaped methods; the engine task owns the
//! single instance and calls them one at a time.

use crate::config::OrphanThreadPolicy;
use ag_core::{
    AppError, CastVote, Community, CreateCommunity, CreateReply, CreateThread, JoinCommunity,
    Member, MemberId, MemberProfile, MessageId, PrivateMessage, RegisterMember, Reply, ReplyId,
    Result, SendMessage, StoreStats, Thread, ThreadId, VoteTally,
};
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

pub struct EntityStore {
    members: HashMap<MemberId, Member>,
    communities: HashMap<String, Community>,
    threads: HashMap<ThreadId, Thread>,
    /// Which thread's tree holds each reply
    reply_threads: HashMap<ReplyId, ThreadId>,
    inboxes: HashMap<MemberId, Vec<PrivateMessage>>,
    orphan_threads: OrphanThreadPolicy,
}

impl EntityStore {
    pub fn new(orphan_threads: OrphanThreadPolicy) -> Self {
        Self {
            members: HashMap::new(),
            communities: HashMap::new(),
            threads: HashMap::new(),
            reply_threads: HashMap::new(),
            inboxes: HashMap::new(),
            orphan_threads,
        }
    }

    fn require_member(&self, id: MemberId) -> Result<()> {
        if self.members.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::not_found("member", id))
        }
    }

    // ── Commands ────────────────────────────────────────────────────────────

    pub fn register_member(&mut self, cmd: RegisterMember) -> MemberId {
        let id = MemberId::generate();
        info!(member_id = %id, username = %cmd.username, "member registered");
        self.members.insert(
            id,
            Member {
                id,
                username: cmd.username,
                password: cmd.password,
                karma: 0,
            },
        );
        id
    }

    pub fn create_community(&mut self, cmd: CreateCommunity) -> Result<String> {
        if self.communities.contains_key(&cmd.name) {
            return Err(AppError::Conflict(format!(
                "community {} already exists",
                cmd.name
            )));
        }
        if let Some(founder) = cmd.founder_id {
            self.require_member(founder)?;
        }

        let participants: BTreeSet<MemberId> = cmd.founder_id.into_iter().collect();
        info!(name = %cmd.name, description = %cmd.description, "community created");
        self.communities.insert(
            cmd.name.clone(),
            Community {
                name: cmd.name.clone(),
                description: cmd.description,
                founder_id: cmd.founder_id,
                participants,
                threads: Vec::new(),
                created_at: Utc::now(),
            },
        );
        Ok(cmd.name)
    }

    pub fn join_community(&mut self, cmd: JoinCommunity) -> Result<()> {
        self.require_member(cmd.member_id)?;
        let community = self
            .communities
            .get_mut(&cmd.community_id)
            .ok_or_else(|| AppError::not_found("community", &cmd.community_id))?;
        if community.participants.insert(cmd.member_id) {
            info!(member_id = %cmd.member_id, community = %cmd.community_id, "member joined community");
        }
        Ok(())
    }

    pub fn create_thread(&mut self, cmd: CreateThread) -> Result<ThreadId> {
        self.require_member(cmd.creator_id)?;

        let id = ThreadId::generate();
        match self.communities.get_mut(&cmd.community_id) {
            Some(community) => community.threads.push(id),
            None if self.orphan_threads == OrphanThreadPolicy::Detach => {
                warn!(thread_id = %id, community = %cmd.community_id, "community not found; thread stored unlinked");
            }
            None => return Err(AppError::not_found("community", &cmd.community_id)),
        }

        info!(thread_id = %id, title = %cmd.title, community = %cmd.community_id, creator = %cmd.creator_id, "thread created");
        self.threads.insert(
            id,
            Thread {
                id,
                title: cmd.title,
                content: cmd.content,
                creator_id: cmd.creator_id,
                community_id: cmd.community_id,
                upvotes: 0,
                downvotes: 0,
                replies: Vec::new(),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    pub fn create_reply(&mut self, cmd: CreateReply) -> Result<ReplyId> {
        self.require_member(cmd.creator_id)?;
        let thread = self
            .threads
            .get_mut(&cmd.thread_id)
            .ok_or_else(|| AppError::not_found("thread", cmd.thread_id))?;

        let id = ReplyId::generate();
        let reply = Reply {
            id,
            content: cmd.content,
            creator_id: cmd.creator_id,
            thread_id: cmd.thread_id,
            parent_id: cmd.parent_id,
            upvotes: 0,
            downvotes: 0,
            replies: Vec::new(),
            created_at: Utc::now(),
        };

        match cmd.parent_id {
            None => thread.replies.push(reply),
            Some(parent_id) => {
                // A parent from another thread is as unknown as a missing one.
                if self.reply_threads.get(&parent_id) != Some(&cmd.thread_id) {
                    return Err(AppError::not_found("reply", parent_id));
                }
                thread
                    .find_reply_mut(parent_id)
                    .ok_or_else(|| AppError::not_found("reply", parent_id))?
                    .replies
                    .push(reply);
            }
        }
        self.reply_threads.insert(id, cmd.thread_id);

        info!(reply_id = %id, thread_id = %cmd.thread_id, parent_id = ?cmd.parent_id, creator = %cmd.creator_id, "reply added");
        Ok(id)
    }

    pub fn cast_vote(&mut self, cmd: CastVote) -> Result<VoteTally> {
        self.require_member(cmd.member_id)?;

        let thread_id = ThreadId::from(cmd.target_id);
        let reply_id = ReplyId::from(cmd.target_id);
        let owner = if self.threads.contains_key(&thread_id) {
            thread_id
        } else {
            self.reply_threads
                .get(&reply_id)
                .copied()
                .ok_or_else(|| AppError::not_found("vote target", cmd.target_id))?
        };
        let missing = || AppError::Internal(format!("vote target {} indexed but missing", cmd.target_id));
        let thread = self.threads.get_mut(&owner).ok_or_else(missing)?;
        let (upvotes, downvotes, author) = if owner == thread_id {
            (&mut thread.upvotes, &mut thread.downvotes, thread.creator_id)
        } else {
            let reply = thread.find_reply_mut(reply_id).ok_or_else(missing)?;
            (&mut reply.upvotes, &mut reply.downvotes, reply.creator_id)
        };

        if cmd.is_upvote {
            *upvotes += 1;
        } else {
            *downvotes += 1;
        }
        let tally = VoteTally {
            upvotes: *upvotes,
            downvotes: *downvotes,
        };

        if let Some(author) = self.members.get_mut(&author) {
            author.karma += if cmd.is_upvote { 1 } else { -1 };
        }

        info!(target_id = %cmd.target_id, member_id = %cmd.member_id, upvote = cmd.is_upvote, "vote recorded");
        Ok(tally)
    }

    pub fn send_message(&mut self, cmd: SendMessage) -> Result<MessageId> {
        self.require_member(cmd.sender_id)?;
        self.require_member(cmd.receiver_id)?;

        let id = MessageId::generate();
        info!(message_id = %id, from = %cmd.sender_id, to = %cmd.receiver_id, "message sent");
        self.inboxes
            .entry(cmd.receiver_id)
            .or_default()
            .push(PrivateMessage {
                id,
                sender_id: cmd.sender_id,
                receiver_id: cmd.receiver_id,
                content: cmd.content,
                created_at: Utc::now(),
            });
        Ok(id)
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    pub fn feed(&self, member_id: MemberId) -> Result<Vec<Thread>> {
        self.require_member(member_id)?;
        let mut feed: Vec<Thread> = self
            .communities
            .values()
            .filter(|c| c.participants.contains(&member_id))
            .flat_map(|c| c.threads.iter())
            .filter_map(|id| self.threads.get(id).cloned())
            .collect();
        // v7 ids sort by creation time
        feed.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(feed)
    }

    pub fn member(&self, id: MemberId) -> Result<MemberProfile> {
        self.members
            .get(&id)
            .map(Member::profile)
            .ok_or_else(|| AppError::not_found("member", id))
    }

    pub fn community(&self, name: &str) -> Result<Community> {
        self.communities
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::not_found("community", name))
    }

    pub fn thread(&self, id: ThreadId) -> Result<Thread> {
        self.threads
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("thread", id))
    }

    pub fn inbox(&self, member_id: MemberId) -> Result<Vec<PrivateMessage>> {
        self.require_member(member_id)?;
        Ok(self.inboxes.get(&member_id).cloned().unwrap_or_default())
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            members: self.members.len(),
            communities: self.communities.len(),
            threads: self.threads.len(),
            replies: self.reply_threads.len(),
            messages: self.inboxes.values().map(Vec::len).sum(),
        }
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new(OrphanThreadPolicy::default())
    }
}
