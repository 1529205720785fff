//! # Domain Models
//!
//! These structs represent the core entities of Agora.
//! They are plain data: only the engine's store mutates them.

use crate::ids::{MemberId, MessageId, ReplyId, ThreadId};
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A registered member. The credential is kept opaque and verbatim.
#[derive(Debug)]
pub struct Member {
    pub id: MemberId,
    pub username: String,
    pub password: SecretString,
    /// Sum of the votes received on content this member authored
    pub karma: i64,
}

impl Member {
    pub fn profile(&self) -> MemberProfile {
        MemberProfile {
            id: self.id,
            username: self.username.clone(),
            karma: self.karma,
        }
    }
}

/// Public view of a member, without the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub id: MemberId,
    pub username: String,
    pub karma: i64,
}

/// A community, identified by its unique name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    pub name: String,
    pub description: String,
    pub founder_id: Option<MemberId>,
    pub participants: BTreeSet<MemberId>,
    /// Threads linked into this community, in creation order
    pub threads: Vec<ThreadId>,
    pub created_at: DateTime<Utc>,
}

/// A discussion thread and its tree of replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    pub title: String,
    pub content: String,
    pub creator_id: MemberId,
    /// Name of the owning community
    pub community_id: String,
    pub upvotes: u32,
    pub downvotes: u32,
    /// Top-level replies; nested replies live under their parent
    pub replies: Vec<Reply>,
    pub created_at: DateTime<Utc>,
}

impl Thread {
    /// Counts every reply in the tree, nested ones included.
    pub fn reply_count(&self) -> usize {
        count_replies(&self.replies)
    }

    pub fn find_reply(&self, id: ReplyId) -> Option<&Reply> {
        find_reply_in(&self.replies, id)
    }

    pub fn find_reply_mut(&mut self, id: ReplyId) -> Option<&mut Reply> {
        find_reply_in_mut(&mut self.replies, id)
    }
}

/// The fundamental unit of conversation inside a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub id: ReplyId,
    pub content: String,
    pub creator_id: MemberId,
    pub thread_id: ThreadId,
    pub parent_id: Option<ReplyId>,
    pub upvotes: u32,
    pub downvotes: u32,
    pub replies: Vec<Reply>,
    pub created_at: DateTime<Utc>,
}

fn count_replies(replies: &[Reply]) -> usize {
    replies.iter().map(|r| 1 + count_replies(&r.replies)).sum()
}

fn find_reply_in(replies: &[Reply], id: ReplyId) -> Option<&Reply> {
    for reply in replies {
        if reply.id == id {
            return Some(reply);
        }
        if let Some(found) = find_reply_in(&reply.replies, id) {
            return Some(found);
        }
    }
    None
}

fn find_reply_in_mut(replies: &mut [Reply], id: ReplyId) -> Option<&mut Reply> {
    for reply in replies.iter_mut() {
        if reply.id == id {
            return Some(reply);
        }
        if let Some(found) = find_reply_in_mut(&mut reply.replies, id) {
            return Some(found);
        }
    }
    None
}

/// A direct message between two members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateMessage {
    pub id: MessageId,
    pub sender_id: MemberId,
    pub receiver_id: MemberId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Vote counters of a thread or reply after a vote was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub upvotes: u32,
    pub downvotes: u32,
}

/// Entity counts of the store at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub members: usize,
    pub communities: usize,
    pub threads: usize,
    pub replies: usize,
    pub messages: usize,
}
