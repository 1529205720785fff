//! # Command Vocabulary
//!
//! One struct per state mutation. The HTTP adapter and the simulator both
//! compile down to these; the engine is the only thing that applies them.

use crate::ids::{MemberId, ReplyId, ThreadId};
use secrecy::SecretString;
use uuid::Uuid;

#[derive(Debug)]
pub struct RegisterMember {
    pub username: String,
    pub password: SecretString,
}

impl RegisterMember {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateCommunity {
    pub name: String,
    pub description: String,
    /// Joins the community as its first participant when set
    pub founder_id: Option<MemberId>,
}

#[derive(Debug, Clone)]
pub struct JoinCommunity {
    pub member_id: MemberId,
    pub community_id: String,
}

#[derive(Debug, Clone)]
pub struct CreateThread {
    pub title: String,
    pub content: String,
    pub creator_id: MemberId,
    pub community_id: String,
}

#[derive(Debug, Clone)]
pub struct CreateReply {
    pub content: String,
    pub creator_id: MemberId,
    pub thread_id: ThreadId,
    pub parent_id: Option<ReplyId>,
}

/// A vote on a thread or a reply; the target is resolved against both.
#[derive(Debug, Clone)]
pub struct CastVote {
    pub member_id: MemberId,
    pub target_id: Uuid,
    pub is_upvote: bool,
}

#[derive(Debug, Clone)]
pub struct SendMessage {
    pub sender_id: MemberId,
    pub receiver_id: MemberId,
    pub content: String,
}

#[derive(Debug, Clone, Copy)]
pub struct FetchFeed {
    pub member_id: MemberId,
}
