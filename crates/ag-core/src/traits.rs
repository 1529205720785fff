//! # Core Traits (Ports)
//!
//! The command vocabulary as an async service. The engine handle implements
//! it; the HTTP adapter and the simulator only ever talk to this trait.

use crate::commands::{
    CastVote, CreateCommunity, CreateReply, CreateThread, FetchFeed, JoinCommunity,
    RegisterMember, SendMessage,
};
use crate::error::Result;
use crate::ids::{MemberId, MessageId, ReplyId, ThreadId};
use crate::models::{Community, MemberProfile, PrivateMessage, StoreStats, Thread, VoteTally};
use async_trait::async_trait;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommunityService: Send + Sync {
    // Commands
    async fn register_member(&self, cmd: RegisterMember) -> Result<MemberId>;
    /// Returns the name of the created community.
    async fn create_community(&self, cmd: CreateCommunity) -> Result<String>;
    async fn join_community(&self, cmd: JoinCommunity) -> Result<()>;
    async fn create_thread(&self, cmd: CreateThread) -> Result<ThreadId>;
    async fn create_reply(&self, cmd: CreateReply) -> Result<ReplyId>;
    async fn cast_vote(&self, cmd: CastVote) -> Result<VoteTally>;
    async fn send_message(&self, cmd: SendMessage) -> Result<MessageId>;
    /// Threads of every community the member participates in, newest first.
    async fn fetch_feed(&self, cmd: FetchFeed) -> Result<Vec<Thread>>;

    // Queries
    async fn member(&self, id: MemberId) -> Result<MemberProfile>;
    async fn community(&self, name: String) -> Result<Community>;
    async fn thread(&self, id: ThreadId) -> Result<Thread>;
    async fn inbox(&self, member_id: MemberId) -> Result<Vec<PrivateMessage>>;
    async fn stats(&self) -> Result<StoreStats>;
}
