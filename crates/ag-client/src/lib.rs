//! # ag-client
//!
//! Thin HTTP client for the Agora server. Each call logs the outgoing
//! request and the response body at debug level.

use ag_core::wire::{
    CommunityRequest, MessageRequest, RegisterRequest, ReplyRequest, ThreadRequest, VoteRequest,
};
use ag_core::{MemberId, MessageId, ReplyId, ThreadId, VoteTally};
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

pub struct CommunityClient {
    base_url: String,
    http: reqwest::Client,
}

impl CommunityClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    async fn post<B: Serialize + std::fmt::Debug>(&self, path: &str, payload: &B) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = "POST", %url, ?payload, "http request");
        let response = self.http.post(&url).json(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, %body, "http response");
        if !status.is_success() {
            return Err(ClientError::Status { status, body });
        }
        Ok(body)
    }

    pub async fn register_member(&self, username: &str, password: &str) -> Result<MemberId> {
        let body = self
            .post(
                "/register",
                &RegisterRequest {
                    username: username.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        parse_created(&body, "Member registered with ID: ")
    }

    pub async fn create_community(
        &self,
        name: &str,
        description: &str,
        founder_id: Option<MemberId>,
    ) -> Result<String> {
        let body = self
            .post(
                "/community",
                &CommunityRequest {
                    name: name.to_string(),
                    description: description.to_string(),
                    founder_id: founder_id.map(|id| id.to_string()),
                },
            )
            .await?;
        if let Some(name) = body.strip_prefix("Community created: ") {
            return Ok(name.trim().to_string());
        }
        Err(ClientError::UnexpectedBody(body))
    }

    pub async fn create_thread(
        &self,
        title: &str,
        content: &str,
        creator_id: MemberId,
        community_id: &str,
    ) -> Result<ThreadId> {
        let body = self
            .post(
                "/thread",
                &ThreadRequest {
                    title: title.to_string(),
                    content: content.to_string(),
                    creator_id: creator_id.to_string(),
                    community_id: community_id.to_string(),
                },
            )
            .await?;
        parse_created(&body, "Thread created with ID: ")
    }

    pub async fn create_reply(
        &self,
        content: &str,
        creator_id: MemberId,
        thread_id: ThreadId,
        parent_id: Option<ReplyId>,
    ) -> Result<ReplyId> {
        let body = self
            .post(
                "/reply",
                &ReplyRequest {
                    content: content.to_string(),
                    creator_id: creator_id.to_string(),
                    thread_id: thread_id.to_string(),
                    parent_id: parent_id.map(|id| id.to_string()),
                },
            )
            .await?;
        parse_created(&body, "Reply created with ID: ")
    }

    /// `target_id` may be a thread or a reply.
    pub async fn cast_vote(
        &self,
        member_id: MemberId,
        target_id: impl ToString,
        is_upvote: bool,
    ) -> Result<VoteTally> {
        let body = self
            .post(
                "/vote",
                &VoteRequest {
                    member_id: member_id.to_string(),
                    target_id: target_id.to_string(),
                    is_upvote,
                },
            )
            .await?;
        parse_json(&body)
    }

    pub async fn send_message(
        &self,
        sender_id: MemberId,
        receiver_id: MemberId,
        content: &str,
    ) -> Result<MessageId> {
        let body = self
            .post(
                "/message",
                &MessageRequest {
                    sender_id: sender_id.to_string(),
                    receiver_id: receiver_id.to_string(),
                    content: content.to_string(),
                },
            )
            .await?;
        parse_created(&body, "Message sent with ID: ")
    }
}

/// Extracts the id from a "<prefix><id>" confirmation body.
fn parse_created<T: FromStr>(body: &str, prefix: &str) -> Result<T> {
    body.trim()
        .strip_prefix(prefix)
        .and_then(|id| id.trim().parse().ok())
        .ok_or_else(|| ClientError::UnexpectedBody(body.to_string()))
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|_| ClientError::UnexpectedBody(body.to_string()))
}
