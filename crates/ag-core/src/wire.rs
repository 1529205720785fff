//! # Wire Types
//!
//! JSON request bodies of the HTTP surface, shared by the server and the
//! client adapters. Keys are PascalCase; ids travel as UUID strings and an
//! empty optional id means "none". An id that does not parse can never
//! resolve, so it is reported as not found like any other unknown reference.

use crate::commands::{
    CastVote, CreateCommunity, CreateReply, CreateThread, JoinCommunity, SendMessage,
};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

fn parse_id<T: FromStr>(kind: &'static str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| AppError::not_found(kind, raw))
}

fn parse_optional_id<T: FromStr>(kind: &'static str, raw: Option<&str>) -> Result<Option<T>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_id(kind, raw).map(Some),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommunityRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "FounderID", skip_serializing_if = "Option::is_none")]
    pub founder_id: Option<String>,
}

impl TryFrom<CommunityRequest> for CreateCommunity {
    type Error = AppError;

    fn try_from(req: CommunityRequest) -> Result<Self> {
        Ok(CreateCommunity {
            founder_id: parse_optional_id("member", req.founder_id.as_deref())?,
            name: req.name,
            description: req.description,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ThreadRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "CreatorID")]
    pub creator_id: String,
    #[serde(rename = "CommunityID")]
    pub community_id: String,
}

impl TryFrom<ThreadRequest> for CreateThread {
    type Error = AppError;

    fn try_from(req: ThreadRequest) -> Result<Self> {
        Ok(CreateThread {
            creator_id: parse_id("member", &req.creator_id)?,
            title: req.title,
            content: req.content,
            community_id: req.community_id,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReplyRequest {
    pub content: String,
    #[serde(rename = "CreatorID")]
    pub creator_id: String,
    #[serde(rename = "ThreadID")]
    pub thread_id: String,
    #[serde(default, rename = "ParentID")]
    pub parent_id: Option<String>,
}

impl TryFrom<ReplyRequest> for CreateReply {
    type Error = AppError;

    fn try_from(req: ReplyRequest) -> Result<Self> {
        Ok(CreateReply {
            creator_id: parse_id("member", &req.creator_id)?,
            thread_id: parse_id("thread", &req.thread_id)?,
            parent_id: parse_optional_id("reply", req.parent_id.as_deref())?,
            content: req.content,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoteRequest {
    #[serde(rename = "MemberID")]
    pub member_id: String,
    #[serde(rename = "TargetID")]
    pub target_id: String,
    pub is_upvote: bool,
}

impl TryFrom<VoteRequest> for CastVote {
    type Error = AppError;

    fn try_from(req: VoteRequest) -> Result<Self> {
        Ok(CastVote {
            member_id: parse_id("member", &req.member_id)?,
            target_id: parse_id("vote target", &req.target_id)?,
            is_upvote: req.is_upvote,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageRequest {
    #[serde(rename = "SenderID")]
    pub sender_id: String,
    #[serde(rename = "ReceiverID")]
    pub receiver_id: String,
    pub content: String,
}

impl TryFrom<MessageRequest> for SendMessage {
    type Error = AppError;

    fn try_from(req: MessageRequest) -> Result<Self> {
        Ok(SendMessage {
            sender_id: parse_id("member", &req.sender_id)?,
            receiver_id: parse_id("member", &req.receiver_id)?,
            content: req.content,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    #[serde(rename = "MemberID")]
    pub member_id: String,
    #[serde(rename = "CommunityID")]
    pub community_id: String,
}

impl TryFrom<JoinRequest> for JoinCommunity {
    type Error = AppError;

    fn try_from(req: JoinRequest) -> Result<Self> {
        Ok(JoinCommunity {
            member_id: parse_id("member", &req.member_id)?,
            community_id: req.community_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{MemberId, ThreadId};

    #[test]
    fn reply_body_uses_pascal_case_keys_and_empty_parent() {
        let creator = MemberId::generate();
        let thread = ThreadId::generate();
        let body = format!(
            r#"{{"Content":"Thanks!","CreatorID":"{creator}","ThreadID":"{thread}","ParentID":""}}"#
        );

        let req: ReplyRequest = serde_json::from_str(&body).unwrap();
        let cmd = CreateReply::try_from(req).unwrap();

        assert_eq!(cmd.creator_id, creator);
        assert_eq!(cmd.thread_id, thread);
        assert_eq!(cmd.parent_id, None);
    }

    #[test]
    fn unparseable_creator_is_an_unknown_member() {
        let req = ThreadRequest {
            title: "Hi".to_string(),
            content: String::new(),
            creator_id: "alice".to_string(),
            community_id: "books".to_string(),
        };
        let err = CreateThread::try_from(req).unwrap_err();
        assert_eq!(err, AppError::not_found("member", "alice"));
    }

    #[test]
    fn unparseable_reply_references_name_their_kind() {
        let creator = MemberId::generate();
        let req = ReplyRequest {
            content: "hi".to_string(),
            creator_id: creator.to_string(),
            thread_id: "12345".to_string(),
            parent_id: Some(String::new()),
        };
        let err = CreateReply::try_from(req).unwrap_err();
        assert!(matches!(err, AppError::NotFound("thread", ref id) if id == "12345"));

        let req = ReplyRequest {
            content: "hi".to_string(),
            creator_id: creator.to_string(),
            thread_id: ThreadId::generate().to_string(),
            parent_id: Some("nope".to_string()),
        };
        let err = CreateReply::try_from(req).unwrap_err();
        assert!(matches!(err, AppError::NotFound("reply", _)));
    }
}
