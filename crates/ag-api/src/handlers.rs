//! # ag-api Handlers
//!
//! Each handler decodes a request body, turns it into an engine command and
//! maps the command's result onto a status code. No state lives here.

use crate::error::ApiError;
use ag_core::wire::{
    CommunityRequest, JoinRequest, MessageRequest, RegisterRequest, ReplyRequest, ThreadRequest,
    VoteRequest,
};
use ag_core::{
    AppError, CastVote, CommunityService, CreateCommunity, CreateReply, CreateThread, FetchFeed,
    JoinCommunity, MemberId, RegisterMember, SendMessage, Thread, ThreadId, VoteTally,
};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn CommunityService>,
}

impl AppState {
    pub fn new(service: Arc<dyn CommunityService>) -> Self {
        Self { service }
    }
}

type Created = (StatusCode, String);

/// Any body that is not valid JSON for `T` is a 400, whatever the content type.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::ValidationError(format!("malformed request body: {e}")).into())
}

/// A path id that does not parse names nothing that could exist.
fn parse_path_id<T: std::str::FromStr>(kind: &'static str, raw: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| AppError::not_found(kind, raw).into())
}

/// Liveness probe for "/"
pub async fn index() -> &'static str {
    "Server is running!\n"
}

pub async fn register_member(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Created, ApiError> {
    let req: RegisterRequest = parse_body(&body)?;
    let id = state
        .service
        .register_member(RegisterMember::new(req.username, req.password))
        .await?;
    Ok((StatusCode::CREATED, format!("Member registered with ID: {id}")))
}

pub async fn create_community(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Created, ApiError> {
    let cmd = CreateCommunity::try_from(parse_body::<CommunityRequest>(&body)?)?;
    let name = state.service.create_community(cmd).await?;
    Ok((StatusCode::CREATED, format!("Community created: {name}")))
}

pub async fn create_thread(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Created, ApiError> {
    let cmd = CreateThread::try_from(parse_body::<ThreadRequest>(&body)?)?;
    let id = state.service.create_thread(cmd).await?;
    Ok((StatusCode::CREATED, format!("Thread created with ID: {id}")))
}

pub async fn create_reply(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Created, ApiError> {
    let cmd = CreateReply::try_from(parse_body::<ReplyRequest>(&body)?)?;
    let id = state.service.create_reply(cmd).await?;
    Ok((StatusCode::CREATED, format!("Reply created with ID: {id}")))
}

pub async fn cast_vote(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<VoteTally>, ApiError> {
    let cmd = CastVote::try_from(parse_body::<VoteRequest>(&body)?)?;
    Ok(Json(state.service.cast_vote(cmd).await?))
}

pub async fn send_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Created, ApiError> {
    let cmd = SendMessage::try_from(parse_body::<MessageRequest>(&body)?)?;
    let id = state.service.send_message(cmd).await?;
    Ok((StatusCode::CREATED, format!("Message sent with ID: {id}")))
}

pub async fn join_community(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, ApiError> {
    let cmd = JoinCommunity::try_from(parse_body::<JoinRequest>(&body)?)?;
    let name = cmd.community_id.clone();
    state.service.join_community(cmd).await?;
    Ok(format!("Joined community: {name}"))
}

pub async fn view_thread(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Thread>, ApiError> {
    let id: ThreadId = parse_path_id("thread", &id)?;
    Ok(Json(state.service.thread(id).await?))
}

pub async fn member_feed(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
) -> Result<Json<Vec<Thread>>, ApiError> {
    let member_id: MemberId = parse_path_id("member", &member_id)?;
    Ok(Json(state.service.fetch_feed(FetchFeed { member_id }).await?))
}
