//! # ag-api
//!
//! The HTTP adapter for Agora. Routes decode requests into the engine's
//! command vocabulary and nothing more.

pub mod error;
pub mod handlers;
pub mod middleware;

pub use error::ApiError;
pub use handlers::AppState;

use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tracing::info;

/// Builds the full router. Methods other than the one listed per route get 405.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/register", post(handlers::register_member))
        .route("/community", post(handlers::create_community))
        .route("/thread", post(handlers::create_thread))
        .route("/reply", post(handlers::create_reply))
        .route("/vote", post(handlers::cast_vote))
        .route("/message", post(handlers::send_message))
        .route("/join", post(handlers::join_community))
        .route("/threads/{id}", get(handlers::view_thread))
        .route("/feed/{member_id}", get(handlers::member_feed))
        .layer(middleware::cors_policy())
        .layer(middleware::trace_layer())
        .with_state(state)
}

/// Serves until `shutdown` resolves, then lets in-flight requests finish.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = ?listener.local_addr().ok(), "HTTP server listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use ag_core::{AppError, MemberId, MockCommunityService, ThreadId};
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(mock: MockCommunityService) -> Router {
        router(AppState::new(Arc::new(mock)))
    }

    async fn send(app: Router, method: Method, uri: &str, body: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn index_reports_liveness() {
        let (status, body) = send(app(MockCommunityService::new()), Method::GET, "/", "").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("running"));
    }

    #[tokio::test]
    async fn register_returns_created_with_id() {
        let id = MemberId::generate();
        let mut mock = MockCommunityService::new();
        mock.expect_register_member()
            .withf(|cmd| cmd.username == "test_user")
            .returning(move |_| Ok(id));

        let (status, body) = send(
            app(mock),
            Method::POST,
            "/register",
            r#"{"Username":"test_user","Password":"password123"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, format!("Member registered with ID: {id}"));
    }

    #[tokio::test]
    async fn wrong_method_is_not_allowed() {
        for uri in ["/register", "/community", "/thread", "/reply"] {
            let (status, _) = send(app(MockCommunityService::new()), Method::GET, uri, "").await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{uri}");
        }
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, _) = send(
            app(MockCommunityService::new()),
            Method::POST,
            "/community",
            r#"{"Name": "#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unparseable_creator_is_not_found() {
        let (status, body) = send(
            app(MockCommunityService::new()),
            Method::POST,
            "/thread",
            r#"{"Title":"Hi","Content":"","CreatorID":"alice","CommunityID":"books"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "member not found with ID alice");
    }

    #[tokio::test]
    async fn unparseable_thread_on_reply_is_not_found() {
        // No create_reply expectation: the request must not reach the engine.
        let creator = MemberId::generate();
        let (status, body) = send(
            app(MockCommunityService::new()),
            Method::POST,
            "/reply",
            &format!(r#"{{"Content":"hi","CreatorID":"{creator}","ThreadID":"12345","ParentID":""}}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "thread not found with ID 12345");
    }

    #[tokio::test]
    async fn unparseable_path_id_is_not_found() {
        let (status, _) = send(
            app(MockCommunityService::new()),
            Method::GET,
            "/threads/not-a-uuid",
            "",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reply_to_unknown_thread_is_not_found() {
        let thread_id = ThreadId::generate();
        let mut mock = MockCommunityService::new();
        mock.expect_create_reply()
            .returning(|cmd| Err(AppError::not_found("thread", cmd.thread_id)));

        let body = format!(
            r#"{{"Content":"hi","CreatorID":"{}","ThreadID":"{thread_id}","ParentID":""}}"#,
            MemberId::generate()
        );
        let (status, text) = send(app(mock), Method::POST, "/reply", &body).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(text.contains(&thread_id.to_string()));
    }

    #[tokio::test]
    async fn duplicate_community_is_conflict() {
        let mut mock = MockCommunityService::new();
        mock.expect_create_community()
            .returning(|cmd| Err(AppError::Conflict(format!("community {} already exists", cmd.name))));

        let (status, _) = send(
            app(mock),
            Method::POST,
            "/community",
            r#"{"Name":"books","Description":"Books"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn stopped_engine_is_service_unavailable() {
        let mut mock = MockCommunityService::new();
        mock.expect_register_member()
            .returning(|_| Err(AppError::EngineStopped));

        let (status, _) = send(
            app(mock),
            Method::POST,
            "/register",
            r#"{"Username":"late","Password":"pw"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
