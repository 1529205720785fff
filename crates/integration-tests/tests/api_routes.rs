use ag_api::{router, AppState};
use ag_core::{CommunityService, MemberId, Thread, VoteTally};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use integration_tests::engine;
use std::sync::Arc;
use tower::ServiceExt;

async fn send(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, String) {
    let response = app
        .clone()
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
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn id_after(body: &str, prefix: &str) -> String {
    body.strip_prefix(prefix)
        .unwrap_or_else(|| panic!("unexpected body: {body}"))
        .trim()
        .to_string()
}

#[tokio::test]
async fn full_posting_flow_over_http() {
    let engine = engine();
    let app = router(AppState::new(Arc::new(engine.clone())));

    let (status, body) = send(
        &app,
        Method::POST,
        "/register",
        r#"{"Username":"alice","Password":"pw"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let alice = id_after(&body, "Member registered with ID: ");

    let (status, body) = send(
        &app,
        Method::POST,
        "/community",
        &format!(r#"{{"Name":"books","Description":"Reading","FounderID":"{alice}"}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, "Community created: books");

    let (status, body) = send(
        &app,
        Method::POST,
        "/thread",
        &format!(r#"{{"Title":"Hi","Content":"First","CreatorID":"{alice}","CommunityID":"books"}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let thread = id_after(&body, "Thread created with ID: ");

    let (status, body) = send(
        &app,
        Method::POST,
        "/reply",
        &format!(r#"{{"Content":"Welcome","CreatorID":"{alice}","ThreadID":"{thread}"}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let reply = id_after(&body, "Reply created with ID: ");

    let (status, body) = send(
        &app,
        Method::POST,
        "/vote",
        &format!(r#"{{"MemberID":"{alice}","TargetID":"{thread}","IsUpvote":true}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let tally: VoteTally = serde_json::from_str(&body).unwrap();
    assert_eq!(tally.upvotes, 1);

    let (status, body) = send(&app, Method::GET, &format!("/threads/{thread}"), "").await;
    assert_eq!(status, StatusCode::OK);
    let stored: Thread = serde_json::from_str(&body).unwrap();
    assert_eq!(stored.title, "Hi");
    assert_eq!(stored.upvotes, 1);
    assert_eq!(stored.replies[0].id.to_string(), reply);

    let (status, body) = send(&app, Method::GET, &format!("/feed/{alice}"), "").await;
    assert_eq!(status, StatusCode::OK);
    let feed: Vec<Thread> = serde_json::from_str(&body).unwrap();
    assert_eq!(feed.len(), 1);

    let member: MemberId = alice.parse().unwrap();
    assert_eq!(engine.member(member).await.unwrap().karma, 1);
}

#[tokio::test]
async fn referential_errors_map_to_status_codes() {
    let engine = engine();
    let app = router(AppState::new(Arc::new(engine.clone())));
    let ghost = MemberId::generate();

    let (status, body) = send(
        &app,
        Method::POST,
        "/thread",
        &format!(r#"{{"Title":"Hi","Content":"","CreatorID":"{ghost}","CommunityID":"books"}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("not found"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/community",
        r#"{"Name":"books","Description":"Reading"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        &app,
        Method::POST,
        "/community",
        r#"{"Name":"books","Description":"Again"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::GET, "/threads/not-a-uuid", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        Method::POST,
        "/register",
        r#"{"Username":"alice","Password":"pw"}"#,
    )
    .await;
    let alice = id_after(&body, "Member registered with ID: ");
    let (status, body) = send(
        &app,
        Method::POST,
        "/reply",
        &format!(r#"{{"Content":"hi","CreatorID":"{alice}","ThreadID":"12345","ParentID":""}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("thread not found"));

    let (status, _) = send(&app, Method::POST, "/reply", r#"{"Content": "#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/register", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    assert_eq!(engine.stats().await.unwrap().threads, 0);
    assert_eq!(engine.stats().await.unwrap().communities, 1);
}

#[tokio::test]
async fn join_then_feed_over_http() {
    let engine = engine();
    let app = router(AppState::new(Arc::new(engine)));

    let (_, body) = send(
        &app,
        Method::POST,
        "/register",
        r#"{"Username":"bob","Password":"pw"}"#,
    )
    .await;
    let bob = id_after(&body, "Member registered with ID: ");
    send(
        &app,
        Method::POST,
        "/community",
        r#"{"Name":"films","Description":"Watching"}"#,
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/join",
        &format!(r#"{{"MemberID":"{bob}","CommunityID":"films"}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Joined community: films");

    let (status, _) = send(
        &app,
        Method::POST,
        "/join",
        &format!(r#"{{"MemberID":"{bob}","CommunityID":"nope"}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
