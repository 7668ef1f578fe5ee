//! Planner flows: session persistence, remote fetches and dispatched outcomes.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use serde_json::json;
use std::sync::Arc;
use tripvote_client::session::{TOKEN_KEY, USER_KEY};
use tripvote_client::{
    persist_session, ApiClient, ClientConfig, FileSessionStore, MemorySessionStore, Planner, PlannerError, Session,
    SessionStore,
};
use tripvote_testing::{test_clock, SequentialIdGenerator};
use tripvote_voting::{
    ActivityId, ActivityOption, AppState, Category, NewActivity, User, UserId, VotingEnvironment, VotingState,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mike() -> User {
    User {
        id: UserId::from("user-1"),
        email: "mike@example.com".to_string(),
        name: "Mike".to_string(),
        picture: None,
        has_rsvpd: None,
    }
}

fn mike_session() -> Session {
    Session {
        user: mike(),
        token: "t0k".to_string(),
    }
}

fn state_with_kart() -> AppState {
    let kart = ActivityOption::new(
        ActivityId::from("kart"),
        NewActivity::new("Go Kart Racing", Category::Entertainment),
    );
    AppState {
        voting: VotingState::with_seed(vec![kart], Vec::new()),
        ..AppState::default()
    }
}

fn planner(api_url: &str, sessions: Arc<dyn SessionStore>, state: AppState) -> Planner {
    let env = VotingEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIdGenerator::new()));
    let api = ApiClient::new(&ClientConfig::new(api_url)).unwrap();
    Planner::new(state, env, api, sessions)
}

fn offline(sessions: Arc<dyn SessionStore>) -> Planner {
    planner("http://127.0.0.1:9", sessions, state_with_kart())
}

#[tokio::test]
async fn restore_without_session_stops_loading() {
    let planner = offline(Arc::new(MemorySessionStore::new()));
    assert!(planner.snapshot().await.auth.is_loading);

    assert!(!planner.restore().await.unwrap());

    let state = planner.snapshot().await;
    assert!(!state.auth.is_loading);
    assert!(!state.auth.is_authenticated);
}

#[tokio::test]
async fn restore_signs_in_persisted_user() {
    let sessions = Arc::new(MemorySessionStore::new());
    persist_session(sessions.as_ref(), &mike_session()).unwrap();
    let planner = offline(sessions);

    assert!(planner.restore().await.unwrap());

    let state = planner.snapshot().await;
    assert!(state.auth.is_authenticated);
    assert_eq!(state.auth.user, Some(mike()));
    assert_eq!(state.auth.token.as_deref(), Some("t0k"));
}

#[tokio::test]
async fn restore_discards_corrupted_file_session() {
    let dir = tempfile::tempdir().unwrap();
    let file = Arc::new(FileSessionStore::new(dir.path().join("nested").join("session.json")));
    file.set(TOKEN_KEY, "t0k").unwrap();
    file.set(USER_KEY, "{\"id\":").unwrap();

    let planner = offline(file.clone());

    assert!(!planner.restore().await.unwrap());
    assert_eq!(file.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(file.get(USER_KEY).unwrap(), None);
    assert!(!planner.snapshot().await.auth.is_authenticated);
}

#[tokio::test]
async fn truncated_session_file_recovers_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");
    std::fs::write(&session_path, r#"{"authToken": "t0k", "us"#).unwrap();

    let planner = offline(Arc::new(FileSessionStore::new(&session_path)));

    assert!(!planner.restore().await.unwrap());
    let state = planner.snapshot().await;
    assert!(!state.auth.is_authenticated);
    assert!(!state.auth.is_loading);

    planner.logout().await.unwrap();
    planner.sign_in(mike_session()).await.unwrap();

    let next = offline(Arc::new(FileSessionStore::new(&session_path)));
    assert!(next.restore().await.unwrap());
    assert_eq!(next.snapshot().await.auth.user, Some(mike()));
}

#[tokio::test]
async fn file_session_survives_a_new_planner() {
    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");

    let first = offline(Arc::new(FileSessionStore::new(&session_path)));
    first.sign_in(mike_session()).await.unwrap();

    let second = offline(Arc::new(FileSessionStore::new(&session_path)));
    assert!(second.restore().await.unwrap());
    assert_eq!(second.snapshot().await.auth.user, Some(mike()));
}

#[tokio::test]
async fn complete_sign_in_from_callback() {
    let sessions = Arc::new(MemorySessionStore::new());
    let planner = offline(sessions.clone());

    planner
        .complete_sign_in(
            "http://localhost:3000/auth/callback?token=t0k&user=%7B%22id%22%3A%22user-1%22%2C%22email%22%3A%22mike%40example.com%22%2C%22name%22%3A%22Mike%22%7D",
        )
        .await
        .unwrap();

    assert!(planner.snapshot().await.auth.is_authenticated);
    assert_eq!(sessions.get(TOKEN_KEY).unwrap().as_deref(), Some("t0k"));
}

#[tokio::test]
async fn bad_callback_clears_persisted_session() {
    let sessions = Arc::new(MemorySessionStore::new());
    persist_session(sessions.as_ref(), &mike_session()).unwrap();
    let planner = offline(sessions.clone());

    let error = planner
        .complete_sign_in("http://localhost:3000/auth/callback?token=t0k")
        .await
        .unwrap_err();

    assert!(matches!(error, PlannerError::Callback(_)));
    assert_eq!(sessions.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn logout_clears_session_and_state() {
    let sessions = Arc::new(MemorySessionStore::new());
    let planner = offline(sessions.clone());
    planner.sign_in(mike_session()).await.unwrap();

    planner.logout().await.unwrap();

    let state = planner.snapshot().await;
    assert!(!state.auth.is_authenticated);
    assert!(state.auth.token.is_none());
    assert_eq!(sessions.get(USER_KEY).unwrap(), None);
}

#[tokio::test]
async fn toggle_vote_requires_sign_in() {
    let planner = offline(Arc::new(MemorySessionStore::new()));

    let error = planner.toggle_vote(ActivityId::from("kart")).await.unwrap_err();
    assert!(matches!(error, PlannerError::NotSignedIn));
}

#[tokio::test]
async fn toggle_vote_casts_then_removes() {
    let planner = offline(Arc::new(MemorySessionStore::new()));
    planner.sign_in(mike_session()).await.unwrap();
    let kart = ActivityId::from("kart");

    planner.toggle_vote(kart.clone()).await.unwrap();
    assert!(planner.snapshot().await.voting.has_vote(&kart, &UserId::from("user-1")));

    planner.toggle_vote(kart.clone()).await.unwrap();
    assert!(!planner.snapshot().await.voting.has_vote(&kart, &UserId::from("user-1")));
}

#[tokio::test]
async fn refresh_attendees_replaces_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .and(header("authorization", "Bearer t0k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "user-1",
                "firstName": "Mike",
                "lastName": "Smith",
                "fullName": "Mike Smith",
                "email": "mike@example.com",
                "hasRSVPd": true
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let planner = planner(&server.uri(), Arc::new(MemorySessionStore::new()), state_with_kart());
    planner.sign_in(mike_session()).await.unwrap();

    planner.refresh_attendees().await.unwrap();

    let state = planner.snapshot().await;
    assert_eq!(state.voting.attendees.len(), 1);
    assert!(!state.voting.is_loading);
    assert!(state.voting.error.is_none());
    assert!(state.voting.last_updated.is_none());
}

#[tokio::test]
async fn refresh_attendees_failure_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let planner = planner(&server.uri(), Arc::new(MemorySessionStore::new()), state_with_kart());
    planner.sign_in(mike_session()).await.unwrap();

    let error = planner.refresh_attendees().await.unwrap_err();
    assert!(matches!(error, PlannerError::Api(_)));

    let state = planner.snapshot().await;
    assert!(!state.voting.is_loading);
    assert!(state.voting.error.as_deref().is_some_and(|e| e.contains("503")));
}

#[tokio::test]
async fn refresh_attendees_requires_token() {
    let planner = offline(Arc::new(MemorySessionStore::new()));

    let error = planner.refresh_attendees().await.unwrap_err();
    assert!(matches!(error, PlannerError::NotSignedIn));
}

#[tokio::test]
async fn set_rsvp_folds_stored_flag_into_user() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/users/user-1/rsvp"))
        .and(header("authorization", "Bearer t0k"))
        .and(body_json(json!({ "hasRSVPd": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hasRSVPd": true })))
        .expect(1)
        .mount(&server)
        .await;

    let sessions = Arc::new(MemorySessionStore::new());
    let planner = planner(&server.uri(), sessions.clone(), state_with_kart());
    planner.sign_in(mike_session()).await.unwrap();

    planner.set_rsvp(true).await.unwrap();

    let state = planner.snapshot().await;
    assert_eq!(state.auth.user.as_ref().and_then(|u| u.has_rsvpd), Some(true));

    let persisted: User = serde_json::from_str(&sessions.get(USER_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted.has_rsvpd, Some(true));
}

#[tokio::test]
async fn set_rsvp_failure_keeps_user() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/users/user-1/rsvp"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let planner = planner(&server.uri(), Arc::new(MemorySessionStore::new()), state_with_kart());
    planner.sign_in(mike_session()).await.unwrap();

    assert!(planner.set_rsvp(false).await.is_err());

    let state = planner.snapshot().await;
    assert_eq!(state.auth.user, Some(mike()));
    assert!(state.voting.error.is_some());
}

#[tokio::test]
async fn dispatch_after_shutdown_fails() {
    let planner = offline(Arc::new(MemorySessionStore::new()));
    planner.store().shutdown();

    let error = planner.logout().await.unwrap_err();
    assert!(matches!(error, PlannerError::Store(_)));
}
