//! HTTP contract tests against a mock API server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use serde_json::json;
use tripvote_client::{ApiClient, ApiError, ClientConfig};
use tripvote_voting::{RsvpStatus, UserId};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&ClientConfig::new(server.uri())).unwrap()
}

fn attendees_json() -> serde_json::Value {
    json!([
        {
            "id": "user-1",
            "firstName": "Mike",
            "lastName": "Smith",
            "fullName": "Mike Smith",
            "email": "mike@example.com",
            "picture": "https://example.com/mike.png",
            "hasRSVPd": true
        },
        {
            "id": "user-2",
            "firstName": "Dave",
            "lastName": "Jones",
            "fullName": "Dave Jones",
            "email": "dave@example.com",
            "hasRSVPd": null
        }
    ])
}

#[tokio::test]
async fn fetch_attendees_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .and(header("authorization", "Bearer t0k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(attendees_json()))
        .expect(1)
        .mount(&server)
        .await;

    let attendees = client(&server).fetch_attendees("t0k").await.unwrap();

    assert_eq!(attendees.len(), 2);
    assert_eq!(attendees[0].id, UserId::from("user-1"));
    assert_eq!(attendees[0].rsvp(), RsvpStatus::Yes);
    assert_eq!(attendees[1].rsvp(), RsvpStatus::Pending);
    assert_eq!(attendees[1].picture, None);
}

#[tokio::test]
async fn fetch_attendees_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let error = client(&server).fetch_attendees("expired").await.unwrap_err();
    assert!(matches!(error, ApiError::Unauthorized));
}

#[tokio::test]
async fn fetch_attendees_server_error_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    match client(&server).fetch_attendees("t0k").await.unwrap_err() {
        ApiError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database unavailable");
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_attendees_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "users": [] })))
        .mount(&server)
        .await;

    let error = client(&server).fetch_attendees("t0k").await.unwrap_err();
    assert!(matches!(error, ApiError::ResponseParseFailed(_)));
}

#[tokio::test]
async fn update_rsvp_puts_flag_and_returns_stored_value() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/users/user-1/rsvp"))
        .and(header("authorization", "Bearer t0k"))
        .and(body_json(json!({ "hasRSVPd": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user-1", "hasRSVPd": false })))
        .expect(1)
        .mount(&server)
        .await;

    let stored = client(&server)
        .update_rsvp(&UserId::from("user-1"), "t0k", false)
        .await
        .unwrap();

    assert_eq!(stored, Some(false));
}

#[tokio::test]
async fn update_rsvp_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/users/user-1/rsvp"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such user"))
        .mount(&server)
        .await;

    let error = client(&server)
        .update_rsvp(&UserId::from("user-1"), "t0k", true)
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::Status { status: 404, .. }));
}
