// REST client tests against a mock users service

use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

use useradmin::api::{RestClient, UsersApi};
use useradmin::error::ApiError;
use useradmin::model::{NewUser, User, UserDraft};

fn client_for(server: &MockServer) -> RestClient {
    RestClient::new(server.url("/api"))
}

#[tokio::test]
async fn list_users_maps_remote_page() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/users")
                .query_param("page", "2")
                .query_param("per_page", "5");
            then.status(200).json_body(json!({
                "page": 2,
                "per_page": 5,
                "total": 12,
                "total_pages": 3,
                "data": [
                    {"id": 7, "email": "michael.lawson@reqres.in", "first_name": "Michael", "last_name": "Lawson", "avatar": "x"},
                    {"id": 8, "email": "lindsay.ferguson@reqres.in", "first_name": "Lindsay", "last_name": "Ferguson", "role": "admin"}
                ]
            }));
        })
        .await;

    let page = client_for(&server).list_users(2).await.unwrap();
    list.assert_async().await;

    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total, 12);
    assert_eq!(
        page.data,
        vec![
            User {
                id: 7,
                name: "Michael Lawson".into(),
                email: "michael.lawson@reqres.in".into(),
                role: "user".into(),
            },
            User {
                id: 8,
                name: "Lindsay Ferguson".into(),
                email: "lindsay.ferguson@reqres.in".into(),
                role: "admin".into(),
            },
        ]
    );
}

#[tokio::test]
async fn list_failure_uses_generic_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/users");
            then.status(500).json_body(json!({"error": "boom"}));
        })
        .await;

    let err = client_for(&server).list_users(1).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status { status: 500, message: "Failed to fetch users".into() }
    );
}

#[tokio::test]
async fn create_user_splits_name_and_keeps_input() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/users").json_body(json!({
                "first_name": "Jane",
                "last_name": "Doe",
                "email": "jane@x.com",
                "role": "editor"
            }));
            // the echo differs from the input on purpose
            then.status(201).json_body(json!({"id": 42, "first_name": "Other", "createdAt": "now"}));
        })
        .await;

    let new_user = NewUser {
        name: "Jane Doe".into(),
        email: "jane@x.com".into(),
        role: "editor".into(),
    };
    let user = client_for(&server).create_user(&new_user).await.unwrap();
    create.assert_async().await;
    assert_eq!(
        user,
        User { id: 42, name: "Jane Doe".into(), email: "jane@x.com".into(), role: "editor".into() }
    );
}

#[tokio::test]
async fn create_user_accepts_string_id() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/users");
            then.status(201).json_body(json!({"id": "731"}));
        })
        .await;

    let new_user = NewUser { name: "Cher".into(), email: "cher@x.com".into(), role: "user".into() };
    let user = client_for(&server).create_user(&new_user).await.unwrap();
    assert_eq!(user.id, 731);
}

#[tokio::test]
async fn create_failure_prefers_server_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/users");
            then.status(400).json_body(json!({"error": "Missing email"}));
        })
        .await;

    let new_user = NewUser { name: "Jane".into(), email: "jane@x.com".into(), role: "user".into() };
    let err = client_for(&server).create_user(&new_user).await.unwrap_err();
    assert_eq!(err.to_string(), "Missing email");
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn update_user_fills_missing_fields_with_defaults() {
    let server = MockServer::start_async().await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/users/7")
                .json_body(json!({"first_name": "Bob", "last_name": ""}));
            then.status(200).json_body(json!({"updatedAt": "now"}));
        })
        .await;

    let draft = UserDraft { name: Some("Bob".into()), ..Default::default() };
    let user = client_for(&server).update_user(7, &draft).await.unwrap();
    update.assert_async().await;
    assert_eq!(user, User { id: 7, name: "Bob".into(), email: String::new(), role: "user".into() });
}

#[tokio::test]
async fn update_failure_without_body_uses_fallback() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/users/7");
            then.status(503);
        })
        .await;

    let draft = UserDraft::full("Bob Ross", "bob@x.com", "user");
    let err = client_for(&server).update_user(7, &draft).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to update user");
}

#[tokio::test]
async fn delete_user_reports_not_found() {
    let server = MockServer::start_async().await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/users/3");
            then.status(404).json_body(json!({"error": "Not found"}));
        })
        .await;

    let err = client_for(&server).delete_user(3).await.unwrap_err();
    delete.assert_async().await;
    assert_eq!(err, ApiError::Status { status: 404, message: "Not found".into() });
}

#[tokio::test]
async fn delete_user_succeeds_on_no_content() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/users/3");
            then.status(204);
        })
        .await;

    assert!(client_for(&server).delete_user(3).await.unwrap());
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    // nothing listens on port 9 (discard) in the test environment
    let client = RestClient::new("http://127.0.0.1:9/api");
    let err = client.list_users(1).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
}
