//! Login, identity and the unauthenticated service endpoints.

mod common;

use assert_matches::assert_matches;
use axum::http::{Method, StatusCode};
use common::TestApp;
use maintenance_api::auth::{AuthError, LoginCredentials, NewUser, Role};
use serde_json::json;

async fn seed_with_password(app: &TestApp, username: &str, role: Role, password: &str) {
    let (_, created) = app
        .state
        .auth_service
        .ensure_user(NewUser {
            username: username.to_string(),
            display_name: format!("Seeded {}", username),
            email: None,
            role,
            password: password.to_string(),
        })
        .await
        .expect("seed user");
    assert!(created);
}

#[tokio::test]
async fn login_issues_token_usable_on_the_api() {
    let app = TestApp::new().await;
    seed_with_password(&app, "tech2", Role::Maintenance, "wrench-and-spanner").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": "tech2", "password": "wrench-and-spanner" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    let token = body["access_token"].as_str().expect("access token").to_string();

    let (status, me) = app.call(Method::GET, "/auth/me", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "tech2");
    assert_eq!(me["role"], "maintenance");

    let id = app.open_request("Assembly").await;
    let (status, _) = app
        .call(
            Method::POST,
            &format!("/api/v1/maintenance-requests/{}/start", id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    seed_with_password(&app, "tech3", Role::Maintenance, "correct-horse").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/auth/login",
            Some(json!({ "username": "tech3", "password": "battery-staple" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized: Invalid credentials");

    let result = app
        .state
        .auth_service
        .login(&LoginCredentials {
            username: "nobody".into(),
            password: "x".into(),
        })
        .await;
    assert_matches!(result, Err(AuthError::InvalidCredentials));
}

#[tokio::test]
async fn ensure_user_is_idempotent() {
    let app = TestApp::new().await;
    seed_with_password(&app, "clerk", Role::Requester, "first-password").await;

    let (existing, created) = app
        .state
        .auth_service
        .ensure_user(NewUser {
            username: "clerk".into(),
            display_name: "Other".into(),
            email: None,
            role: Role::Admin,
            password: "second-password".into(),
        })
        .await
        .expect("ensure existing user");

    assert!(!created);
    assert_eq!(existing.role, Role::Requester);
    assert_eq!(existing.display_name, "Seeded clerk");
}

#[tokio::test]
async fn me_requires_a_token() {
    let app = TestApp::new().await;
    let (status, _) = app.call(Method::GET, "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn service_endpoints_are_public() {
    let app = TestApp::new().await;

    let (status, body) = app.call(Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["checks"]["database"], "healthy");

    let (status, body) = app.call(Method::GET, "/api/v1/status", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["service"], "maintenance-api");

    let response = app.request(Method::GET, "/", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let (status, doc) = app
        .call(Method::GET, "/api-docs/openapi.json", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/v1/maintenance-requests"].is_object());
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/maintenance-requests", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let header = response
        .headers()
        .get("x-request-id")
        .expect("request id header")
        .to_str()
        .unwrap()
        .to_string();

    let body = common::response_json(response).await;
    assert_eq!(body["request_id"], header.as_str());
}
