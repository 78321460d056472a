#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use maintenance_api::{
    auth::{user, Role},
    config::AppConfig,
    db,
    events,
    AppState,
};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str =
    "k3P9vQx7LmZ2rT8wYb4NcJ6hFd1sGa5eUo0iKqXzVyWlRtMnBpCfDgHjAsEuIoPq";

/// A seeded account and a token issued for it
pub struct TestUser {
    pub model: user::Model,
    pub token: String,
}

/// Helper harness for spinning up the full router backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub requester: TestUser,
    pub maintenance: TestUser,
    pub admin: TestUser,
    _event_task: tokio::task::JoinHandle<()>,
    _db_dir: Option<TempDir>,
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::new(
        "sqlite::memory:".to_string(),
        TEST_JWT_SECRET.to_string(),
        "127.0.0.1".to_string(),
        18_080,
        "test".to_string(),
    );
    // A single connection keeps every query on the same in-memory database.
    cfg.db_max_connections = 1;
    cfg.db_min_connections = 1;
    cfg.db_idle_timeout_secs = 3_600;
    cfg.cors_allow_any_origin = true;
    cfg
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::with_config(test_config(), None).await
    }

    /// Backed by a SQLite file with a multi-connection pool, so concurrent
    /// requests really run on separate connections.
    pub async fn file_backed() -> Self {
        let dir = TempDir::new().expect("temp dir for test database");
        let mut cfg = test_config();
        cfg.database_url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("maintenance.db").display()
        );
        cfg.db_max_connections = 4;
        cfg.db_min_connections = 2;
        Self::with_config(cfg, Some(dir)).await
    }

    async fn with_config(cfg: AppConfig, db_dir: Option<TempDir>) -> Self {
        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_sender, event_rx) = events::channel(cfg.event_channel_capacity);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = AppState::new(db_arc, cfg, Arc::new(event_sender));
        let router = maintenance_api::build_router(state.clone()).expect("router builds");

        let requester = Self::seed_user(&state, "requester", Role::Requester).await;
        let maintenance = Self::seed_user(&state, "maintenance", Role::Maintenance).await;
        let admin = Self::seed_user(&state, "admin", Role::Admin).await;

        Self {
            router,
            state,
            requester,
            maintenance,
            admin,
            _event_task: event_task,
            _db_dir: db_dir,
        }
    }

    /// Inserts a user directly, skipping password hashing, and issues a token for it.
    async fn seed_user(state: &AppState, username: &str, role: Role) -> TestUser {
        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            display_name: Set(format!("Test {}", username)),
            email: Set(None),
            password_hash: Set("not-a-phc-string".to_string()),
            role: Set(role),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(state.db.as_ref())
        .await
        .expect("seed test user");

        let token = state
            .auth_service
            .generate_token(&model)
            .expect("issue test token")
            .access_token;

        TestUser { model, token }
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Send an unparsed JSON body, for malformed-input cases.
    pub async fn raw(&self, method: Method, uri: &str, body: &str, token: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {}", token))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Like [`request`](Self::request) but returns the status and parsed JSON body.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let response = self.request(method, uri, body, token).await;
        let status = response.status();
        (status, response_json(response).await)
    }

    /// Opens a request as the seeded requester and returns its id.
    pub async fn open_request(&self, department: &str) -> i64 {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/maintenance-requests",
                Some(intake_payload(department)),
                Some(&self.requester.token),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body["data"]["id"].as_i64().expect("created id")
    }

    pub async fn start(&self, id: i64, body: Option<Value>) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            &format!("/api/v1/maintenance-requests/{}/start", id),
            body,
            Some(&self.maintenance.token),
        )
        .await
    }

    pub async fn finish(&self, id: i64, body: Option<Value>) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            &format!("/api/v1/maintenance-requests/{}/finish", id),
            body,
            Some(&self.maintenance.token),
        )
        .await
    }

    pub async fn fetch(&self, id: i64) -> (StatusCode, Value) {
        self.call(
            Method::GET,
            &format!("/api/v1/maintenance-requests/{}", id),
            None,
            Some(&self.requester.token),
        )
        .await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

pub fn intake_payload(department: &str) -> Value {
    json!({
        "requester_name": "Dana Ortiz",
        "department": department,
        "maintenance_type": "mechanical",
        "equipment_status": "inoperative",
        "equipment_location_press": "Press A",
        "equipment_location_press_number": "3",
        "problem_description": "Hydraulic line leaking under the ram"
    })
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("json response")
}
