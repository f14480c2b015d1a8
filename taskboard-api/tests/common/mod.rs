/// Common test utilities for the API integration tests
///
/// Provides a test context wrapping the full router over a real database,
/// plus helpers for registering users and issuing authenticated requests.
///
/// Requires DATABASE_URL and JWT_SECRET in the environment.

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use tower::ServiceExt;
use uuid::Uuid;

/// Test context containing the router and its backing resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

/// A registered test user with their auth token
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

impl TestContext {
    /// Creates a new test context against the configured database
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;
        taskboard_shared::db::migrations::run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(Self { db, app })
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("Router should respond")
    }

    /// Sends a JSON request and returns (status, parsed body)
    pub async fn request_json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.send(request).await;
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Body should read");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Body should be JSON")
        };

        (status, value)
    }

    /// Registers a user through the API and returns their id and token
    pub async fn register_user(&self, role: &str) -> TestUser {
        let username = format!("user-{}", Uuid::new_v4().simple());

        let (status, body) = self
            .request_json(
                "POST",
                "/api/users/register",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "password": "integration-test-pw",
                    "role": role,
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "Registration failed: {}", body);

        TestUser {
            id: body["user"]["id"]
                .as_str()
                .expect("Response should carry the user id")
                .parse()
                .unwrap(),
            username,
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a team through the API, returning its id
    pub async fn create_team(&self, owner: &TestUser) -> Uuid {
        let (status, body) = self
            .request_json(
                "POST",
                "/api/teams",
                Some(&owner.token),
                Some(serde_json::json!({
                    "name": format!("team-{}", Uuid::new_v4().simple()),
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "Team creation failed: {}", body);
        body["id"].as_str().unwrap().parse().unwrap()
    }

    /// Creates a task through the API, returning its id
    pub async fn create_task(&self, creator: &TestUser, team_id: Uuid) -> Uuid {
        let (status, body) = self
            .request_json(
                "POST",
                "/api/tasks",
                Some(&creator.token),
                Some(serde_json::json!({
                    "title": "Fix bug",
                    "due_time": "2026-12-24T10:00:00Z",
                    "team_id": team_id,
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "Task creation failed: {}", body);
        body["id"].as_str().unwrap().parse().unwrap()
    }
}
