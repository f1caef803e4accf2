//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use cherry_api::{AppState, build_app};
use cherry_auth::PasswordHasher;
use cherry_core::config::AppConfig;
use cherry_database::Stores;
use cherry_entity::user::{NewUser, User, UserRole};
use cherry_service::mail::MemoryMailer;

/// Default password for accounts created by [`TestApp::create_user`].
pub const PASSWORD: &str = "secret123";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Stores behind the router, for direct setup and inspection
    pub stores: Stores,
    /// Captures outgoing mail
    pub mailer: Arc<MemoryMailer>,
    /// Application config
    pub config: AppConfig,
    /// Avatar storage root, removed on drop
    pub uploads: TempDir,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let uploads = tempfile::tempdir().expect("Failed to create upload dir");
        let mut config = AppConfig::from_file("tests/fixtures/test_config.toml")
            .expect("Failed to load test config");
        config.storage.local.root_path = uploads.path().to_string_lossy().into_owned();

        let stores = Stores::memory();
        let mailer = Arc::new(MemoryMailer::new());
        let state = AppState::new(config.clone(), stores.clone(), mailer.clone())
            .await
            .expect("Failed to build app state");

        Self {
            router: build_app(state),
            stores,
            mailer,
            config,
            uploads,
        }
    }

    /// Full path for a route under the API prefix.
    pub fn api(&self, path: &str) -> String {
        format!("{}{}", self.config.server.api_prefix, path)
    }

    /// Insert an account directly into the store.
    pub async fn create_user(&self, email: &str, role: UserRole) -> User {
        let name = email.split('@').next().unwrap_or(email).to_string();
        self.stores
            .users
            .create(&NewUser {
                email: email.to_string(),
                password_hash: PasswordHasher::new()
                    .hash_password(PASSWORD)
                    .expect("Failed to hash password"),
                name,
                role,
            })
            .await
            .expect("Failed to create test user")
    }

    /// Create an account and sign in, returning the user and bearer token.
    pub async fn signed_in(&self, email: &str, role: UserRole) -> (User, String) {
        let user = self.create_user(email, role).await;
        let token = self.login(email, PASSWORD).await;
        (user, token)
    }

    /// Sign in and return the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                &self.api("/auth/login"),
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
        response.body["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    /// Raw reset token from the most recent reset email sent to `email`.
    pub async fn reset_token_for(&self, email: &str) -> String {
        let message = self
            .mailer
            .last_to(email)
            .await
            .expect("No reset email was sent");
        let (_, rest) = message
            .text
            .split_once("/auth/reset-password/")
            .expect("Reset email has no link");
        rest.split_whitespace()
            .next()
            .expect("Reset link has no token")
            .to_string()
    }

    /// Send a JSON request.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let body = match body {
            Some(b) => {
                req = req.header("Content-Type", "application/json");
                Body::from(serde_json::to_string(&b).expect("Failed to serialize body"))
            }
            None => Body::empty(),
        };

        self.send(req.body(body).expect("Failed to build request"))
            .await
    }

    /// Send a multipart upload with a single file field.
    pub async fn upload(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
        token: &str,
    ) -> TestResponse {
        let boundary = "cherry-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header("Authorization", format!("Bearer {}", token))
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 4 * 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            raw: body_bytes.to_vec(),
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body, `Null` when empty or not JSON
    pub body: Value,
    /// Raw body bytes
    pub raw: Vec<u8>,
}

impl TestResponse {
    /// The `message` of an envelope.
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}
