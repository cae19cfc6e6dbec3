#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use canvas_server::core::{AppState, ServerConfig};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "Str0ng!pw";
pub const SECRET: &str = "integration-secret";

pub struct TestApp {
    _dir: TempDir,
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = ServerConfig::with_base_dir(dir.path(), SECRET);
        // Cheap hashes keep the suite fast
        config.hash_cost = 4;

        let state = canvas_server::build_state(config).await.unwrap();
        let router = canvas_server::app(state.clone());

        Self {
            _dir: dir,
            router,
            state,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, body)
    }

    pub async fn register(&self, name: &str, email: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/users/register",
                None,
                Some(json!({"name": name, "email": email, "password": PASSWORD})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register {email}: {body}");
        body
    }

    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/users/login",
                None,
                Some(json!({"email": email, "password": PASSWORD})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login {email}: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn signed_in(&self, name: &str, email: &str) -> String {
        self.register(name, email).await;
        self.login(email).await
    }
}
