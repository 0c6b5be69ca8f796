//! Shared harness for the HTTP integration tests
//!
//! Each test boots the full application - embedded database on a fresh
//! temp directory, the real middleware chain, the real routers - and
//! drives it through `tower::ServiceExt::oneshot`, no sockets involved.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tabletap_server::{Config, ServerState, api};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestServer {
    pub app: Router,
    pub state: ServerState,
    // Dropping this deletes the database directory
    _work_dir: TempDir,
}

pub async fn spawn() -> TestServer {
    let work_dir = tempfile::tempdir().expect("create temp work dir");
    let config = Config {
        environment: "development".into(),
        http_port: 0,
        work_dir: work_dir.path().display().to_string(),
        log_dir: None,
        jwt_secret: "integration-test-access-secret".into(),
        refresh_token_secret: "integration-test-refresh-secret".into(),
        access_token_ttl_minutes: 15,
        refresh_token_ttl_days: 7,
        cors_origin: None,
    };

    let state = ServerState::initialize(&config)
        .await
        .expect("initialize server state");

    TestServer {
        app: api::build_app(state.clone()),
        state,
        _work_dir: work_dir,
    }
}

impl TestServer {
    /// Dispatch one request; returns the HTTP status and the parsed body
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (u16, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("build request"),
            None => builder.body(Body::empty()).expect("build request"),
        };

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("dispatch request");
        let status = response.status().as_u16();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read response body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is JSON")
        };
        (status, body)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (u16, Value) {
        self.request("GET", path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (u16, Value) {
        self.request("POST", path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> (u16, Value) {
        self.request("PUT", path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (u16, Value) {
        self.request("DELETE", path, token, None).await
    }
}

/// An authenticated principal as the tests see it
pub struct Session {
    pub token: String,
    pub refresh_token: String,
    pub tenant_id: String,
}

/// Register a restaurant and return its owner session
pub async fn register_tenant(server: &TestServer, name: &str, email: &str) -> Session {
    let (status, body) = server
        .post(
            "/api/auth/register",
            None,
            json!({
                "name": name,
                "email": email,
                "password": "Password123",
            }),
        )
        .await;
    assert_eq!(status, 201, "register failed: {body}");

    Session {
        token: string_at(&body["data"]["access_token"]),
        refresh_token: string_at(&body["data"]["refresh_token"]),
        tenant_id: string_at(&body["data"]["restaurant"]["id"]),
    }
}

/// Create a dining table; returns `(table_id, qr_payload)`
pub async fn create_table(server: &TestServer, token: &str, number: u32) -> (String, String) {
    let (status, body) = server
        .post(
            "/api/tables",
            Some(token),
            json!({ "table_number": number, "capacity": 4 }),
        )
        .await;
    assert_eq!(status, 201, "create table failed: {body}");
    (
        string_at(&body["data"]["id"]),
        string_at(&body["data"]["qr_payload"]),
    )
}

/// Create a menu item; returns its id
pub async fn create_menu_item(server: &TestServer, token: &str, name: &str, price: f64) -> String {
    let (status, body) = server
        .post(
            "/api/menu",
            Some(token),
            json!({ "name": name, "price": price }),
        )
        .await;
    assert_eq!(status, 201, "create menu item failed: {body}");
    string_at(&body["data"]["id"])
}

/// Place a customer order through the public endpoint; returns its id
pub async fn place_order(server: &TestServer, qr_payload: &str, items: Value) -> String {
    let (status, body) = server
        .post(
            "/api/orders",
            None,
            json!({ "qr_payload": qr_payload, "items": items }),
        )
        .await;
    assert_eq!(status, 201, "place order failed: {body}");
    string_at(&body["data"]["id"])
}

/// Numeric error code from the `errors` object of a failed envelope
pub fn error_code(body: &Value) -> u64 {
    body["errors"]["code"]
        .as_u64()
        .unwrap_or_else(|| panic!("no error code in body: {body}"))
}

fn string_at(value: &Value) -> String {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected string, got: {value}"))
        .to_string()
}
