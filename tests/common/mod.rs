// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
};
use std::sync::Arc;
use training_dashboard::config::Config;
use training_dashboard::db::{FirestoreDb, MemoryStore};
use training_dashboard::middleware::auth::{create_jwt, SESSION_COOKIE};
use training_dashboard::models::{Role, UserProfile};
use training_dashboard::routes::create_router;
use training_dashboard::services::{Identity, MemoryIdentityProvider};
use training_dashboard::AppState;

pub const PASSWORD: &str = "secret123";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

#[allow(dead_code)]
pub fn profile(id: &str, name: &str, email: &str, role: Role) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        blocked: false,
        created_at: None,
    }
}

/// Seeded fixture shared by the HTTP tests.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
    pub identity: Arc<MemoryIdentityProvider>,
}

#[allow(dead_code)]
impl TestApp {
    /// Session token for an identity, as issued at sign-in.
    pub fn token_for(&self, uid: &str, email: &str) -> String {
        let identity = Identity {
            uid: uid.to_string(),
            email: email.to_string(),
        };
        create_jwt(&identity, &self.state.config.jwt_signing_key).unwrap()
    }

    pub fn cookie_for(&self, uid: &str, email: &str) -> String {
        format!("{}={}", SESSION_COOKIE, self.token_for(uid, email))
    }

    pub fn admin_cookie(&self) -> String {
        self.cookie_for("uid-ivan", "ivan@company.com")
    }

    pub fn intern_cookie(&self) -> String {
        self.cookie_for("uid-maria", "maria@company.com")
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        use tower::ServiceExt;
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// Admin Ivan, mentor Olga and intern Maria, each with an identity account;
/// `uid-ghost` has an account but no profile.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with_frontend_url("http://localhost:5173")
}

#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> TestApp {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();

    let store = Arc::new(MemoryStore::with_users([
        profile("uid-ivan", "Иван Иванов", "ivan@company.com", Role::Admin),
        profile("uid-olga", "Ольга Смирнова", "olga@company.com", Role::Mentor),
        profile("uid-maria", "Мария Сидорова", "maria@company.com", Role::Intern),
    ]));
    store.insert_document("courses", "js-basics");
    store.insert_document("courses", "ui-ux");

    let identity = Arc::new(MemoryIdentityProvider::new());
    identity.add_account("uid-ivan", "ivan@company.com", PASSWORD);
    identity.add_account("uid-olga", "olga@company.com", PASSWORD);
    identity.add_account("uid-maria", "maria@company.com", PASSWORD);
    identity.add_account("uid-ghost", "ghost@company.com", PASSWORD);

    let state = Arc::new(AppState::new(config, store.clone(), identity.clone()));

    TestApp {
        router: create_router(state.clone()),
        state,
        store,
        identity,
    }
}

/// JSON request with an optional session cookie.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[allow(dead_code)]
pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}
