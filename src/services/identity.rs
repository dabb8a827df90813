// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider clients.
//!
//! Handles:
//! - Email/password sign-in (Firebase Auth REST API)
//! - Sign-out
//! - Broadcasting session-change events to subscribers

use crate::config::Config;
use crate::error::AppError;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Identity established by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Provider subject id (`localId` in Firebase)
    pub uid: String,
    pub email: String,
}

/// Session-change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    /// An identity is present (after sign-in).
    SignedIn(Identity),
    /// No identity (after sign-out).
    SignedOut { uid: String },
}

/// Operations consumed from the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify credentials. Any failure maps to `AppError::AuthenticationFailed`.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AppError>;

    /// End the session for `uid`. Never fails.
    async fn sign_out(&self, uid: &str);

    /// Subscribe to session-change events.
    fn subscribe(&self) -> broadcast::Receiver<IdentityEvent>;
}

fn publish(events: &broadcast::Sender<IdentityEvent>, event: IdentityEvent) {
    // No subscribers is normal for request-scoped use.
    let _ = events.send(event);
}

// ─────────────────────────────────────────────────────────────────────────────
// Firebase Auth REST client
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: String,
}

#[derive(Debug, Deserialize)]
struct FirebaseErrorBody {
    error: FirebaseErrorDetail,
}

#[derive(Debug, Deserialize)]
struct FirebaseErrorDetail {
    message: String,
}

/// Firebase Authentication client (`accounts:signInWithPassword`).
///
/// ID tokens are not kept: the server issues its own session token once the
/// profile has been resolved, so sign-out only needs to notify subscribers.
pub struct FirebaseAuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    events: broadcast::Sender<IdentityEvent>,
}

impl FirebaseAuthClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            http,
            base_url: config.identity_base_url.clone(),
            api_key: config.firebase_api_key.clone(),
            events,
        })
    }

    async fn request_sign_in(&self, email: &str, password: &str) -> Result<Identity, String> {
        let url = format!("{}/v1/accounts:signInWithPassword", self.base_url);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&SignInRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let reason = response
                .json::<FirebaseErrorBody>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(reason);
        }

        let body: SignInResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed response: {}", e))?;

        Ok(Identity {
            uid: body.local_id,
            email: body.email,
        })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        match self.request_sign_in(email, password).await {
            Ok(identity) => {
                tracing::info!(uid = %identity.uid, "Identity provider sign-in succeeded");
                publish(&self.events, IdentityEvent::SignedIn(identity.clone()));
                Ok(identity)
            }
            Err(reason) => {
                // The reason stays in the logs; callers see one generic failure.
                tracing::warn!(reason = %reason, "Identity provider sign-in failed");
                Err(AppError::AuthenticationFailed)
            }
        }
    }

    async fn sign_out(&self, uid: &str) {
        tracing::info!(uid, "Signing out");
        publish(
            &self.events,
            IdentityEvent::SignedOut {
                uid: uid.to_string(),
            },
        );
    }

    fn subscribe(&self) -> broadcast::Receiver<IdentityEvent> {
        self.events.subscribe()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory provider
// ─────────────────────────────────────────────────────────────────────────────

struct Account {
    uid: String,
    password: String,
}

/// Identity provider backed by a fixed account table.
pub struct MemoryIdentityProvider {
    accounts: DashMap<String, Account>,
    events: broadcast::Sender<IdentityEvent>,
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            accounts: DashMap::new(),
            events,
        }
    }
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account. Emails are matched case-insensitively.
    pub fn add_account(&self, uid: &str, email: &str, password: &str) {
        self.accounts.insert(
            email.to_lowercase(),
            Account {
                uid: uid.to_string(),
                password: password.to_string(),
            },
        );
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let identity = self
            .accounts
            .get(&email.to_lowercase())
            .filter(|account| account.password == password)
            .map(|account| Identity {
                uid: account.uid.clone(),
                email: email.to_string(),
            })
            .ok_or(AppError::AuthenticationFailed)?;

        publish(&self.events, IdentityEvent::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self, uid: &str) {
        publish(
            &self.events,
            IdentityEvent::SignedOut {
                uid: uid.to_string(),
            },
        );
    }

    fn subscribe(&self) -> broadcast::Receiver<IdentityEvent> {
        self.events.subscribe()
    }
}
