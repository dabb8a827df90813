// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token middleware.
//!
//! The token only carries the identity. The profile is resolved again on
//! every request, so deleting a profile ends its session on the next call.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Role, Session};
use crate::services::{Identity, IdentityEvent};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const SESSION_COOKIE: &str = "training_session";
const SESSION_DAYS: i64 = 7;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (identity provider uid)
    pub sub: String,
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Create a JWT for a user session.
pub fn create_jwt(identity: &Identity, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: identity.uid.clone(),
        email: identity.email.clone(),
        iat: now,
        exp: now + (SESSION_DAYS as usize) * 24 * 60 * 60,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Decode and validate a session JWT.
pub fn decode_jwt(token: &str, signing_key: &[u8]) -> Result<Identity, AppError> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|_| AppError::InvalidToken)?;

    Ok(Identity {
        uid: token_data.claims.sub,
        email: token_data.claims.email,
    })
}

/// Session token from the cookie, falling back to a `Bearer` header.
pub fn extract_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Cookie carrying a fresh session token.
pub fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies())
        .max_age(time::Duration::days(SESSION_DAYS))
        .build()
}

/// Removal cookie; attributes must match [`session_cookie`].
pub fn removal_cookie(config: &Config) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies())
        .max_age(time::Duration::ZERO)
        .build()
}

/// Middleware that requires a valid session token and an existing profile.
///
/// Inserts the resolved [`Session`] into request extensions.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_token(&jar, request.headers()) else {
        return AppError::Unauthorized.into_response();
    };

    let identity = match decode_jwt(&token, &state.config.jwt_signing_key) {
        Ok(identity) => identity,
        Err(e) => return e.into_response(),
    };

    let controller = state.session_controller();
    match controller.handle_event(IdentityEvent::SignedIn(identity)).await {
        Ok(Some(session)) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Ok(None) => AppError::Unauthorized.into_response(),
        Err(e @ AppError::ProfileMissing(_)) => {
            // Forced sign-out: the token is useless without a profile.
            (jar.add(removal_cookie(&state.config)), e).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Route layer for admin-only routes; runs after [`require_auth`].
pub async fn require_admin(
    Extension(session): Extension<Session>,
    request: Request,
    next: Next,
) -> Response {
    if session.role != Role::Admin {
        tracing::warn!(uid = %session.uid, role = session.role.as_str(), "Blocked non-admin request");
        return AppError::Forbidden("Administrator role required".to_string()).into_response();
    }
    next.run(request).await
}
