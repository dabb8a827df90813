// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in, sign-out and session state routes.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{
    create_jwt, decode_jwt, extract_token, removal_cookie, session_cookie,
};
use crate::services::{IdentityEvent, SessionState, SignInForm};
use crate::views::{self, DashboardView, SessionView};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/session", get(current_session))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct LogoutRequest {
    #[serde(default)]
    confirm: bool,
}

/// Session state as seen by the client.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub state: String,
    pub session: Option<SessionView>,
    /// Sign-in form, present whenever the client is signed out.
    pub form: Option<SignInForm>,
    pub dashboard: Option<DashboardView>,
}

impl SessionResponse {
    fn signed_out(form: SignInForm) -> Self {
        Self {
            state: SessionState::Unauthenticated.name().to_string(),
            session: None,
            form: Some(form),
            dashboard: None,
        }
    }
}

/// Current session, if the request carries a usable token.
async fn current_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Response> {
    let identity = extract_token(&jar, &headers)
        .and_then(|token| decode_jwt(&token, &state.config.jwt_signing_key).ok());
    let Some(identity) = identity else {
        return Ok(Json(SessionResponse::signed_out(SignInForm::default())).into_response());
    };

    let controller = state.session_controller();
    match controller.handle_event(IdentityEvent::SignedIn(identity)).await {
        Ok(Some(session)) => Ok(Json(SessionResponse {
            state: controller.state().name().to_string(),
            session: Some(SessionView::from(&session)),
            form: None,
            dashboard: None,
        })
        .into_response()),
        Ok(None) => Ok(Json(SessionResponse::signed_out(SignInForm::default())).into_response()),
        Err(AppError::ProfileMissing(_)) => Ok((
            jar.add(removal_cookie(&state.config)),
            Json(SessionResponse::signed_out(SignInForm::default())),
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

/// Sign in and return the role-routed dashboard on its default tab.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<Response> {
    let controller = state.session_controller();
    let mut form = SignInForm::default();

    let session = match controller
        .sign_in(&mut form, body.email.trim(), &body.password)
        .await
    {
        Ok(session) => session,
        Err(AppError::AuthenticationFailed) => {
            return Ok((
                StatusCode::UNAUTHORIZED,
                Json(SessionResponse::signed_out(form)),
            )
                .into_response());
        }
        Err(e) => return Err(e),
    };

    let token = create_jwt(&session.identity(), &state.config.jwt_signing_key)?;
    let dashboard = views::mount(&state.users_service, &session, None).await?;

    let response = SessionResponse {
        state: controller.state().name().to_string(),
        session: Some(SessionView::from(&session)),
        form: None,
        dashboard: Some(dashboard),
    };

    Ok((
        jar.add(session_cookie(token, &state.config)),
        Json(response),
    )
        .into_response())
}

/// Confirmed sign-out. Clears the cookie; the controller drops the caller's
/// users snapshot.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(body): Json<LogoutRequest>,
) -> Result<Response> {
    if !body.confirm {
        return Err(AppError::ConfirmationRequired);
    }

    let identity = extract_token(&jar, &headers)
        .and_then(|token| decode_jwt(&token, &state.config.jwt_signing_key).ok());
    if let Some(identity) = identity {
        state
            .session_controller()
            .sign_out(true, &identity.uid)
            .await?;
    }

    Ok((
        jar.add(removal_cookie(&state.config)),
        Json(SessionResponse::signed_out(SignInForm::default())),
    )
        .into_response())
}
