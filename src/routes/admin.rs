// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Administrator user management routes.
//!
//! Every write answers with a message and the users panel re-read from the
//! store, so the table always shows the last successful write.

use crate::error::{AppError, Result};
use crate::models::Session;
use crate::services::users::{NewUserForm, PLACEHOLDER_WARNING};
use crate::views::admin::{
    self, block_result_message, edit_acknowledgement, DELETED_MESSAGE, PLACEHOLDER_SAVED_MESSAGE,
};
use crate::views::modal::add_user_modal;
use crate::views::{Modal, Panel};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Admin routes. Both auth layers are applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/users", get(users_tab).post(create_user))
        .route("/api/admin/users/search", get(search_users))
        .route("/api/admin/users/new", get(new_user_modal))
        .route("/api/admin/users/{id}", delete(delete_user))
        .route("/api/admin/users/{id}/block", post(set_blocked))
        .route("/api/admin/users/{id}/edit", post(edit_user))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct BlockRequest {
    pub blocked: bool,
    #[serde(default)]
    pub confirm: bool,
}

/// Confirmation for delete, accepted as a JSON body or as `?confirm=true`.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub confirm: bool,
}

/// Outcome of an admin action.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AdminActionResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Re-rendered users panel; absent for actions that change nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel: Option<Panel>,
}

/// Users tab: fresh list read, rebuilds the caller's search snapshot.
async fn users_tab(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Json<Panel> {
    Json(admin::load_users_panel(&state.users_service, &session.uid).await)
}

/// Filter the snapshot from the last users-tab load. Never reads the store.
async fn search_users(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Panel>> {
    let users = state.users_service.search(&session.uid, &params.q)?;
    Ok(Json(admin::users_panel(&users)))
}

async fn new_user_modal() -> Json<Modal> {
    Json(add_user_modal())
}

/// Save a profile-only placeholder; no identity account is created.
async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(form): Json<NewUserForm>,
) -> Result<Json<AdminActionResponse>> {
    state
        .users_service
        .create_placeholder_user(&session.uid, &form, Utc::now())
        .await?;

    Ok(Json(AdminActionResponse {
        message: PLACEHOLDER_SAVED_MESSAGE.to_string(),
        warning: Some(PLACEHOLDER_WARNING.to_string()),
        panel: Some(admin::load_users_panel(&state.users_service, &session.uid).await),
    }))
}

async fn set_blocked(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(body): Json<BlockRequest>,
) -> Result<Json<AdminActionResponse>> {
    if !body.confirm {
        return Err(AppError::ConfirmationRequired);
    }

    state
        .users_service
        .set_blocked(&session.uid, &id, body.blocked)
        .await?;

    Ok(Json(AdminActionResponse {
        message: block_result_message(body.blocked),
        warning: None,
        panel: Some(admin::load_users_panel(&state.users_service, &session.uid).await),
    }))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Query(params): Query<ConfirmRequest>,
    body: Option<Json<ConfirmRequest>>,
) -> Result<Json<AdminActionResponse>> {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    if !(params.confirm || body.confirm) {
        return Err(AppError::ConfirmationRequired);
    }

    state.users_service.delete_user(&session.uid, &id).await?;

    Ok(Json(AdminActionResponse {
        message: DELETED_MESSAGE.to_string(),
        warning: None,
        panel: Some(admin::load_users_panel(&state.users_service, &session.uid).await),
    }))
}

/// Editing is not implemented; the action is only acknowledged.
async fn edit_user(Path(id): Path<String>) -> Json<AdminActionResponse> {
    Json(AdminActionResponse {
        message: edit_acknowledgement(&id),
        warning: None,
        panel: None,
    })
}
