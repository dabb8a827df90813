// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role-routed dashboard for the signed-in user.

use crate::error::Result;
use crate::models::Session;
use crate::views::{self, DashboardView};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Dashboard routes (require authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/dashboard", get(get_dashboard))
}

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    /// Tab id; the role's default tab when absent.
    pub tab: Option<String>,
}

/// Mount the dashboard for the session's role on the requested tab.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardView>> {
    let view = views::mount(&state.users_service, &session, params.tab.as_deref()).await?;
    Ok(Json(view))
}
