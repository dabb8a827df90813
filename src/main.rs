// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training Dashboard API Server
//!
//! Signs users in through Firebase Authentication, resolves their profile
//! from Firestore and serves the admin, mentor and intern dashboards.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use training_dashboard::{
    config::Config, db::FirestoreDb, services::FirebaseAuthClient, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Training Dashboard API");

    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    let identity = FirebaseAuthClient::new(&config)?;
    tracing::info!(base_url = %config.identity_base_url, "Identity provider client initialized");

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(db),
        Arc::new(identity),
    ));

    let _identity_listener = state.spawn_identity_listener();
    tracing::info!("Identity event listener started");

    let app = training_dashboard::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("training_dashboard=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
