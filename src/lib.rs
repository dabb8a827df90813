// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training platform dashboard backend.
//!
//! Authenticates users against a hosted identity provider, resolves their
//! profile from Firestore and serves role-specific dashboards (admin,
//! mentor, intern) as typed view-models.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod views;

use config::Config;
use db::UserRepository;
use services::{IdentityProvider, SessionController, UsersService};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn UserRepository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub users_service: Arc<UsersService>,
    /// Process-wide controller following the identity provider's events.
    pub session_listener: Arc<SessionController>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn UserRepository>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let users_service = Arc::new(UsersService::new(store.clone()));
        let session_listener = Arc::new(
            SessionController::new(store.clone(), identity.clone())
                .with_users_service(users_service.clone()),
        );
        Self {
            config,
            store,
            identity,
            users_service,
            session_listener,
        }
    }

    /// Session controller for a single client interaction.
    pub fn session_controller(&self) -> SessionController {
        SessionController::new(self.store.clone(), self.identity.clone())
            .with_users_service(self.users_service.clone())
    }

    /// Subscribe the process-wide controller to identity events. Call once
    /// at startup.
    pub fn spawn_identity_listener(&self) -> JoinHandle<()> {
        self.session_listener.clone().spawn_listener()
    }
}
