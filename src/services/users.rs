// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User administration: users-tab snapshots and admin write actions.
//!
//! Each admin gets a process-local snapshot of the `users` collection that is
//! rebuilt on every users-tab visit and only used for search. Loads are
//! numbered; a slow load never replaces the snapshot of a newer one.

use crate::db::{collections, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{Role, UserProfile};
use crate::time_utils::{format_utc_rfc3339, placeholder_user_id};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use validator::Validate;

/// Warning returned with every placeholder profile.
pub const PLACEHOLDER_WARNING: &str = "⚠️ Создание учётных записей из панели администратора отключено: \
     регистрация в сервисе аутентификации должна выполняться привилегированной серверной функцией \
     или через консоль Firebase. Сохранён только профиль в базе данных, войти под ним нельзя.";

/// Average progress shown on the admin header; there is no real calculation.
pub const PLACEHOLDER_AVERAGE_PROGRESS: &str = "78%";

/// Case-insensitive substring match over name and email.
///
/// An empty query matches everything.
pub fn filter_users(users: &[UserProfile], query: &str) -> Vec<UserProfile> {
    let query = query.trim().to_lowercase();
    users
        .iter()
        .filter(|user| {
            user.name.to_lowercase().contains(&query) || user.email.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

/// Handle for one users-tab load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Default)]
struct CacheSlot {
    latest_load: u64,
    snapshot: Option<Vec<UserProfile>>,
}

/// Per-admin users snapshots with latest-load-wins installation.
#[derive(Default)]
pub struct UsersCache {
    slots: DashMap<String, CacheSlot>,
    next_load: AtomicU64,
}

impl UsersCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new load for `owner`; any earlier load becomes stale.
    pub fn begin_load(&self, owner: &str) -> LoadTicket {
        let id = self.next_load.fetch_add(1, Ordering::SeqCst) + 1;
        self.slots.entry(owner.to_string()).or_default().latest_load = id;
        LoadTicket(id)
    }

    /// Install a snapshot if `ticket` is still the latest load for `owner`.
    pub fn install(&self, owner: &str, ticket: LoadTicket, users: Vec<UserProfile>) -> bool {
        match self.slots.get_mut(owner) {
            Some(mut slot) if slot.latest_load == ticket.0 => {
                slot.snapshot = Some(users);
                true
            }
            _ => false,
        }
    }

    pub fn snapshot(&self, owner: &str) -> Option<Vec<UserProfile>> {
        self.slots.get(owner).and_then(|slot| slot.snapshot.clone())
    }

    /// Drop the snapshot of an admin who signed out.
    pub fn clear(&self, owner: &str) {
        self.slots.remove(owner);
    }
}

/// Add-user form submission.
///
/// The password is validated like the form requires but never used: no
/// identity-provider account is created.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUserForm {
    #[validate(length(min = 1, message = "Имя обязательно"))]
    pub name: String,
    #[validate(email(message = "Некорректный email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Минимум 6 символов"))]
    pub password: String,
    pub role: Role,
}

impl NewUserForm {
    /// Copy with surrounding whitespace removed from name and email.
    fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self.clone()
        }
    }
}

/// Document counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminCounts {
    pub users: usize,
    pub courses: usize,
}

/// User administration operations over a [`UserRepository`].
pub struct UsersService {
    store: Arc<dyn UserRepository>,
    cache: UsersCache,
}

impl UsersService {
    pub fn new(store: Arc<dyn UserRepository>) -> Self {
        Self {
            store,
            cache: UsersCache::new(),
        }
    }

    pub fn cache(&self) -> &UsersCache {
        &self.cache
    }

    /// Full list read for the users tab; rebuilds `owner`'s snapshot.
    pub async fn load_users_tab(&self, owner: &str) -> Result<Vec<UserProfile>> {
        let ticket = self.cache.begin_load(owner);
        let users = self.store.list_users().await?;

        if !self.cache.install(owner, ticket, users.clone()) {
            tracing::debug!(owner, "Discarding stale users snapshot");
        }
        Ok(users)
    }

    /// Filter `owner`'s cached snapshot without touching the store.
    pub fn search(&self, owner: &str, query: &str) -> Result<Vec<UserProfile>> {
        let snapshot = self.cache.snapshot(owner).ok_or_else(|| {
            AppError::BadRequest("Users tab has not been loaded".to_string())
        })?;
        Ok(filter_users(&snapshot, query))
    }

    /// Set the blocked flag of a profile.
    pub async fn set_blocked(&self, actor: &str, id: &str, blocked: bool) -> Result<()> {
        self.store.set_blocked(id, blocked).await?;
        tracing::info!(actor, user_id = id, blocked, "User block state changed");
        Ok(())
    }

    pub async fn delete_user(&self, actor: &str, id: &str) -> Result<()> {
        self.store.delete_user(id).await?;
        tracing::info!(actor, user_id = id, "User deleted");
        Ok(())
    }

    /// Write a placeholder profile for the submitted form.
    pub async fn create_placeholder_user(
        &self,
        actor: &str,
        form: &NewUserForm,
        now: DateTime<Utc>,
    ) -> Result<UserProfile> {
        let form = form.trimmed();
        form.validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if !form.role.is_recognized() {
            return Err(AppError::BadRequest(format!(
                "Unknown role: {}",
                form.role.as_str()
            )));
        }

        let profile = UserProfile {
            id: placeholder_user_id(now),
            name: form.name,
            email: form.email,
            role: form.role,
            blocked: false,
            created_at: Some(format_utc_rfc3339(now)),
        };
        self.store.create_placeholder_user(&profile).await?;

        tracing::warn!(
            actor,
            user_id = %profile.id,
            role = profile.role.as_str(),
            "Placeholder profile created without an identity account"
        );
        Ok(profile)
    }

    /// Counts of users and courses.
    pub async fn counts(&self) -> Result<AdminCounts> {
        let (users, courses) = tokio::try_join!(
            self.store.count_documents(collections::USERS),
            self.store.count_documents(collections::COURSES),
        )?;
        Ok(AdminCounts { users, courses })
    }
}
