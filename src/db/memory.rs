// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory [`UserRepository`] for tests and offline development.

use crate::db::{collections, missing_document, UserRepository};
use crate::error::AppError;
use crate::models::UserProfile;
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Document store held in process memory.
///
/// Listing returns profiles ordered by document ID, like Firestore does for
/// an unfiltered collection.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, UserProfile>,
    /// Other collections only need document IDs (for counts).
    other_documents: DashMap<String, DashSet<String>>,
    offline: AtomicBool,
    list_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with profiles.
    pub fn with_users(users: impl IntoIterator<Item = UserProfile>) -> Self {
        let store = Self::new();
        for user in users {
            store.users.insert(user.id.clone(), user);
        }
        store
    }

    /// Add a document ID to a non-user collection.
    pub fn insert_document(&self, collection: &str, id: &str) {
        self.other_documents
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string());
    }

    /// Make every subsequent operation fail, as a disconnected client would.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of full list reads served so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Database(
                "Database not connected (offline mode)".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>, AppError> {
        self.check_online()?;
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn list_users(&self) -> Result<Vec<UserProfile>, AppError> {
        self.check_online()?;
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let mut users: Vec<UserProfile> = self
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(users)
    }

    async fn set_blocked(&self, id: &str, blocked: bool) -> Result<(), AppError> {
        self.check_online()?;
        let mut entry = self
            .users
            .get_mut(id)
            .ok_or_else(|| missing_document(collections::USERS, id))?;
        entry.blocked = blocked;
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        self.check_online()?;
        self.users
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| missing_document(collections::USERS, id))
    }

    async fn create_placeholder_user(&self, profile: &UserProfile) -> Result<(), AppError> {
        self.check_online()?;
        if profile.id.is_empty() {
            return Err(AppError::BadRequest(
                "Placeholder profile needs a document ID".to_string(),
            ));
        }
        self.users.insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn count_documents(&self, collection: &str) -> Result<usize, AppError> {
        self.check_online()?;
        if collection == collections::USERS {
            return Ok(self.users.len());
        }
        Ok(self
            .other_documents
            .get(collection)
            .map(|ids| ids.len())
            .unwrap_or(0))
    }
}
