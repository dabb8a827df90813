// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper implementing [`UserRepository`].
//!
//! Provides typed operations for:
//! - Users (profile records keyed by identity subject id)
//! - Document counts for dashboard summaries

use crate::db::{collections, missing_document, UserRepository};
use crate::error::AppError;
use crate::models::UserProfile;
use async_trait::async_trait;
use firestore::errors::FirestoreError;
use firestore::{path, paths, FirestoreWritePrecondition};
use serde::{Deserialize, Serialize};

/// Field patch for the blocked flag; written under a field mask.
#[derive(Serialize, Deserialize)]
struct BlockedPatch {
    blocked: bool,
}

/// Result row of a count aggregation.
#[derive(Deserialize)]
struct DocumentCount {
    count: usize,
}

/// Writes guarded by `Exists(true)` fail with NOT_FOUND on a missing document.
fn write_error(err: FirestoreError, collection: &str, id: &str) -> AppError {
    match err {
        FirestoreError::DataNotFoundError(_) => missing_document(collection, id),
        other => AppError::Database(other.to_string()),
    }
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a disconnected client. Every operation returns an error.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Underlying client, for operations outside [`UserRepository`].
    pub fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    async fn write_user(&self, profile: &UserProfile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&profile.id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FirestoreDb {
    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>, AppError> {
        let profile: Option<UserProfile> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // The document ID is not a stored field; make sure it is populated.
        Ok(profile.map(|mut p| {
            if p.id.is_empty() {
                p.id = id.to_string();
            }
            p
        }))
    }

    async fn list_users(&self) -> Result<Vec<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn set_blocked(&self, id: &str, blocked: bool) -> Result<(), AppError> {
        // Only `blocked` is written; the document must already exist.
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(paths!(BlockedPatch::{blocked}))
            .in_col(collections::USERS)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .document_id(id)
            .object(&BlockedPatch { blocked })
            .execute()
            .await
            .map_err(|e| write_error(e, collections::USERS, id))?;

        tracing::debug!(user_id = id, blocked, "Updated blocked flag");
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .precondition(FirestoreWritePrecondition::Exists(true))
            .document_id(id)
            .execute()
            .await
            .map_err(|e| write_error(e, collections::USERS, id))?;

        tracing::debug!(user_id = id, "Deleted user profile");
        Ok(())
    }

    async fn create_placeholder_user(&self, profile: &UserProfile) -> Result<(), AppError> {
        if profile.id.is_empty() {
            return Err(AppError::BadRequest(
                "Placeholder profile needs a document ID".to_string(),
            ));
        }
        self.write_user(profile).await
    }

    async fn count_documents(&self, collection: &str) -> Result<usize, AppError> {
        let rows: Vec<DocumentCount> = self
            .get_client()?
            .fluent()
            .select()
            .from(collection)
            .aggregate(|a| a.fields([a.field(path!(DocumentCount::count)).count()]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows.first().map(|row| row.count).unwrap_or(0))
    }
}
