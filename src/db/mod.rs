//! Document store layer (Firestore, plus an in-memory store for tests and
//! offline development).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::UserProfile;
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const COURSES: &str = "courses";
}

/// Narrow repository over the `users` collection.
///
/// Writes are intents: callers only learn whether the call succeeded.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a profile by document ID.
    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>, AppError>;

    /// List every profile in the collection.
    async fn list_users(&self) -> Result<Vec<UserProfile>, AppError>;

    /// Write `blocked` on an existing profile. Fails if the document is missing.
    async fn set_blocked(&self, id: &str, blocked: bool) -> Result<(), AppError>;

    /// Delete an existing profile. Fails if the document is missing.
    async fn delete_user(&self, id: &str) -> Result<(), AppError>;

    /// Create (or replace) a profile under `profile.id` without touching the
    /// identity provider.
    async fn create_placeholder_user(&self, profile: &UserProfile) -> Result<(), AppError>;

    /// Number of documents in a collection.
    async fn count_documents(&self, collection: &str) -> Result<usize, AppError>;
}

pub(crate) fn missing_document(collection: &str, id: &str) -> AppError {
    AppError::Database(format!("No document to update: {}/{}", collection, id))
}
