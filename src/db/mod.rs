//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

use crate::error::AppError;
use crate::models::{NewUser, UserRecord, UserUpdate};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
}

/// Document store operations over the `users` collection.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All user documents, in store order.
    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError>;

    /// A single user document by its document id.
    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, AppError>;

    /// Create a document with a store-assigned id.
    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, AppError>;

    /// Overwrite `name` and `email` of an existing document.
    async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<(), AppError>;

    /// Remove a document. Deleting a missing document is not an error.
    async fn delete_user(&self, id: &str) -> Result<(), AppError>;
}
