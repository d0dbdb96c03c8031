// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User directory: keeps identities and user documents in step.
//!
//! Every user has a document in the `users` collection and an identity in
//! the identity service, linked through `uid`. Writes are sequenced so the
//! identity exists before its document, and the document is gone only after
//! its identity is.

use crate::db::UserStore;
use crate::error::AppError;
use crate::models::{CreateUserRequest, NewUser, UpdateUserRequest, UserRow, UserUpdate};
use crate::services::identity::{IdentityError, IdentityProvider, IdentityUpdate};
use std::sync::Arc;
use validator::Validate;

/// Create/update/delete across the identity service and the document store.
#[derive(Clone)]
pub struct UserDirectory {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn UserStore>,
}

impl UserDirectory {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn UserStore>) -> Self {
        Self { identity, store }
    }

    /// All users, in store order.
    pub async fn list(&self) -> Result<Vec<UserRow>, AppError> {
        let records = self.store.list_users().await?;
        Ok(records.iter().filter_map(|r| r.to_row()).collect())
    }

    /// Create the identity, then the document.
    ///
    /// If the document cannot be written the identity is deleted again so no
    /// orphaned login remains.
    pub async fn create(&self, request: &CreateUserRequest) -> Result<UserRow, AppError> {
        request.validate()?;

        let uid = self
            .identity
            .create_identity(&request.email, &request.password)
            .await?;

        let new_user = NewUser {
            name: request.name.clone(),
            email: request.email.clone(),
            uid: uid.clone(),
        };

        let record = match self.store.create_user(&new_user).await {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(uid = %uid, error = %err, "User document create failed, rolling back identity");
                self.roll_back_identity(&uid).await;
                return Err(err);
            }
        };

        let row = record.to_row().ok_or_else(|| {
            AppError::Database("Created user document has no id".to_string())
        })?;

        tracing::info!(id = %row.id, uid = %uid, "User created");
        Ok(row)
    }

    async fn roll_back_identity(&self, uid: &str) {
        match self.identity.delete_identity(uid).await {
            Ok(()) | Err(IdentityError::NotFound(_)) => {
                tracing::info!(uid, "Rolled back identity after failed create");
            }
            Err(err) => {
                tracing::error!(uid, error = %err, "Orphaned identity: rollback failed");
            }
        }
    }

    /// Edit name/email. A new password goes to the identity, never the store.
    ///
    /// The document is written first. If the identity then rejects the change,
    /// the document gets its previous name and email back.
    pub async fn update(&self, id: &str, request: &UpdateUserRequest) -> Result<UserRow, AppError> {
        request.validate()?;

        let existing = self
            .store
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found: {}", id)))?;

        let identity_update = IdentityUpdate {
            email: (existing.email != request.email).then(|| request.email.clone()),
            password: request.new_password().map(str::to_string),
        };

        if existing.uid.is_empty() && identity_update.password.is_some() {
            return Err(AppError::BadRequest(
                "User has no linked identity; password cannot be changed".to_string(),
            ));
        }

        let update = UserUpdate {
            name: request.name.clone(),
            email: request.email.clone(),
        };
        self.store.update_user(id, &update).await?;

        if !identity_update.is_empty() {
            if existing.uid.is_empty() {
                tracing::warn!(id, "User has no linked identity, updated document only");
            } else if let Err(err) = self
                .identity
                .update_identity(&existing.uid, &identity_update)
                .await
            {
                tracing::warn!(id, uid = %existing.uid, error = %err, "Identity update failed, restoring document");
                let previous = UserUpdate {
                    name: existing.name.clone(),
                    email: existing.email.clone(),
                };
                self.restore_document(id, &previous).await;
                return Err(err.into());
            }
        }

        tracing::info!(id, "User updated");
        Ok(UserRow {
            id: id.to_string(),
            name: update.name,
            email: update.email,
        })
    }

    async fn restore_document(&self, id: &str, previous: &UserUpdate) {
        match self.store.update_user(id, previous).await {
            Ok(()) => tracing::info!(id, "Restored user document after failed identity update"),
            Err(err) => {
                tracing::error!(id, error = %err, "User document out of step with identity: restore failed");
            }
        }
    }

    /// Remove the identity, then the document.
    ///
    /// An identity that is already gone does not block removing the document.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let record = self
            .store
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found: {}", id)))?;

        if record.uid.is_empty() {
            tracing::warn!(id, "User has no linked identity");
        } else {
            match self.identity.delete_identity(&record.uid).await {
                Ok(()) => {}
                Err(IdentityError::NotFound(_)) => {
                    tracing::warn!(id, uid = %record.uid, "Identity already deleted");
                }
                Err(err) => return Err(err.into()),
            }
        }

        self.store.delete_user(id).await?;

        tracing::info!(id, uid = %record.uid, "User deleted");
        Ok(())
    }
}
