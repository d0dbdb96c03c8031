// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin dashboard controller.
//!
//! Drives [`AdminState`] from operator actions. The local list is only
//! changed after the remote call that justifies the change has succeeded.

use crate::admin::state::{AdminEvent, AdminState, FormField, Submission};
use crate::error::AppError;
use crate::models::{CreateUserRequest, UpdateUserRequest, UserRow};
use crate::routes::admin::USER_DELETED_MESSAGE;
use crate::services::UserDirectory;
use async_trait::async_trait;

/// Shown when a delete fails without a server-provided message.
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete user.";

/// Failures seen by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsoleError {
    /// The form did not pass validation; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// The backend answered with an error message.
    #[error("{0}")]
    Remote(String),

    /// The backend could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with something unreadable.
    #[error("Unexpected response: {0}")]
    Malformed(String),

    /// Another submission is still in flight.
    #[error("A request is already in progress")]
    Busy,
}

/// Remote operations the dashboard depends on.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserRow>, ConsoleError>;

    async fn create_user(&self, request: &CreateUserRequest) -> Result<UserRow, ConsoleError>;

    async fn update_user(
        &self,
        id: &str,
        request: &UpdateUserRequest,
    ) -> Result<UserRow, ConsoleError>;

    /// Call the delete-proxy; returns its success message.
    async fn delete_user(&self, id: &str) -> Result<String, ConsoleError>;
}

/// In-process backend for consoles embedded next to the directory.
#[async_trait]
impl AdminBackend for UserDirectory {
    async fn list_users(&self) -> Result<Vec<UserRow>, ConsoleError> {
        self.list()
            .await
            .map_err(remote)
    }

    async fn create_user(&self, request: &CreateUserRequest) -> Result<UserRow, ConsoleError> {
        self.create(request)
            .await
            .map_err(remote)
    }

    async fn update_user(
        &self,
        id: &str,
        request: &UpdateUserRequest,
    ) -> Result<UserRow, ConsoleError> {
        self.update(id, request)
            .await
            .map_err(remote)
    }

    async fn delete_user(&self, id: &str) -> Result<String, ConsoleError> {
        self.delete(id)
            .await
            .map(|()| USER_DELETED_MESSAGE.to_string())
            .map_err(remote)
    }
}

/// Directory failures as the dashboard shows them, matching the HTTP `{error}` text.
fn remote(err: AppError) -> ConsoleError {
    ConsoleError::Remote(err.public_message())
}

/// The admin dashboard: user table plus create/edit form.
pub struct AdminConsole<B> {
    backend: B,
    state: AdminState,
}

impl<B: AdminBackend> AdminConsole<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: AdminState::new(),
        }
    }

    pub fn state(&self) -> &AdminState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn dispatch(&mut self, event: AdminEvent) {
        self.state = std::mem::take(&mut self.state).apply(event);
    }

    /// Load the user list. Also used to retry after a failed load.
    pub async fn activate(&mut self) -> Result<(), ConsoleError> {
        self.dispatch(AdminEvent::LoadStarted);

        match self.backend.list_users().await {
            Ok(users) => {
                tracing::debug!(count = users.len(), "Users loaded");
                self.dispatch(AdminEvent::Loaded(users));
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "Error loading users");
                self.dispatch(AdminEvent::LoadFailed(err.to_string()));
                Err(err)
            }
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.dispatch(AdminEvent::FieldChanged(field, value.into()));
    }

    /// Put a row into the form for editing. No remote call.
    pub fn start_edit(&mut self, user: &UserRow) {
        self.dispatch(AdminEvent::EditStarted(user.clone()));
    }

    pub fn cancel_edit(&mut self) {
        self.dispatch(AdminEvent::EditCancelled);
    }

    pub fn dismiss_alert(&mut self) {
        self.dispatch(AdminEvent::AlertDismissed);
    }

    /// Create or update from the form, depending on the edit marker.
    pub async fn submit(&mut self) -> Result<UserRow, ConsoleError> {
        let submission = match self.state.submission() {
            Ok(submission) => submission,
            Err(message) => {
                self.dispatch(AdminEvent::Failed(message.clone()));
                return Err(ConsoleError::Validation(message));
            }
        };

        let result = match &submission {
            Submission::Create(request) => self.backend.create_user(request).await,
            Submission::Update { id, request } => self.backend.update_user(id, request).await,
        };

        match result {
            Ok(row) => {
                let event = match submission {
                    Submission::Create(_) => AdminEvent::Created(row.clone()),
                    Submission::Update { .. } => AdminEvent::Updated(row.clone()),
                };
                self.dispatch(event);
                Ok(row)
            }
            Err(err) => {
                tracing::error!(error = %err, "Error saving user");
                self.dispatch(AdminEvent::Failed(format!("Error: {}", err)));
                Err(err)
            }
        }
    }

    /// Delete through the delete-proxy. The row stays unless the proxy succeeds.
    pub async fn delete(&mut self, id: &str) -> Result<(), ConsoleError> {
        match self.backend.delete_user(id).await {
            Ok(message) => {
                self.dispatch(AdminEvent::Deleted {
                    id: id.to_string(),
                    message,
                });
                Ok(())
            }
            Err(err) => {
                tracing::error!(id, error = %err, "Error deleting user");
                let message = match &err {
                    ConsoleError::Remote(msg) if !msg.is_empty() => msg.clone(),
                    _ => DELETE_FAILED_MESSAGE.to_string(),
                };
                self.dispatch(AdminEvent::Failed(message));
                Err(err)
            }
        }
    }
}
