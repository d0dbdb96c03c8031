// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin API: user listing, create/edit, and the delete-proxy endpoint.

use crate::error::{AppError, Result};
use crate::models::{CreateUserRequest, DeleteUserRequest, UpdateUserRequest, UserRow};
use crate::routes::json_body;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Message returned by the delete-proxy on success.
pub const USER_DELETED_MESSAGE: &str = "User deleted successfully";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/{id}", put(update_user))
        .route("/api/deleteUser", delete(delete_user))
}

/// All users for the admin table.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UsersResponse {
    pub users: Vec<UserRow>,
}

/// Delete-proxy success body.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteUserResponse {
    pub message: String,
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<UsersResponse>> {
    let users = state.directory.list().await?;
    tracing::debug!(count = users.len(), "Listed users");
    Ok(Json(UsersResponse { users }))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserRow>)> {
    let request = json_body(payload)?;
    let row = state.directory.create(&request).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserRow>> {
    let request = json_body(payload)?;
    let row = state.directory.update(&id, &request).await?;
    Ok(Json(row))
}

/// Remove a user's identity and document.
///
/// Body `{"userID": "<document id>"}`; answers `{message}` or `{error}`.
async fn delete_user(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<DeleteUserRequest>, JsonRejection>,
) -> Result<Json<DeleteUserResponse>> {
    let request = json_body(payload)?;
    let user_id = request.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::BadRequest("userID is required".to_string()));
    }

    state.directory.delete(user_id).await?;

    Ok(Json(DeleteUserResponse {
        message: USER_DELETED_MESSAGE.to_string(),
    }))
}
