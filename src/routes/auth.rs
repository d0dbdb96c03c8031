// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Operator login/logout routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::admin::login::{check_credentials, LOGIN_REDIRECT};
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::LoginRequest;
use crate::routes::json_body;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Successful login response.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub redirect: String,
}

/// Sign in with email/password and start an operator session.
///
/// Every sign-in failure is reported the same way so the response does not
/// reveal whether an account exists.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let request = json_body(payload)?;
    check_credentials(&request.email, &request.password)
        .map_err(|msg| AppError::BadRequest(msg.to_string()))?;

    let identity = state
        .identity
        .sign_in(&request.email, &request.password)
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "Operator sign-in failed");
            AppError::InvalidCredentials
        })?;

    let jwt = create_jwt(&identity.uid, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(uid = %identity.uid, "Operator signed in");

    let cookie = Cookie::build((SESSION_COOKIE, jwt))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.frontend_url.starts_with("https://"))
        .build();

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            redirect: LOGIN_REDIRECT.to_string(),
        }),
    ))
}

/// End the operator session.
async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (
        jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/")),
        StatusCode::NO_CONTENT,
    )
}
