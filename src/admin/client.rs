// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the admin API.
//!
//! Implements the dashboard and login capabilities against a running
//! server: `/api/users`, `/api/login` and the `/api/deleteUser` proxy.

use crate::admin::console::{AdminBackend, ConsoleError};
use crate::admin::login::SignIn;
use crate::middleware::auth::SESSION_COOKIE;
use crate::models::{CreateUserRequest, DeleteUserRequest, LoginRequest, UpdateUserRequest, UserRow};
use crate::routes::admin::{DeleteUserResponse, UsersResponse};
use async_trait::async_trait;
use axum_extra::extract::cookie::Cookie;
use reqwest::header::SET_COOKIE;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::RwLock;

/// `{error}` body returned by the server on failure.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Admin API client.
pub struct AdminApiClient {
    http: reqwest::Client,
    base_url: String,
    session: RwLock<Option<String>>,
}

impl AdminApiClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Whether a login has produced a session token.
    pub async fn has_session(&self) -> bool {
        self.session.read().await.is_some()
    }

    async fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ConsoleError> {
        self.authorize(request)
            .await
            .send()
            .await
            .map_err(|e| ConsoleError::Network(e.to_string()))
    }
}

/// Check response status, turning `{error}` bodies into `Remote` errors.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ConsoleError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => Err(ConsoleError::Remote(parsed.error)),
        Err(_) => Err(ConsoleError::Malformed(format!("HTTP {}: {}", status, body))),
    }
}

/// Check response and parse JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, ConsoleError> {
    check_response(response)
        .await?
        .json()
        .await
        .map_err(|e| ConsoleError::Malformed(e.to_string()))
}

/// Pull the session token out of a `Set-Cookie` header value.
fn session_from_set_cookie(value: &str) -> Option<String> {
    let cookie = Cookie::parse(value).ok()?;
    let token = cookie.value_trimmed();
    (cookie.name() == SESSION_COOKIE && !token.is_empty()).then(|| token.to_string())
}

#[async_trait]
impl AdminBackend for AdminApiClient {
    async fn list_users(&self) -> Result<Vec<UserRow>, ConsoleError> {
        let response = self.send(self.http.get(self.url("/api/users"))).await?;
        let body: UsersResponse = check_response_json(response).await?;
        Ok(body.users)
    }

    async fn create_user(&self, request: &CreateUserRequest) -> Result<UserRow, ConsoleError> {
        let response = self
            .send(self.http.post(self.url("/api/users")).json(request))
            .await?;
        check_response_json(response).await
    }

    async fn update_user(
        &self,
        id: &str,
        request: &UpdateUserRequest,
    ) -> Result<UserRow, ConsoleError> {
        let path = format!("/api/users/{}", id);
        let response = self
            .send(self.http.put(self.url(&path)).json(request))
            .await?;
        check_response_json(response).await
    }

    async fn delete_user(&self, id: &str) -> Result<String, ConsoleError> {
        let body = DeleteUserRequest {
            user_id: id.to_string(),
        };
        let response = self
            .send(self.http.delete(self.url("/api/deleteUser")).json(&body))
            .await?;
        let body: DeleteUserResponse = check_response_json(response).await?;
        Ok(body.message)
    }
}

#[async_trait]
impl SignIn for AdminApiClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<(), ConsoleError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/api/login"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ConsoleError::Network(e.to_string()))?;
        let response = check_response(response).await?;

        let token = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(session_from_set_cookie);

        if token.is_none() {
            tracing::warn!("Login succeeded without a session cookie");
        }
        *self.session.write().await = token;
        Ok(())
    }
}
