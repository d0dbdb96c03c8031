// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity Toolkit client for operator sign-in and user identities.
//!
//! Handles:
//! - Email/password sign-in
//! - Identity creation (sign-up)
//! - Privileged email/password updates and deletion by uid
//!
//! Set FIREBASE_AUTH_EMULATOR_HOST to talk to the local auth emulator.

use crate::config::Config;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";

/// A signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

/// Changes applied to an existing identity. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl IdentityUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

/// Identity service failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email address is already in use")]
    DuplicateEmail,

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Email address is not valid")]
    InvalidEmail,

    #[error("Identity not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// Authentication capability backing login and user lifecycle.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify email/password credentials.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;

    /// Create a new identity and return its uid.
    async fn create_identity(&self, email: &str, password: &str) -> Result<String, IdentityError>;

    /// Change email and/or password of an identity.
    async fn update_identity(
        &self,
        uid: &str,
        update: &IdentityUpdate,
    ) -> Result<(), IdentityError>;

    /// Remove an identity.
    async fn delete_identity(&self, uid: &str) -> Result<(), IdentityError>;
}

/// Identity Toolkit REST client.
#[derive(Clone)]
pub struct IdentityToolkitClient {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    api_key: String,
    admin_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    local_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    local_id: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl IdentityToolkitClient {
    /// Create a client from application config.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let base_url = match std::env::var("FIREBASE_AUTH_EMULATOR_HOST") {
            Ok(host) => {
                tracing::info!(host = %host, "Using Firebase Auth emulator");
                format!("http://{}/identitytoolkit.googleapis.com", host)
            }
            Err(_) => IDENTITY_TOOLKIT_URL.to_string(),
        };

        Ok(Self::with_base_url(
            http,
            base_url,
            config.gcp_project_id.clone(),
            config.firebase_api_key.clone(),
            config.firebase_admin_token.clone(),
        ))
    }

    /// Create a client against an explicit endpoint.
    pub fn with_base_url(
        http: reqwest::Client,
        base_url: String,
        project_id: String,
        api_key: String,
        admin_token: Option<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id,
            api_key,
            admin_token,
        }
    }

    fn public_url(&self, method: &str) -> String {
        format!("{}/v1/accounts:{}", self.base_url, method)
    }

    fn admin_url(&self, method: &str) -> String {
        format!(
            "{}/v1/projects/{}/accounts:{}",
            self.base_url, self.project_id, method
        )
    }

    fn admin_token(&self) -> Result<&str, IdentityError> {
        self.admin_token.as_deref().ok_or_else(|| {
            IdentityError::Provider(
                "FIREBASE_ADMIN_TOKEN is required for identity updates and deletion".to_string(),
            )
        })
    }

    async fn post_public<B: Serialize + ?Sized>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<AccountResponse, IdentityError> {
        let response = self
            .http
            .post(self.public_url(method))
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        let response = check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| IdentityError::Provider(format!("Malformed response: {}", e)))
    }

    async fn post_admin<B: Serialize + ?Sized>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<(), IdentityError> {
        let response = self
            .http
            .post(self.admin_url(method))
            .bearer_auth(self.admin_token()?)
            .json(body)
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        check_response(response).await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let account = self.post_public("signInWithPassword", &body).await?;
        Ok(Identity {
            uid: account.local_id,
            email: account.email,
        })
    }

    async fn create_identity(&self, email: &str, password: &str) -> Result<String, IdentityError> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: false,
        };
        let account = self.post_public("signUp", &body).await?;
        tracing::info!(uid = %account.local_id, "Identity created");
        Ok(account.local_id)
    }

    async fn update_identity(
        &self,
        uid: &str,
        update: &IdentityUpdate,
    ) -> Result<(), IdentityError> {
        if update.is_empty() {
            return Ok(());
        }

        let body = UpdateRequest {
            local_id: uid,
            email: update.email.as_deref(),
            password: update.password.as_deref(),
        };
        self.post_admin("update", &body)
            .await
            .map_err(|err| match err {
                IdentityError::NotFound(_) => IdentityError::NotFound(uid.to_string()),
                other => other,
            })?;
        tracing::info!(
            uid,
            email_changed = update.email.is_some(),
            password_changed = update.password.is_some(),
            "Identity updated"
        );
        Ok(())
    }

    async fn delete_identity(&self, uid: &str) -> Result<(), IdentityError> {
        self.post_admin("delete", &DeleteRequest { local_id: uid })
            .await
            .map_err(|err| match err {
                IdentityError::NotFound(_) => IdentityError::NotFound(uid.to_string()),
                other => other,
            })?;
        tracing::info!(uid, "Identity deleted");
        Ok(())
    }
}

/// Check response status and map Identity Toolkit error codes.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, IdentityError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => Err(classify_error(&envelope.error.message)),
        Err(_) => Err(IdentityError::Provider(format!("HTTP {}: {}", status, body))),
    }
}

/// Map an Identity Toolkit error message (`CODE` or `CODE : detail`).
fn classify_error(message: &str) -> IdentityError {
    let (code, detail) = match message.split_once(':') {
        Some((code, detail)) => (code.trim(), detail.trim()),
        None => (message.trim(), ""),
    };

    match code {
        "INVALID_LOGIN_CREDENTIALS" | "INVALID_PASSWORD" | "EMAIL_NOT_FOUND" | "USER_DISABLED" => {
            IdentityError::InvalidCredentials
        }
        "EMAIL_EXISTS" => IdentityError::DuplicateEmail,
        "WEAK_PASSWORD" => IdentityError::WeakPassword(if detail.is_empty() {
            "Password should be at least 6 characters".to_string()
        } else {
            detail.to_string()
        }),
        "INVALID_EMAIL" | "MISSING_EMAIL" => IdentityError::InvalidEmail,
        "USER_NOT_FOUND" => IdentityError::NotFound(detail.to_string()),
        _ => IdentityError::Provider(message.to_string()),
    }
}
