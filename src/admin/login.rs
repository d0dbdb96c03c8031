// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Operator login view.

use crate::admin::console::ConsoleError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Shown when email or password is missing.
pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";

/// Shown for every sign-in failure, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password. Please try again.";

/// Where the browser goes after a successful login.
pub const LOGIN_REDIRECT: &str = "/";

/// Reject a login attempt before any network call.
pub fn check_credentials(email: &str, password: &str) -> Result<(), &'static str> {
    if email.is_empty() || password.is_empty() {
        return Err(FILL_ALL_FIELDS);
    }
    Ok(())
}

/// Sign-in capability used by the login view.
#[async_trait]
pub trait SignIn: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<(), ConsoleError>;
}

/// Login form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login view state: last error and the busy flag.
pub struct LoginView<S> {
    backend: S,
    busy: AtomicBool,
    error: Mutex<Option<String>>,
}

/// Clears the busy flag when a submit finishes, however it finishes.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: SignIn> LoginView<S> {
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            busy: AtomicBool::new(false),
            error: Mutex::new(None),
        }
    }

    /// True while a sign-in call is outstanding; the submit control is disabled.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Message to show above the form, if any.
    pub fn error(&self) -> Option<String> {
        self.error_slot().clone()
    }

    fn error_slot(&self) -> MutexGuard<'_, Option<String>> {
        self.error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_error(&self, message: Option<&str>) {
        *self.error_slot() = message.map(str::to_string);
    }

    /// Submit the form. Returns the redirect target on success.
    pub async fn submit(&self, form: &LoginForm) -> Result<&'static str, ConsoleError> {
        if let Err(message) = check_credentials(&form.email, &form.password) {
            self.set_error(Some(message));
            return Err(ConsoleError::Validation(message.to_string()));
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ConsoleError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        self.set_error(None);

        match self.backend.sign_in(&form.email, &form.password).await {
            Ok(()) => {
                tracing::info!(email = %form.email, "Signed in");
                Ok(LOGIN_REDIRECT)
            }
            Err(err) => {
                tracing::error!(error = %err, "Sign-in failed");
                self.set_error(Some(INVALID_CREDENTIALS));
                Err(ConsoleError::Remote(INVALID_CREDENTIALS.to_string()))
            }
        }
    }
}
