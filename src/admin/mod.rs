// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Operator-facing views: the admin dashboard and the login form.
//!
//! Views hold their own state and reach the backend only through the
//! [`AdminBackend`] and [`SignIn`] capabilities, so they run the same
//! against the HTTP API ([`AdminApiClient`]) or an in-process
//! [`UserDirectory`](crate::services::UserDirectory).

pub mod client;
pub mod console;
pub mod login;
pub mod state;

pub use client::AdminApiClient;
pub use console::{AdminBackend, AdminConsole, ConsoleError};
pub use login::{LoginForm, LoginView, SignIn};
pub use state::{AdminEvent, AdminState, Alert, FormField, LoadState, UserForm};
