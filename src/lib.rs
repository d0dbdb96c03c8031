// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User-Admin: operator console for user accounts
//!
//! This crate provides the backend API and the view-models for an admin
//! dashboard that manages user accounts stored across a hosted identity
//! service and a Firestore `users` collection.

pub mod admin;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{IdentityProvider, UserDirectory};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub identity: Arc<dyn IdentityProvider>,
    pub directory: UserDirectory,
}
