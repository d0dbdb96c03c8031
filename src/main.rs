// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User-Admin API Server
//!
//! Serves the operator login and the admin user API on top of the hosted
//! identity service and Firestore.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_admin::{
    config::Config,
    db::FirestoreDb,
    services::{IdentityProvider, IdentityToolkitClient, UserDirectory},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting User-Admin API");

    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    let identity: Arc<dyn IdentityProvider> = Arc::new(IdentityToolkitClient::new(&config)?);
    if config.firebase_admin_token.is_none() {
        tracing::warn!("FIREBASE_ADMIN_TOKEN not set; user edits and deletes will fail");
    }

    let directory = UserDirectory::new(identity.clone(), Arc::new(db));

    let state = Arc::new(AppState {
        config: config.clone(),
        identity,
        directory,
    });

    let app = user_admin::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("user_admin=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
