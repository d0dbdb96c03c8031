// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod directory;
pub mod identity;

pub use directory::UserDirectory;
pub use identity::{
    Identity, IdentityError, IdentityProvider, IdentityToolkitClient, IdentityUpdate,
};
