// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test fixtures: in-memory identity service and user store that
//! record every call into one ordered log.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use user_admin::config::Config;
use user_admin::db::{FirestoreDb, UserStore};
use user_admin::error::AppError;
use user_admin::models::{NewUser, UserRecord, UserUpdate};
use user_admin::routes::create_router;
use user_admin::services::{
    Identity, IdentityError, IdentityProvider, IdentityUpdate, UserDirectory,
};
use user_admin::AppState;

/// One remote call, in the order it was issued.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SignIn { email: String },
    CreateIdentity { email: String },
    UpdateIdentity { uid: String, update: IdentityUpdate },
    DeleteIdentity { uid: String },
    ListUsers,
    GetUser { id: String },
    CreateUser(NewUser),
    UpdateUser { id: String, update: UserUpdate },
    DeleteUser { id: String },
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

#[derive(Debug, Clone)]
pub struct Account {
    pub uid: String,
    pub email: String,
    pub password: String,
}

/// In-memory identity service.
#[derive(Default)]
pub struct FakeIdentity {
    log: CallLog,
    accounts: Mutex<Vec<Account>>,
    next_uid: AtomicUsize,
    fail_create: Option<IdentityError>,
    fail_update: Option<IdentityError>,
    fail_delete: Option<IdentityError>,
}

impl FakeIdentity {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    pub fn failing_create(mut self, err: IdentityError) -> Self {
        self.fail_create = Some(err);
        self
    }

    pub fn failing_update(mut self, err: IdentityError) -> Self {
        self.fail_update = Some(err);
        self
    }

    pub fn failing_delete(mut self, err: IdentityError) -> Self {
        self.fail_delete = Some(err);
        self
    }

    pub fn with_account(self, uid: &str, email: &str, password: &str) -> Self {
        self.accounts.lock().unwrap().push(Account {
            uid: uid.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        });
        self
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.accounts.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        self.record(Call::SignIn {
            email: email.to_string(),
        });
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == email && a.password == password)
            .map(|a| Identity {
                uid: a.uid.clone(),
                email: a.email.clone(),
            })
            .ok_or(IdentityError::InvalidCredentials)
    }

    async fn create_identity(&self, email: &str, password: &str) -> Result<String, IdentityError> {
        self.record(Call::CreateIdentity {
            email: email.to_string(),
        });
        if let Some(err) = &self.fail_create {
            return Err(err.clone());
        }

        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.email == email) {
            return Err(IdentityError::DuplicateEmail);
        }
        if password.len() < 6 {
            return Err(IdentityError::WeakPassword(
                "Password should be at least 6 characters".to_string(),
            ));
        }

        let uid = format!("uid-{}", self.next_uid.fetch_add(1, Ordering::SeqCst) + 1);
        accounts.push(Account {
            uid: uid.clone(),
            email: email.to_string(),
            password: password.to_string(),
        });
        Ok(uid)
    }

    async fn update_identity(
        &self,
        uid: &str,
        update: &IdentityUpdate,
    ) -> Result<(), IdentityError> {
        self.record(Call::UpdateIdentity {
            uid: uid.to_string(),
            update: update.clone(),
        });
        if let Some(err) = &self.fail_update {
            return Err(err.clone());
        }
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.uid == uid)
            .ok_or_else(|| IdentityError::NotFound(uid.to_string()))?;
        if let Some(email) = &update.email {
            account.email = email.clone();
        }
        if let Some(password) = &update.password {
            account.password = password.clone();
        }
        Ok(())
    }

    async fn delete_identity(&self, uid: &str) -> Result<(), IdentityError> {
        self.record(Call::DeleteIdentity {
            uid: uid.to_string(),
        });
        if let Some(err) = &self.fail_delete {
            return Err(err.clone());
        }
        let mut accounts = self.accounts.lock().unwrap();
        let before = accounts.len();
        accounts.retain(|a| a.uid != uid);
        if accounts.len() == before {
            return Err(IdentityError::NotFound(uid.to_string()));
        }
        Ok(())
    }
}

/// In-memory `users` collection.
#[derive(Default)]
pub struct FakeStore {
    log: CallLog,
    records: Mutex<Vec<UserRecord>>,
    next_id: AtomicUsize,
    fail_create: bool,
    fail_list: bool,
    fail_update: bool,
}

impl FakeStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn with_record(self, id: &str, name: &str, email: &str, uid: &str) -> Self {
        self.records.lock().unwrap().push(UserRecord {
            id: Some(id.to_string()),
            name: name.to_string(),
            email: email.to_string(),
            uid: uid.to_string(),
            created_at: None,
        });
        self
    }

    pub fn records(&self) -> Vec<UserRecord> {
        self.records.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }
}

#[async_trait]
impl UserStore for FakeStore {
    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        self.record(Call::ListUsers);
        if self.fail_list {
            return Err(AppError::Database("store unavailable".to_string()));
        }
        Ok(self.records())
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, AppError> {
        self.record(Call::GetUser { id: id.to_string() });
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id.as_deref() == Some(id))
            .cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserRecord, AppError> {
        self.record(Call::CreateUser(user.clone()));
        if self.fail_create {
            return Err(AppError::Database("write rejected".to_string()));
        }
        let record = UserRecord {
            id: Some(format!(
                "doc-{}",
                self.next_id.fetch_add(1, Ordering::SeqCst) + 1
            )),
            name: user.name.clone(),
            email: user.email.clone(),
            uid: user.uid.clone(),
            created_at: Some("2026-01-01T00:00:00Z".to_string()),
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<(), AppError> {
        self.record(Call::UpdateUser {
            id: id.to_string(),
            update: update.clone(),
        });
        if self.fail_update {
            return Err(AppError::Database("write rejected".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id.as_deref() == Some(id))
            .ok_or_else(|| AppError::NotFound(format!("User not found: {}", id)))?;
        record.name = update.name.clone();
        record.email = update.email.clone();
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        self.record(Call::DeleteUser { id: id.to_string() });
        self.records
            .lock()
            .unwrap()
            .retain(|r| r.id.as_deref() != Some(id));
        Ok(())
    }
}

/// Fakes wired into a directory, sharing one call log.
pub struct Harness {
    pub log: CallLog,
    pub identity: Arc<FakeIdentity>,
    pub store: Arc<FakeStore>,
    pub directory: UserDirectory,
}

impl Harness {
    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.log.lock().unwrap().clear();
    }
}

/// Build a harness; the closures configure the fakes before they are shared.
pub fn harness(
    identity: impl FnOnce(FakeIdentity) -> FakeIdentity,
    store: impl FnOnce(FakeStore) -> FakeStore,
) -> Harness {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let identity = Arc::new(identity(FakeIdentity::new(log.clone())));
    let store = Arc::new(store(FakeStore::new(log.clone())));
    let directory = UserDirectory::new(identity.clone(), store.clone());
    Harness {
        log,
        identity,
        store,
        directory,
    }
}

/// Harness with Bob (`u1`) and Carol (`u2`) already present.
pub fn seeded_harness() -> Harness {
    harness(
        |identity| {
            identity
                .with_account("uid-bob", "bob@x.com", "bobpass1")
                .with_account("uid-carol", "carol@x.com", "carolpass1")
        },
        |store| {
            store
                .with_record("u1", "Bob", "bob@x.com", "uid-bob")
                .with_record("u2", "Carol", "carol@x.com", "uid-carol")
        },
    )
}

/// Create a test app over the harness fakes.
/// Returns the router and the shared state.
pub fn create_test_app(harness: &Harness) -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(harness, Config::test_default())
}

pub fn create_test_app_with_config(
    harness: &Harness,
    config: Config,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config,
        identity: harness.identity.clone(),
        directory: harness.directory.clone(),
    });

    (create_router(state.clone()), state)
}

/// Create a test app whose store is an offline Firestore client.
pub fn create_offline_test_app() -> axum::Router {
    let identity: Arc<dyn IdentityProvider> = Arc::new(FakeIdentity::default());
    let directory = UserDirectory::new(identity.clone(), Arc::new(FirestoreDb::new_mock()));
    let state = Arc::new(AppState {
        config: Config::test_default(),
        identity,
        directory,
    });
    create_router(state)
}

/// Check if emulator is available via environment variable.
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Read a JSON response body.
pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
