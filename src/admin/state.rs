//! Admin dashboard state and its transitions.
//!
//! `AdminState` is a plain value; every change goes through [`AdminState::apply`]
//! so the same event sequence always yields the same state.

use crate::models::user::describe_validation;
use crate::models::{CreateUserRequest, UpdateUserRequest, UserRow};
use validator::Validate;

/// Create/edit form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Form inputs, for field-by-field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Password,
}

/// Progress of the initial user load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Blocking message shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    Info(String),
    Error(String),
}

impl Alert {
    pub fn message(&self) -> &str {
        match self {
            Alert::Info(msg) | Alert::Error(msg) => msg,
        }
    }
}

/// A validated form, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create(CreateUserRequest),
    Update { id: String, request: UpdateUserRequest },
}

/// Things that happen to the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminEvent {
    LoadStarted,
    Loaded(Vec<UserRow>),
    LoadFailed(String),
    FieldChanged(FormField, String),
    EditStarted(UserRow),
    EditCancelled,
    Created(UserRow),
    Updated(UserRow),
    Deleted { id: String, message: String },
    Failed(String),
    AlertDismissed,
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminState {
    users: Vec<UserRow>,
    form: UserForm,
    edit_id: Option<String>,
    load: LoadState,
    alert: Option<Alert>,
}

impl AdminState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &[UserRow] {
        &self.users
    }

    pub fn form(&self) -> &UserForm {
        &self.form
    }

    /// Document id being edited; `None` in create mode.
    pub fn edit_id(&self) -> Option<&str> {
        self.edit_id.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.edit_id.is_some()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Validate the form for the current mode.
    ///
    /// A password is required when creating and optional when editing.
    pub fn submission(&self) -> Result<Submission, String> {
        match &self.edit_id {
            Some(id) => {
                let request = UpdateUserRequest {
                    name: self.form.name.trim().to_string(),
                    email: self.form.email.trim().to_string(),
                    password: Some(self.form.password.clone()).filter(|p| !p.is_empty()),
                };
                request
                    .validate()
                    .map_err(|errors| describe_validation(&errors))?;
                Ok(Submission::Update {
                    id: id.clone(),
                    request,
                })
            }
            None => {
                let request = CreateUserRequest {
                    name: self.form.name.trim().to_string(),
                    email: self.form.email.trim().to_string(),
                    password: self.form.password.clone(),
                };
                request
                    .validate()
                    .map_err(|errors| describe_validation(&errors))?;
                Ok(Submission::Create(request))
            }
        }
    }

    /// Apply one event.
    pub fn apply(mut self, event: AdminEvent) -> Self {
        match event {
            AdminEvent::LoadStarted => {
                self.load = LoadState::Loading;
            }
            AdminEvent::Loaded(users) => {
                self.users = users;
                self.load = LoadState::Ready;
            }
            AdminEvent::LoadFailed(message) => {
                self.load = LoadState::Failed(message.clone());
                self.alert = Some(Alert::Error(message));
            }
            AdminEvent::FieldChanged(field, value) => match field {
                FormField::Name => self.form.name = value,
                FormField::Email => self.form.email = value,
                FormField::Password => self.form.password = value,
            },
            AdminEvent::EditStarted(row) => {
                self.form = UserForm {
                    name: row.name,
                    email: row.email,
                    password: String::new(),
                };
                self.edit_id = Some(row.id);
            }
            AdminEvent::EditCancelled => {
                self.reset_form();
            }
            AdminEvent::Created(row) => {
                self.users.push(row);
                self.reset_form();
            }
            AdminEvent::Updated(row) => {
                if let Some(user) = self.users.iter_mut().find(|u| u.id == row.id) {
                    user.name = row.name;
                    user.email = row.email;
                }
                self.reset_form();
            }
            AdminEvent::Deleted { id, message } => {
                self.users.retain(|u| u.id != id);
                if self.edit_id.as_deref() == Some(id.as_str()) {
                    self.reset_form();
                }
                self.alert = Some(Alert::Info(message));
            }
            AdminEvent::Failed(message) => {
                self.alert = Some(Alert::Error(message));
            }
            AdminEvent::AlertDismissed => {
                self.alert = None;
            }
        }
        self
    }

    fn reset_form(&mut self) {
        self.form = UserForm::default();
        self.edit_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, name: &str, email: &str) -> UserRow {
        UserRow {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn loaded() -> AdminState {
        AdminState::new().apply(AdminEvent::Loaded(vec![
            row("u1", "Bob", "bob@x.com"),
            row("u2", "Carol", "carol@x.com"),
        ]))
    }

    fn fill(state: AdminState, name: &str, email: &str, password: &str) -> AdminState {
        state
            .apply(AdminEvent::FieldChanged(FormField::Name, name.to_string()))
            .apply(AdminEvent::FieldChanged(FormField::Email, email.to_string()))
            .apply(AdminEvent::FieldChanged(
                FormField::Password,
                password.to_string(),
            ))
    }

    #[test]
    fn test_edit_started_copies_row_and_clears_password() {
        let state = fill(loaded(), "x", "y", "old-secret")
            .apply(AdminEvent::EditStarted(row("u1", "Bob", "bob@x.com")));

        assert_eq!(state.edit_id(), Some("u1"));
        assert_eq!(
            state.form(),
            &UserForm {
                name: "Bob".to_string(),
                email: "bob@x.com".to_string(),
                password: String::new(),
            }
        );
    }

    #[test]
    fn test_updated_touches_only_matching_row() {
        let state = loaded()
            .apply(AdminEvent::EditStarted(row("u1", "Bob", "bob@x.com")))
            .apply(AdminEvent::Updated(row("u1", "Bobby", "bob@x.com")));

        assert_eq!(
            state.users(),
            &[row("u1", "Bobby", "bob@x.com"), row("u2", "Carol", "carol@x.com")]
        );
        assert!(!state.is_editing());
        assert_eq!(state.form(), &UserForm::default());
    }

    #[test]
    fn test_created_appends_and_resets() {
        let state = fill(loaded(), "Ada Lovelace", "ada@example.com", "s3cret!")
            .apply(AdminEvent::Created(row("u3", "Ada Lovelace", "ada@example.com")));

        assert_eq!(state.users().len(), 3);
        assert_eq!(state.users()[2], row("u3", "Ada Lovelace", "ada@example.com"));
        assert_eq!(state.form(), &UserForm::default());
    }

    #[test]
    fn test_deleted_removes_only_that_id() {
        let state = loaded().apply(AdminEvent::Deleted {
            id: "u2".to_string(),
            message: "deleted".to_string(),
        });

        assert_eq!(state.users(), &[row("u1", "Bob", "bob@x.com")]);
        assert_eq!(state.alert(), Some(&Alert::Info("deleted".to_string())));
    }

    #[test]
    fn test_failed_keeps_list_and_form() {
        let before = fill(loaded(), "Ada", "ada@example.com", "pw");
        let after = before.clone().apply(AdminEvent::Failed("boom".to_string()));

        assert_eq!(after.users(), before.users());
        assert_eq!(after.form(), before.form());
        assert_eq!(after.alert().map(Alert::message), Some("boom"));
    }

    #[test]
    fn test_load_failed_sets_state_and_alert() {
        let state = AdminState::new()
            .apply(AdminEvent::LoadStarted)
            .apply(AdminEvent::LoadFailed("offline".to_string()));

        assert_eq!(state.load_state(), &LoadState::Failed("offline".to_string()));
        assert!(matches!(state.alert(), Some(Alert::Error(_))));
    }

    #[test]
    fn test_submission_create_requires_password() {
        let state = fill(AdminState::new(), "Ada", "ada@example.com", "");
        assert_eq!(state.submission().unwrap_err(), "Password is required");
    }

    #[test]
    fn test_submission_edit_password_optional() {
        let state = loaded().apply(AdminEvent::EditStarted(row("u1", "Bob", "bob@x.com")));

        match state.submission().unwrap() {
            Submission::Update { id, request } => {
                assert_eq!(id, "u1");
                assert_eq!(request.password, None);
            }
            other => panic!("expected update, got {:?}", other),
        }
    }
}
