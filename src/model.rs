//! User record model and the rules for validating partial records.
//!
//! The remote service owns `id`; everything the client edits goes through
//! [`UserDraft`], where each field is optional and validated only when present.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Role assigned when neither the form nor the server provides one.
pub const DEFAULT_ROLE: &str = "user";

/// Roles offered by the form's role selector.
pub const ROLES: [&str; 3] = ["admin", "user", "editor"];

/// A user record as displayed and edited by the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// A user that has not been assigned an id yet (create payload).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Partial user record: form input and update payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Validate)]
pub struct UserDraft {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: Option<String>,
}

/// Paginated envelope returned by the list endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub total_pages: u32,
}

/// Editable user fields, used to key validation errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Role,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Role => "Role",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "name" => Some(Field::Name),
            "email" => Some(Field::Email),
            "role" => Some(Field::Role),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation messages keyed by field; at most one message per field.
pub type FieldErrors = BTreeMap<Field, String>;

impl UserDraft {
    /// Draft with every field present, as produced by the form.
    pub fn full(name: impl Into<String>, email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            role: Some(role.into()),
        }
    }

    /// Run every present field through its validator and collect the first
    /// message per failing field.
    pub fn check(&self) -> Result<(), FieldErrors> {
        let Err(errs) = self.validate() else {
            return Ok(());
        };
        let mut out = FieldErrors::new();
        for (key, list) in errs.field_errors() {
            let key: &str = key.as_ref();
            let Some(field) = Field::from_key(key) else {
                continue;
            };
            let message = list
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid", field.label()));
            out.insert(field, message);
        }
        Err(out)
    }

    /// Convert into a create payload. Returns `None` unless name, email and
    /// role are all present.
    pub fn into_new_user(self) -> Option<NewUser> {
        Some(NewUser {
            name: self.name?,
            email: self.email?,
            role: self.role?,
        })
    }
}

impl From<&User> for UserDraft {
    fn from(user: &User) -> Self {
        Self::full(user.name.clone(), user.email.clone(), user.role.clone())
    }
}

impl User {
    /// Assemble a record from a create payload and the id the server assigned.
    pub fn from_new(id: u64, new_user: &NewUser) -> Self {
        Self {
            id,
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            role: new_user.role.clone(),
        }
    }

    /// Assemble a record from an update payload, defaulting what is missing.
    pub fn from_draft(id: u64, draft: &UserDraft) -> Self {
        Self {
            id,
            name: draft.name.clone().unwrap_or_default(),
            email: draft.email.clone().unwrap_or_default(),
            role: draft
                .role
                .clone()
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        }
    }
}

/// Capitalize the first character of a role for display ("admin" -> "Admin").
pub fn display_role(role: &str) -> String {
    let mut chars = role.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
