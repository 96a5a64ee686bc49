//! JSON shapes exchanged with the users service and their mapping to
//! [`crate::model`] types.

use serde::{Deserialize, Serialize};

use crate::model::{DEFAULT_ROLE, Page, User};

#[derive(Debug, Deserialize)]
pub struct RemoteUser {
    pub id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl From<RemoteUser> for User {
    fn from(remote: RemoteUser) -> Self {
        User {
            id: remote.id,
            name: format!("{} {}", remote.first_name, remote.last_name),
            email: remote.email,
            role: remote
                .role
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RemotePage {
    pub data: Vec<RemoteUser>,
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub total_pages: u32,
}

impl From<RemotePage> for Page<User> {
    fn from(remote: RemotePage) -> Self {
        Page {
            data: remote.data.into_iter().map(User::from).collect(),
            page: remote.page,
            per_page: remote.per_page,
            total: remote.total,
            total_pages: remote.total_pages,
        }
    }
}

/// Request body for create and update. Absent fields are left out of the JSON.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'a str>,
}

impl<'a> UserPayload<'a> {
    pub fn new(name: Option<&'a str>, email: Option<&'a str>, role: Option<&'a str>) -> Self {
        let (first_name, last_name) = match name.map(split_name) {
            Some((first, last)) => (Some(first), Some(last)),
            None => (None, None),
        };
        Self { first_name, last_name, email, role }
    }
}

/// Split a display name on its first space; the last name is empty when
/// there is no space.
pub fn split_name(name: &str) -> (&str, &str) {
    name.split_once(' ').unwrap_or((name, ""))
}

/// Identifier echoed by the create endpoint; some services send it as a
/// string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(u64),
    Text(String),
}

impl WireId {
    pub fn to_id(&self) -> Option<u64> {
        match self {
            WireId::Number(n) => Some(*n),
            WireId::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatedBody {
    pub id: WireId,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_name_keeps_remainder_in_last_name() {
        assert_eq!(split_name("Jane Doe"), ("Jane", "Doe"));
        assert_eq!(split_name("Mary Ann Smith"), ("Mary", "Ann Smith"));
        assert_eq!(split_name("Cher"), ("Cher", ""));
    }

    #[test]
    fn remote_user_defaults_missing_role() {
        let remote: RemoteUser = serde_json::from_value(serde_json::json!({
            "id": 3,
            "first_name": "Emma",
            "last_name": "Wong",
            "email": "emma.wong@reqres.in"
        }))
        .unwrap();
        let user = User::from(remote);
        assert_eq!(user.name, "Emma Wong");
        assert_eq!(user.role, "user");
    }

    #[test]
    fn payload_omits_absent_fields() {
        let payload = UserPayload::new(None, Some("a@b.io"), None);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({ "email": "a@b.io" }));
    }

    #[test]
    fn created_id_accepts_number_or_string() {
        let n: CreatedBody = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        let s: CreatedBody = serde_json::from_str(r#"{"id": "913", "createdAt": "x"}"#).unwrap();
        assert_eq!(n.id.to_id(), Some(42));
        assert_eq!(s.id.to_id(), Some(913));
    }
}
