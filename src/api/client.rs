//! reqwest implementation of [`UsersApi`].
//!
//! Write operations return records assembled from the request payload and the
//! server-assigned id; the echoed name/email/role are ignored because the
//! reference service does not persist writes.

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, warn};

use super::wire::{CreatedBody, ErrorBody, RemotePage, UserPayload};
use super::{PAGE_SIZE, UsersApi};
use crate::error::ApiError;
use crate::model::{NewUser, Page, User, UserDraft};

/// Default service endpoint.
pub const DEFAULT_API_URL: &str = "https://reqres.in/api";

const FETCH_FAILED: &str = "Failed to fetch users";
const CREATE_FAILED: &str = "Failed to create user";
const UPDATE_FAILED: &str = "Failed to update user";
const DELETE_FAILED: &str = "Failed to delete user";

/// HTTP client for the `/users` resource.
#[derive(Clone, Debug)]
pub struct RestClient {
    http: Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: u64) -> String {
        format!("{}/users/{}", self.base_url, id)
    }
}

/// Build the error for a non-success response, preferring the server's
/// `error` field over `fallback`.
async fn failure(response: Response, fallback: &str) -> ApiError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string());
    warn!(status = status.as_u16(), %message, "users service rejected request");
    ApiError::Status { status: status.as_u16(), message }
}

#[async_trait]
impl UsersApi for RestClient {
    async fn list_users(&self, page: u32) -> Result<Page<User>, ApiError> {
        let response = self
            .http
            .get(self.users_url())
            .query(&[("page", page), ("per_page", PAGE_SIZE)])
            .send()
            .await?;
        debug!(page, status = response.status().as_u16(), "GET /users");
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: FETCH_FAILED.to_string(),
            });
        }
        let remote: RemotePage = response.json().await?;
        Ok(remote.into())
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, ApiError> {
        let payload = UserPayload::new(
            Some(new_user.name.as_str()),
            Some(new_user.email.as_str()),
            Some(new_user.role.as_str()),
        );
        let response = self.http.post(self.users_url()).json(&payload).send().await?;
        debug!(status = response.status().as_u16(), "POST /users");
        if !response.status().is_success() {
            return Err(failure(response, CREATE_FAILED).await);
        }
        let created: CreatedBody = response.json().await?;
        let id = created
            .id
            .to_id()
            .ok_or_else(|| ApiError::Decode(format!("invalid user id {:?}", created.id)))?;
        Ok(User::from_new(id, new_user))
    }

    async fn update_user(&self, id: u64, draft: &UserDraft) -> Result<User, ApiError> {
        let payload = UserPayload::new(
            draft.name.as_deref(),
            draft.email.as_deref(),
            draft.role.as_deref(),
        );
        let response = self.http.put(self.user_url(id)).json(&payload).send().await?;
        debug!(id, status = response.status().as_u16(), "PUT /users/:id");
        if !response.status().is_success() {
            return Err(failure(response, UPDATE_FAILED).await);
        }
        Ok(User::from_draft(id, draft))
    }

    async fn delete_user(&self, id: u64) -> Result<bool, ApiError> {
        let response = self.http.delete(self.user_url(id)).send().await?;
        debug!(id, status = response.status().as_u16(), "DELETE /users/:id");
        if !response.status().is_success() {
            return Err(failure(response, DELETE_FAILED).await);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = RestClient::new("http://localhost:8080/api/");
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.user_url(7), "http://localhost:8080/api/users/7");
    }
}
