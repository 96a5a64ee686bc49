//! Remote access to the users service.
//!
//! [`UsersApi`] is the seam the rest of the crate talks to; [`RestClient`] is
//! the HTTP implementation. Tests substitute their own implementations.

pub mod client;
pub mod wire;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::model::{NewUser, Page, User, UserDraft};

pub use client::RestClient;

/// Records requested per page.
pub const PAGE_SIZE: u32 = 5;

/// The four operations the interface performs against the users service.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Fetch page `page` (1-indexed) of [`PAGE_SIZE`] users.
    async fn list_users(&self, page: u32) -> Result<Page<User>, ApiError>;

    /// Create a user and return it with the id the service assigned.
    async fn create_user(&self, new_user: &NewUser) -> Result<User, ApiError>;

    /// Update the fields present in `draft`.
    async fn update_user(&self, id: u64, draft: &UserDraft) -> Result<User, ApiError>;

    /// Delete a user; `Ok(true)` once the service accepted the deletion.
    async fn delete_user(&self, id: u64) -> Result<bool, ApiError>;
}
