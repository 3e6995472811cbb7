//! Backend API consumed by store actions

mod http;

pub use http::*;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::model::Credentials;
use crate::model::User;

/// Path of the login endpoint, relative to the API base URL.
pub const LOGIN_PATH: &str = "/api/login";

/// Path of the current-user endpoint, relative to the API base URL.
pub const USER_PATH: &str = "/api/user";

/// Transport used by the `Login` and `FetchUser` actions.
///
/// Implementations must surface non-2xx responses as [`ApiError::Http`].
#[async_trait]
pub trait UserApi: Send + Sync {
    /// Exchanges credentials for the authenticated user record.
    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError>;

    /// Fetches the current user record.
    async fn fetch_user(&self) -> Result<User, ApiError>;
}
