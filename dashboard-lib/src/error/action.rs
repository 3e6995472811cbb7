//! Action error types

use super::ApiError;

/// Errors surfaced to the caller of [`Store::dispatch`](crate::store::Store::dispatch).
///
/// A failing backend call has already recorded its message into
/// `AppState::error` by the time the caller sees this value.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The backend call behind the action failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A known action was dispatched by name with a payload it cannot use.
    /// Nothing ran and the state is unchanged.
    #[error("Invalid payload for action \"{action}\": {message}")]
    InvalidPayload { action: String, message: String },
}

impl ActionError {
    /// Returns the HTTP status code if the action failed on a non-2xx response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(err) => err.status_code(),
            Self::InvalidPayload { .. } => None,
        }
    }
}
