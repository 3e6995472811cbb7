//! Preference store error types

/// Errors raised by a [`PreferenceStore`](crate::prefs::PreferenceStore).
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    /// Reading or writing the backing file failed.
    #[error("preference io error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file could not be encoded or decoded.
    #[error("preference serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
