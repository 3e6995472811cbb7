//! Document wiring error types

/// Errors raised when the document does not contain the expected elements.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// No element carries the requested id.
    #[error("element '{id}' not found")]
    NotFound { id: String },
}

impl DomError {
    /// Creates a new not-found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}
