use dashboard_lib::error::ActionError;
use dashboard_lib::error::ApiError;
use dashboard_lib::error::PreferenceError;

use crate::config::ConfigError;

/// Top-level CLI error; printed to stderr with exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Preferences: {0}")]
    Preference(#[from] PreferenceError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Cannot determine the user's config directory, pass --home")]
    NoConfigDir,

    /// The checked value failed a rule.
    #[error("{0}")]
    Invalid(String),
}
