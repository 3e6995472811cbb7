//! Persisted preference storage.
//!
//! The store keeps the user's appearance choices (`theme`, `direction`) in a
//! small synchronous key-value store so they survive restarts.

mod file;
mod memory;

pub use file::*;
pub use memory::*;

use crate::error::PreferenceError;

/// Preference key holding the theme.
pub const THEME_KEY: &str = "theme";

/// Preference key holding the text direction.
pub const DIRECTION_KEY: &str = "direction";

/// Synchronous string key-value storage for user preferences.
pub trait PreferenceStore: Send + Sync {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}
