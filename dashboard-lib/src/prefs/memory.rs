//! In-memory preference store backed by DashMap

use dashmap::DashMap;

use super::PreferenceStore;
use crate::error::PreferenceError;

/// A preference store that lives only as long as the process.
///
/// # Example
///
/// ```
/// use dashboard_lib::prefs::{MemoryPreferences, PreferenceStore};
///
/// let prefs = MemoryPreferences::new().with("theme", "dark");
/// assert_eq!(prefs.get("theme").as_deref(), Some("dark"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: DashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a value, for building fixtures.
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
