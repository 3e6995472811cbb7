//! Application state record

use serde::Serialize;

use super::Direction;
use super::Notification;
use super::Theme;
use super::User;

/// The single mutable state record held by the [`Store`](crate::store::Store).
///
/// `is_authenticated` always equals `user.is_some()`; the `SetUser` mutation
/// is the only writer of either field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub theme: Theme,
    pub direction: Direction,
    pub notifications: Vec<Notification>,
    pub sidebar_collapsed: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl AppState {
    /// Initial state with the persisted appearance preferences applied.
    pub fn with_appearance(theme: Theme, direction: Direction) -> Self {
        Self {
            theme,
            direction,
            ..Self::default()
        }
    }

    pub fn unread_notifications(&self) -> Vec<Notification> {
        self.notifications
            .iter()
            .filter(|n| !n.read)
            .cloned()
            .collect()
    }
}
