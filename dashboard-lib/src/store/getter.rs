//! Memoized derived values

use std::sync::Arc;

use crate::model::AppState;
use crate::model::Notification;

/// Derived values computed from [`AppState`] and cached by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Getter {
    IsLoggedIn,
    /// The user's name, or `""` when logged out.
    UserName,
    /// The user's role, or `"guest"` when absent.
    UserRole,
    UnreadNotifications,
    IsDarkMode,
    IsRtl,
}

impl Getter {
    pub const ALL: [Getter; 6] = [
        Getter::IsLoggedIn,
        Getter::UserName,
        Getter::UserRole,
        Getter::UnreadNotifications,
        Getter::IsDarkMode,
        Getter::IsRtl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::IsLoggedIn => "isLoggedIn",
            Self::UserName => "userName",
            Self::UserRole => "userRole",
            Self::UnreadNotifications => "unreadNotifications",
            Self::IsDarkMode => "isDarkMode",
            Self::IsRtl => "isRTL",
        }
    }

    /// Looks a getter up by its name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.name() == name)
    }

    pub(crate) fn compute(self, state: &AppState) -> GetterValue {
        match self {
            Self::IsLoggedIn => GetterValue::Bool(state.user.is_some()),
            Self::UserName => GetterValue::Text(
                state
                    .user
                    .as_ref()
                    .map(|u| u.name.clone())
                    .unwrap_or_default(),
            ),
            Self::UserRole => GetterValue::Text(
                state
                    .user
                    .as_ref()
                    .and_then(|u| u.role.clone())
                    .unwrap_or_else(|| "guest".to_string()),
            ),
            Self::UnreadNotifications => {
                GetterValue::Notifications(Arc::new(state.unread_notifications()))
            }
            Self::IsDarkMode => GetterValue::Bool(state.theme.is_dark()),
            Self::IsRtl => GetterValue::Bool(state.direction.is_rtl()),
        }
    }
}

/// A cached getter result.
///
/// List values are shared, so two reads of the same cache entry point to the
/// same allocation.
#[derive(Debug, Clone, PartialEq)]
pub enum GetterValue {
    Bool(bool),
    Text(String),
    Notifications(Arc<Vec<Notification>>),
}

impl GetterValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_notifications(&self) -> Option<&Arc<Vec<Notification>>> {
        match self {
            Self::Notifications(list) => Some(list),
            _ => None,
        }
    }
}
