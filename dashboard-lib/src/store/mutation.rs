//! Synchronous state transforms

use serde::Deserialize;

use crate::model::AppState;
use crate::model::Direction;
use crate::model::Notification;
use crate::model::NotificationDraft;
use crate::model::NotificationId;
use crate::model::Theme;
use crate::model::User;
use crate::prefs::DIRECTION_KEY;
use crate::prefs::THEME_KEY;

/// The only way to change [`AppState`].
///
/// Applied by [`Store::commit`](super::Store::commit). The serde form
/// (`{"type": "setTheme", "payload": "dark"}`) backs
/// [`Store::commit_named`](super::Store::commit_named).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Mutation {
    /// Sets or clears the user; keeps `is_authenticated` in sync.
    SetUser(Option<User>),
    /// Sets the theme and persists it.
    SetTheme(Theme),
    /// Sets the text direction and persists it.
    SetDirection(Direction),
    /// Appends a notification. The store assigns its id and timestamp.
    AddNotification(NotificationDraft),
    RemoveNotification(NotificationId),
    MarkNotificationRead(NotificationId),
    ClearNotifications,
    ToggleSidebar,
    SetLoading(bool),
    SetError(Option<String>),
}

impl Mutation {
    /// Every name accepted by [`Store::commit_named`](super::Store::commit_named).
    pub const NAMES: [&'static str; 10] = [
        "setUser",
        "setTheme",
        "setDirection",
        "addNotification",
        "removeNotification",
        "markNotificationRead",
        "clearNotifications",
        "toggleSidebar",
        "setLoading",
        "setError",
    ];

    /// Name used in logs and by the named entry points.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetUser(_) => "setUser",
            Self::SetTheme(_) => "setTheme",
            Self::SetDirection(_) => "setDirection",
            Self::AddNotification(_) => "addNotification",
            Self::RemoveNotification(_) => "removeNotification",
            Self::MarkNotificationRead(_) => "markNotificationRead",
            Self::ClearNotifications => "clearNotifications",
            Self::ToggleSidebar => "toggleSidebar",
            Self::SetLoading(_) => "setLoading",
            Self::SetError(_) => "setError",
        }
    }

    /// Applies the mutation in place.
    ///
    /// `next_id` is called only by `AddNotification`; the id it hands out is
    /// returned.
    pub(crate) fn apply(
        self,
        state: &mut AppState,
        next_id: impl FnOnce() -> NotificationId,
    ) -> Option<NotificationId> {
        match self {
            Self::SetUser(user) => {
                state.is_authenticated = user.is_some();
                state.user = user;
            }
            Self::SetTheme(theme) => state.theme = theme,
            Self::SetDirection(direction) => state.direction = direction,
            Self::AddNotification(draft) => {
                let id = next_id();
                state.notifications.push(Notification::new(id, &draft));
                return Some(id);
            }
            Self::RemoveNotification(id) => state.notifications.retain(|n| n.id != id),
            Self::MarkNotificationRead(id) => {
                if let Some(n) = state.notifications.iter_mut().find(|n| n.id == id) {
                    n.read = true;
                }
            }
            Self::ClearNotifications => state.notifications.clear(),
            Self::ToggleSidebar => state.sidebar_collapsed = !state.sidebar_collapsed,
            Self::SetLoading(loading) => state.loading = loading,
            Self::SetError(error) => state.error = error,
        }
        None
    }

    /// The preference entry this mutation writes through, if any.
    pub(crate) fn persisted(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::SetTheme(theme) => Some((THEME_KEY, theme.as_str())),
            Self::SetDirection(direction) => Some((DIRECTION_KEY, direction.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(mutation: Mutation, state: &mut AppState) -> Option<NotificationId> {
        let next = state.notifications.len() as NotificationId + 1;
        mutation.apply(state, || next)
    }

    #[test]
    fn test_set_user_keeps_auth_flag_in_sync() {
        let mut state = AppState::default();
        apply(Mutation::SetUser(Some(User::new(1, "Ali"))), &mut state);
        assert!(state.is_authenticated);

        apply(Mutation::SetUser(None), &mut state);
        assert!(!state.is_authenticated);
        assert!(state.user.is_none());
    }

    #[test]
    fn test_remove_and_mark_read_by_id() {
        let mut state = AppState::default();
        for i in 1..=3 {
            let id = apply(
                Mutation::AddNotification(NotificationDraft::info(format!("n{}", i))),
                &mut state,
            );
            assert_eq!(id, Some(i));
        }

        apply(Mutation::RemoveNotification(2), &mut state);
        apply(Mutation::MarkNotificationRead(3), &mut state);
        apply(Mutation::MarkNotificationRead(42), &mut state);

        let ids: Vec<_> = state.notifications.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(!state.notifications[0].read);
        assert!(state.notifications[1].read);
    }

    #[test]
    fn test_add_notification_uses_assigned_id() {
        let mut state = AppState::default();
        let id = Mutation::AddNotification(NotificationDraft::warning("disk full"))
            .apply(&mut state, || 41);

        assert_eq!(id, Some(41));
        assert_eq!(state.notifications[0].id, 41);
        assert_eq!(state.notifications[0].message, "disk full");
        assert!(!state.notifications[0].read);
        assert_eq!(apply(Mutation::ToggleSidebar, &mut state), None);
    }

    #[test]
    fn test_toggle_sidebar_twice() {
        let mut state = AppState::default();
        apply(Mutation::ToggleSidebar, &mut state);
        assert!(state.sidebar_collapsed);
        apply(Mutation::ToggleSidebar, &mut state);
        assert!(!state.sidebar_collapsed);
    }

    #[test]
    fn test_named_form_deserializes() {
        let m: Mutation =
            serde_json::from_value(serde_json::json!({"type": "setTheme", "payload": "dark"}))
                .unwrap();
        assert_eq!(m, Mutation::SetTheme(Theme::Dark));

        let m: Mutation =
            serde_json::from_value(serde_json::json!({"type": "toggleSidebar"})).unwrap();
        assert_eq!(m, Mutation::ToggleSidebar);

        let m: Mutation = serde_json::from_value(serde_json::json!({
            "type": "addNotification",
            "payload": {"message": "Saved", "type": "success"}
        }))
        .unwrap();
        assert_eq!(m, Mutation::AddNotification(NotificationDraft::success("Saved")));
    }

    #[test]
    fn test_only_appearance_is_persisted() {
        assert_eq!(
            Mutation::SetTheme(Theme::Dark).persisted(),
            Some((THEME_KEY, "dark"))
        );
        assert_eq!(Mutation::SetLoading(true).persisted(), None);
    }
}
