//! Asynchronous orchestration routines

use futures::future::BoxFuture;
use serde::Deserialize;

use super::Mutation;
use super::Store;
use crate::api::UserApi;
use crate::error::ActionError;
use crate::model::AppState;
use crate::model::Credentials;
use crate::model::NotificationDraft;
use crate::model::NotificationId;
use crate::model::User;
use crate::toast::DEFAULT_TOAST_DURATION;
use crate::toast::Toast;

/// Named routines run by [`Store::dispatch`].
///
/// Actions change state only by committing [`Mutation`]s.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Action {
    /// `POST /api/login`, then store the returned user.
    Login(Credentials),
    /// Forget the user and drop all notifications.
    Logout,
    /// Flip between light and dark.
    SwitchTheme,
    /// Flip between ltr and rtl.
    SwitchDirection,
    /// `GET /api/user`, then store the returned user.
    FetchUser,
    /// Record a notification, show it as a toast, and expire it after its
    /// duration.
    ShowNotification(NotificationDraft),
}

/// What a successful action hands back to its caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutput {
    None,
    User(User),
    Notification(NotificationId),
}

impl ActionOutput {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::User(user) => Some(user),
            _ => None,
        }
    }
}

/// The handle an action runs with: `commit`, `dispatch` and the current state.
pub struct ActionContext<'a> {
    store: &'a Store,
}

impl<'a> ActionContext<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn commit(&self, mutation: Mutation) {
        self.store.commit(mutation);
    }

    /// Runs another action to completion.
    pub fn dispatch(&self, action: Action) -> BoxFuture<'a, Result<ActionOutput, ActionError>> {
        Box::pin(self.store.dispatch(action))
    }

    /// Snapshot of the state at the time of the call.
    pub fn state(&self) -> AppState {
        self.store.state()
    }

    fn api(&self) -> &dyn UserApi {
        self.store.api()
    }
}

impl Action {
    /// Every name accepted by [`Store::dispatch_named`].
    pub const NAMES: [&'static str; 6] = [
        "login",
        "logout",
        "switchTheme",
        "switchDirection",
        "fetchUser",
        "showNotification",
    ];

    /// Name used in logs and by [`Store::dispatch_named`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Logout => "logout",
            Self::SwitchTheme => "switchTheme",
            Self::SwitchDirection => "switchDirection",
            Self::FetchUser => "fetchUser",
            Self::ShowNotification(_) => "showNotification",
        }
    }

    pub(crate) async fn run(self, cx: ActionContext<'_>) -> Result<ActionOutput, ActionError> {
        match self {
            Self::Login(credentials) => {
                cx.commit(Mutation::SetLoading(true));
                let result = match cx.api().login(&credentials).await {
                    Ok(user) => {
                        cx.commit(Mutation::SetUser(Some(user.clone())));
                        cx.commit(Mutation::SetError(None));
                        Ok(ActionOutput::User(user))
                    }
                    Err(e) => {
                        cx.commit(Mutation::SetError(Some(e.to_string())));
                        Err(e.into())
                    }
                };
                cx.commit(Mutation::SetLoading(false));
                result
            }
            Self::Logout => {
                cx.commit(Mutation::SetUser(None));
                cx.commit(Mutation::ClearNotifications);
                if let Some(toaster) = cx.store.toaster() {
                    toaster.clear();
                }
                Ok(ActionOutput::None)
            }
            Self::SwitchTheme => {
                let theme = cx.state().theme.toggled();
                cx.commit(Mutation::SetTheme(theme));
                Ok(ActionOutput::None)
            }
            Self::SwitchDirection => {
                let direction = cx.state().direction.toggled();
                cx.commit(Mutation::SetDirection(direction));
                Ok(ActionOutput::None)
            }
            Self::FetchUser => {
                cx.commit(Mutation::SetLoading(true));
                let result = match cx.api().fetch_user().await {
                    Ok(user) => {
                        cx.commit(Mutation::SetUser(Some(user.clone())));
                        Ok(ActionOutput::User(user))
                    }
                    Err(e) => {
                        cx.commit(Mutation::SetError(Some(e.to_string())));
                        Err(e.into())
                    }
                };
                cx.commit(Mutation::SetLoading(false));
                result
            }
            Self::ShowNotification(draft) => {
                let id = cx.store.add_notification(draft.clone());

                if let Some(toaster) = cx.store.toaster() {
                    let duration = draft.duration.unwrap_or(DEFAULT_TOAST_DURATION);
                    let toast = Toast::new(draft.message.clone(), draft.kind.into());
                    toaster.show(toast.with_duration(duration));
                }

                if let Some(delay) = draft.expiry() {
                    cx.store.schedule_removal(id, delay);
                }

                Ok(ActionOutput::Notification(id))
            }
        }
    }
}
