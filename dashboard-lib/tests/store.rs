//! Integration tests for the observable store.

mod common;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use common::StubApi;
use dashboard_lib::error::ActionError;
use dashboard_lib::model::AppState;
use dashboard_lib::model::Direction;
use dashboard_lib::model::Notification;
use dashboard_lib::model::NotificationDraft;
use dashboard_lib::model::Theme;
use dashboard_lib::model::User;
use dashboard_lib::prefs::MemoryPreferences;
use dashboard_lib::prefs::PreferenceStore;
use dashboard_lib::store::Action;
use dashboard_lib::store::ActionOutput;
use dashboard_lib::store::Getter;
use dashboard_lib::store::GetterValue;
use dashboard_lib::store::Mutation;
use dashboard_lib::store::Store;
use dashboard_lib::toast::ToastQueue;
use serde_json::json;

fn store() -> Store {
    Store::create(Arc::new(MemoryPreferences::new()), Arc::new(StubApi::default()))
}

fn counting_subscriber(store: &Store) -> (Arc<Mutex<Vec<AppState>>>, dashboard_lib::store::Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let sub = store.subscribe(move |state| sink.lock().unwrap().push(state.clone()));
    (seen, sub)
}

#[test]
fn test_defaults_without_preferences() {
    let state = store().state();
    assert_eq!(state.theme, Theme::Light);
    assert_eq!(state.direction, Direction::Rtl);
    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
    assert!(state.notifications.is_empty());
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[test]
fn test_initial_appearance_from_preferences() {
    let prefs = MemoryPreferences::new()
        .with("theme", "dark")
        .with("direction", "ltr");
    let store = Store::create(Arc::new(prefs), Arc::new(StubApi::default()));

    assert_eq!(store.state().theme, Theme::Dark);
    assert_eq!(store.state().direction, Direction::Ltr);
}

#[test]
fn test_garbage_preference_falls_back_to_default() {
    let prefs = MemoryPreferences::new().with("theme", "purple");
    let store = Store::create(Arc::new(prefs), Arc::new(StubApi::default()));
    assert_eq!(store.state().theme, Theme::Light);
}

#[test]
fn test_commit_notifies_each_subscriber_once_with_post_state() {
    let store = store();
    let (first, _a) = counting_subscriber(&store);
    let (second, _b) = counting_subscriber(&store);

    store.commit(Mutation::ToggleSidebar);

    for seen in [first, second] {
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].sidebar_collapsed);
    }
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let store = store();
    let (seen, sub) = counting_subscriber(&store);
    let (other, _keep) = counting_subscriber(&store);

    store.commit(Mutation::SetLoading(true));
    sub.unsubscribe();
    sub.unsubscribe();
    store.commit(Mutation::SetLoading(false));

    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(other.lock().unwrap().len(), 2);
}

#[test]
fn test_subscriber_may_commit_reentrantly() {
    let store = store();
    let calls = Arc::new(AtomicUsize::new(0));
    let inner = store.clone();
    let counter = calls.clone();
    let _sub = store.subscribe(move |state| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 && state.loading {
            inner.commit(Mutation::SetLoading(false));
        }
    });

    store.commit(Mutation::SetLoading(true));

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(!store.state().loading);
}

#[test]
fn test_set_user_keeps_authentication_in_sync() {
    let store = store();
    store.commit(Mutation::SetUser(Some(User::new(7, "Mona"))));
    assert!(store.state().is_authenticated);

    store.commit(Mutation::SetUser(None));
    assert!(!store.state().is_authenticated);
    assert!(store.state().user.is_none());
}

#[test]
fn test_getters() {
    let store = store();
    assert_eq!(store.get(Getter::IsLoggedIn), GetterValue::Bool(false));
    assert_eq!(store.get(Getter::UserName).as_text(), Some(""));
    assert_eq!(store.get(Getter::UserRole).as_text(), Some("guest"));
    assert_eq!(store.get(Getter::IsRtl), GetterValue::Bool(true));

    store.commit(Mutation::SetUser(Some(User::new(1, "Ali").with_role("admin"))));
    store.commit(Mutation::SetTheme(Theme::Dark));

    assert_eq!(store.get(Getter::IsLoggedIn), GetterValue::Bool(true));
    assert_eq!(store.get(Getter::UserName).as_text(), Some("Ali"));
    assert_eq!(store.get(Getter::UserRole).as_text(), Some("admin"));
    assert_eq!(store.get(Getter::IsDarkMode), GetterValue::Bool(true));
}

#[tokio::test]
async fn test_getter_cache_identity_and_invalidation() {
    let store = store();
    store
        .dispatch(Action::ShowNotification(NotificationDraft::info("hello")))
        .await
        .unwrap();

    let first = store.get(Getter::UnreadNotifications);
    let second = store.get(Getter::UnreadNotifications);
    assert!(Arc::ptr_eq(
        first.as_notifications().unwrap(),
        second.as_notifications().unwrap()
    ));

    store.clear_cache();
    let recomputed = store.get(Getter::UnreadNotifications);
    assert!(!Arc::ptr_eq(
        first.as_notifications().unwrap(),
        recomputed.as_notifications().unwrap()
    ));
    assert_eq!(first, recomputed);

    let id = store.state().notifications[0].id;
    store.commit(Mutation::MarkNotificationRead(id));
    let after_commit = store.get(Getter::UnreadNotifications);
    assert!(after_commit.as_notifications().unwrap().is_empty());
}

#[test]
fn test_theme_and_direction_are_persisted() {
    let prefs = Arc::new(MemoryPreferences::new());
    let store = Store::create(prefs.clone(), Arc::new(StubApi::default()));

    store.commit(Mutation::SetTheme(Theme::Dark));
    store.commit(Mutation::SetDirection(Direction::Ltr));

    assert_eq!(prefs.get("theme").as_deref(), Some("dark"));
    assert_eq!(prefs.get("direction").as_deref(), Some("ltr"));
}

#[tokio::test]
async fn test_switch_actions_flip_appearance() {
    let store = store();
    store.dispatch(Action::SwitchTheme).await.unwrap();
    store.dispatch(Action::SwitchDirection).await.unwrap();
    assert_eq!(store.state().theme, Theme::Dark);
    assert_eq!(store.state().direction, Direction::Ltr);

    store.dispatch(Action::SwitchTheme).await.unwrap();
    assert_eq!(store.state().theme, Theme::Light);
}

#[test]
fn test_commit_named() {
    let store = store();
    store.commit_named("setTheme", json!("dark"));
    store.commit_named("toggleSidebar", serde_json::Value::Null);
    assert_eq!(store.state().theme, Theme::Dark);
    assert!(store.state().sidebar_collapsed);
}

#[test]
fn test_unknown_mutation_name_is_a_noop() {
    let store = store();
    let (seen, _sub) = counting_subscriber(&store);
    let before = store.state();

    store.commit_named("doesNotExist", json!(1));
    store.commit_named("setTheme", json!("purple"));

    assert_eq!(store.state(), before);
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_dispatch_named() {
    let store = store();
    let out = store
        .dispatch_named(
            "showNotification",
            json!({"message": "Saved", "type": "success"}),
        )
        .await
        .unwrap();
    assert!(matches!(out, ActionOutput::Notification(_)));

    let unknown = store.dispatch_named("launchRockets", json!(null)).await.unwrap();
    assert_eq!(unknown, ActionOutput::None);
    assert_eq!(store.state().notifications.len(), 1);
}

#[tokio::test]
async fn test_dispatch_named_rejects_malformed_payload() {
    let api = Arc::new(StubApi::with_user(User::new(1, "Ali")));
    let store = Store::create(Arc::new(MemoryPreferences::new()), api.clone());

    let err = store
        .dispatch_named("login", json!({"email": "ali@example.com"}))
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::InvalidPayload { ref action, .. } if action == "login"));
    assert_eq!(err.status_code(), None);
    assert!(api.logins.lock().unwrap().is_empty());
    let state = store.state();
    assert!(state.user.is_none());
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[test]
fn test_added_notifications_get_distinct_increasing_ids() {
    let store = store();
    store.commit(Mutation::AddNotification(NotificationDraft::info("first")));
    store.commit(Mutation::AddNotification(NotificationDraft::error("second")));
    store.commit_named(
        "addNotification",
        json!({"message": "third", "type": "warning"}),
    );

    let ids: Vec<_> = store.state().notifications.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    store.commit(Mutation::RemoveNotification(1));
    let remaining: Vec<_> = store
        .state()
        .notifications
        .iter()
        .map(|n| n.message.clone())
        .collect();
    assert_eq!(remaining, vec!["second", "third"]);
}

#[test]
fn test_ids_continue_after_seeded_notifications() {
    let seeded = AppState {
        notifications: vec![Notification::new(7, &NotificationDraft::info("old"))],
        ..AppState::default()
    };
    let store = Store::builder(Arc::new(StubApi::default()))
        .state(seeded)
        .build();

    store.commit(Mutation::AddNotification(NotificationDraft::info("new")));

    let ids: Vec<_> = store.state().notifications.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![7, 8]);
}

#[tokio::test]
async fn test_action_and_commit_share_id_sequence() {
    let store = store();
    store.commit(Mutation::AddNotification(NotificationDraft::info("direct")));
    let out = store
        .dispatch(Action::ShowNotification(NotificationDraft::info("action")))
        .await
        .unwrap();

    assert_eq!(out, ActionOutput::Notification(2));
}

#[test]
fn test_get_named() {
    let store = store();
    assert_eq!(store.get_named("isRTL"), Some(GetterValue::Bool(true)));
    assert_eq!(store.get_named("nope"), None);
}

#[tokio::test]
async fn test_logout_clears_user_and_notifications() {
    let store = store();
    store.commit(Mutation::SetUser(Some(User::new(1, "Ali"))));
    store
        .dispatch(Action::ShowNotification(NotificationDraft::info("hi")))
        .await
        .unwrap();

    store.dispatch(Action::Logout).await.unwrap();

    let state = store.state();
    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
    assert!(state.notifications.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_logout_clears_toasts() {
    let toaster = Arc::new(ToastQueue::new());
    let store = Store::builder(Arc::new(StubApi::default()))
        .toaster(toaster.clone())
        .build();
    store
        .dispatch(Action::ShowNotification(NotificationDraft::info("Welcome")))
        .await
        .unwrap();
    assert_eq!(toaster.active().len(), 1);

    store.dispatch(Action::Logout).await.unwrap();

    assert!(toaster.active().is_empty());
    assert!(store.state().notifications.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_notification_expires_after_duration() {
    let toaster = Arc::new(ToastQueue::new());
    let store = Store::builder(Arc::new(StubApi::default()))
        .toaster(toaster.clone())
        .build();

    let out = store
        .dispatch(Action::ShowNotification(
            NotificationDraft::success("Saved").with_duration(Duration::from_millis(3000)),
        ))
        .await
        .unwrap();
    store
        .dispatch(Action::ShowNotification(NotificationDraft::warning("Sticky")))
        .await
        .unwrap();

    assert_eq!(out, ActionOutput::Notification(1));
    assert_eq!(store.state().notifications.len(), 2);
    assert_eq!(toaster.active().len(), 2);

    tokio::time::sleep(Duration::from_millis(2999)).await;
    assert_eq!(store.state().notifications.len(), 2);

    tokio::time::sleep(Duration::from_millis(2)).await;
    let remaining = store.state().notifications;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].message, "Sticky");
}

#[tokio::test(start_paused = true)]
async fn test_dispose_cancels_timers_and_subscribers() {
    let store = store();
    let (seen, _sub) = counting_subscriber(&store);
    store
        .dispatch(Action::ShowNotification(
            NotificationDraft::info("bye").with_duration(Duration::from_millis(100)),
        ))
        .await
        .unwrap();
    assert_eq!(seen.lock().unwrap().len(), 1);

    store.dispose();
    store.dispose();
    assert!(store.is_disposed());

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(store.state().notifications.len(), 1);

    store.commit(Mutation::ToggleSidebar);
    assert!(store.state().sidebar_collapsed);
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_dispatch_from_spawned_task() {
    let store = store();
    let inner = store.clone();
    let handle = tokio::spawn(async move {
        inner.dispatch(Action::SwitchTheme).await.unwrap();
        inner.dispatch(Action::Logout).await.unwrap();
    });
    handle.await.unwrap();
    assert_eq!(store.state().theme, Theme::Dark);
}
