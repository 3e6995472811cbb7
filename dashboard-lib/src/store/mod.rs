//! Observable application store.
//!
//! A [`Store`] owns the [`AppState`] record and is the single choke point for
//! changing it:
//!
//! - [`Mutation`]s are applied synchronously by [`Store::commit`], which then
//!   notifies every subscriber with a snapshot of the post-state.
//! - [`Action`]s run asynchronously via [`Store::dispatch`] and change state
//!   only by committing mutations. A failing action records its error into
//!   `AppState::error` and also returns it.
//! - [`Getter`]s derive values from the state; results are cached until the
//!   next commit or [`Store::clear_cache`].
//!
//! # Example
//!
//! ```ignore
//! use dashboard_lib::store::{Action, Getter, Mutation, Store};
//!
//! let store = Store::create(prefs, api);
//! let sub = store.subscribe(|state| println!("theme is now {}", state.theme));
//!
//! store.commit(Mutation::ToggleSidebar);
//! let user = store.dispatch(Action::Login(credentials)).await?;
//! let name = store.get(Getter::UserName);
//!
//! sub.unsubscribe();
//! store.dispose();
//! ```

mod action;
mod getter;
mod mutation;
mod subscription;

pub use action::*;
pub use getter::*;
pub use mutation::*;
pub use subscription::Subscription;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use subscription::Subscriber;
use subscription::SubscriberId;

use crate::api::UserApi;
use crate::error::ActionError;
use crate::model::AppState;
use crate::model::Direction;
use crate::model::NotificationDraft;
use crate::model::NotificationId;
use crate::model::Theme;
use crate::prefs::DIRECTION_KEY;
use crate::prefs::MemoryPreferences;
use crate::prefs::PreferenceStore;
use crate::prefs::THEME_KEY;
use crate::toast::Toaster;

/// The application store.
///
/// Cheap to clone (uses `Arc` internally); clones share the same state.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

pub(crate) struct StoreInner {
    state: RwLock<AppState>,
    cache: DashMap<Getter, GetterValue>,
    subscribers: Mutex<Vec<(SubscriberId, Subscriber)>>,
    next_subscriber_id: AtomicU64,
    next_notification_id: AtomicU64,
    timers: Mutex<Vec<JoinHandle<()>>>,
    disposed: AtomicBool,
    prefs: Arc<dyn PreferenceStore>,
    api: Arc<dyn UserApi>,
    toaster: Option<Arc<dyn Toaster>>,
}

impl StoreInner {
    fn remove_subscriber(&self, id: SubscriberId) {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .retain(|(sid, _)| *sid != id);
    }
}

impl Store {
    /// Creates a new builder; `api` backs the network actions.
    pub fn builder(api: Arc<dyn UserApi>) -> StoreBuilder {
        StoreBuilder::new(api)
    }

    /// Creates a store whose initial appearance comes from `prefs`.
    pub fn create(prefs: Arc<dyn PreferenceStore>, api: Arc<dyn UserApi>) -> Self {
        StoreBuilder::new(api).preferences(prefs).build()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.read_state().clone()
    }

    /// Applies `mutation`, then notifies every subscriber with the post-state.
    ///
    /// The getter cache is cleared in the same critical section as the
    /// mutation, so no getter result computed from the old state survives.
    pub fn commit(&self, mutation: Mutation) {
        self.apply(mutation);
    }

    /// Commits `AddNotification(draft)` and returns the id it was given.
    pub(crate) fn add_notification(&self, draft: NotificationDraft) -> NotificationId {
        self.apply(Mutation::AddNotification(draft))
            .unwrap_or_default()
    }

    fn apply(&self, mutation: Mutation) -> Option<NotificationId> {
        log::debug!("Store: commit {}", mutation.name());
        let persisted = mutation.persisted();

        let (assigned, snapshot) = {
            let mut state = self.write_state();
            // Ids are handed out under the write lock, so list order matches id order.
            let assigned = mutation.apply(&mut state, || self.next_notification_id());
            self.inner.cache.clear();
            (assigned, state.clone())
        };

        if let Some((key, value)) = persisted
            && let Err(e) = self.inner.prefs.set(key, value)
        {
            log::warn!("Store: failed to persist preference '{}': {}", key, e);
        }

        self.notify(&snapshot);
        assigned
    }

    /// Commits a mutation given by name and JSON payload.
    ///
    /// Unknown names and malformed payloads are logged and ignored.
    pub fn commit_named(&self, name: &str, payload: serde_json::Value) {
        if !Mutation::NAMES.contains(&name) {
            log::warn!("Mutation \"{}\" not found", name);
            return;
        }
        match decode_named::<Mutation>(name, payload) {
            Ok(mutation) => self.commit(mutation),
            Err(e) => log::warn!("Mutation \"{}\" rejected, invalid payload: {}", name, e),
        }
    }

    /// Runs `action` and forwards its result.
    pub async fn dispatch(&self, action: Action) -> Result<ActionOutput, ActionError> {
        log::debug!("Store: dispatch {}", action.name());
        action.run(ActionContext::new(self)).await
    }

    /// Dispatches an action given by name and JSON payload.
    ///
    /// Unknown names are logged and resolve to [`ActionOutput::None`]. A known
    /// action whose payload does not decode fails with
    /// [`ActionError::InvalidPayload`] without running.
    pub async fn dispatch_named(
        &self,
        name: &str,
        payload: serde_json::Value,
    ) -> Result<ActionOutput, ActionError> {
        if !Action::NAMES.contains(&name) {
            log::warn!("Action \"{}\" not found", name);
            return Ok(ActionOutput::None);
        }
        match decode_named::<Action>(name, payload) {
            Ok(action) => self.dispatch(action).await,
            Err(e) => {
                log::warn!("Action \"{}\" rejected, invalid payload: {}", name, e);
                Err(ActionError::InvalidPayload {
                    action: name.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// Registers `callback` to receive a snapshot after every future commit.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&AppState) + Send + Sync + 'static,
    {
        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((id, Arc::new(callback)));
        Subscription::new(id, &self.inner)
    }

    /// Returns the cached value for `getter`, computing it on a miss.
    pub fn get(&self, getter: Getter) -> GetterValue {
        // Holding the read lock keeps a concurrent commit from clearing the
        // cache between compute and insert.
        let state = self.read_state();
        self.inner
            .cache
            .entry(getter)
            .or_insert_with(|| getter.compute(&state))
            .value()
            .clone()
    }

    /// Looks a getter up by name. Unknown names are logged and yield `None`.
    pub fn get_named(&self, name: &str) -> Option<GetterValue> {
        match Getter::from_name(name) {
            Some(getter) => Some(self.get(getter)),
            None => {
                log::warn!("Getter \"{}\" not found", name);
                None
            }
        }
    }

    /// Empties the getter cache.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// Tears the store down: drops all subscribers, empties the cache and
    /// cancels pending notification timers.
    ///
    /// The state stays readable; later commits notify nobody.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        log::debug!("Store: dispose");
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
        self.inner.cache.clear();
        for timer in self
            .inner
            .timers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .drain(..)
        {
            timer.abort();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    pub(crate) fn api(&self) -> &dyn UserApi {
        self.inner.api.as_ref()
    }

    pub(crate) fn toaster(&self) -> Option<&dyn Toaster> {
        self.inner.toaster.as_deref()
    }

    fn next_notification_id(&self) -> NotificationId {
        self.inner.next_notification_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Commits `RemoveNotification(id)` once `delay` has elapsed.
    pub(crate) fn schedule_removal(&self, id: NotificationId, delay: Duration) {
        if self.is_disposed() {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("Store: no async runtime, notification {} will not expire", id);
            return;
        };

        let weak = Arc::downgrade(&self.inner);
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                Store { inner }.commit(Mutation::RemoveNotification(id));
            }
        });

        let mut timers = self
            .inner
            .timers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        timers.retain(|t| !t.is_finished());
        timers.push(handle);
    }

    fn notify(&self, snapshot: &AppState) {
        // Callbacks run outside the lock so they may commit or unsubscribe.
        let subscribers: Vec<Subscriber> = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in subscribers {
            callback(snapshot);
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, AppState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, AppState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.read_state())
            .field("cached_getters", &self.inner.cache.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Builds the adjacently tagged form `{"type": name, "payload": payload}`.
fn decode_named<T: DeserializeOwned>(
    name: &str,
    payload: serde_json::Value,
) -> Result<T, serde_json::Error> {
    let mut object = serde_json::Map::new();
    object.insert("type".to_string(), serde_json::Value::String(name.to_string()));
    if !payload.is_null() {
        object.insert("payload".to_string(), payload);
    }
    serde_json::from_value(serde_json::Value::Object(object))
}

/// Builder for a [`Store`].
pub struct StoreBuilder {
    api: Arc<dyn UserApi>,
    prefs: Option<Arc<dyn PreferenceStore>>,
    toaster: Option<Arc<dyn Toaster>>,
    state: Option<AppState>,
}

impl StoreBuilder {
    pub fn new(api: Arc<dyn UserApi>) -> Self {
        Self {
            api,
            prefs: None,
            toaster: None,
            state: None,
        }
    }

    /// Sets the preference store used for the initial appearance and for
    /// persisting theme/direction changes. Defaults to an in-memory store.
    pub fn preferences(mut self, prefs: Arc<dyn PreferenceStore>) -> Self {
        self.prefs = Some(prefs);
        self
    }

    /// Sets the surface `ShowNotification` forwards toasts to.
    pub fn toaster(mut self, toaster: Arc<dyn Toaster>) -> Self {
        self.toaster = Some(toaster);
        self
    }

    /// Replaces the initial state instead of deriving it from preferences.
    pub fn state(mut self, state: AppState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn build(self) -> Store {
        let prefs = self
            .prefs
            .unwrap_or_else(|| Arc::new(MemoryPreferences::new()));
        let state = self
            .state
            .unwrap_or_else(|| initial_state(prefs.as_ref()));
        let last_notification_id = state.notifications.iter().map(|n| n.id).max().unwrap_or(0);

        Store {
            inner: Arc::new(StoreInner {
                state: RwLock::new(state),
                cache: DashMap::new(),
                subscribers: Mutex::new(Vec::new()),
                next_subscriber_id: AtomicU64::new(0),
                next_notification_id: AtomicU64::new(last_notification_id),
                timers: Mutex::new(Vec::new()),
                disposed: AtomicBool::new(false),
                prefs,
                api: self.api,
                toaster: self.toaster,
            }),
        }
    }
}

fn initial_state(prefs: &dyn PreferenceStore) -> AppState {
    let theme = read_pref::<Theme>(prefs, THEME_KEY);
    let direction = read_pref::<Direction>(prefs, DIRECTION_KEY);
    AppState::with_appearance(theme, direction)
}

fn read_pref<T>(prefs: &dyn PreferenceStore, key: &str) -> T
where
    T: std::str::FromStr + Default,
    T::Err: std::fmt::Display,
{
    match prefs.get(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            log::warn!("Ignoring stored {} preference: {}", key, e);
            T::default()
        }),
        None => T::default(),
    }
}
