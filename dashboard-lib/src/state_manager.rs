//! Binds the store to the document root.
//!
//! The theme is reflected as the `dark` class and the text direction as the
//! `dir` attribute of the root element, at init and after every commit.

use std::sync::Arc;

use crate::dom::DARK_CLASS;
use crate::dom::DIR_ATTRIBUTE;
use crate::dom::Dom;
use crate::dom::ROOT_ID;
use crate::error::ActionError;
use crate::model::AppState;
use crate::store::Action;
use crate::store::ActionOutput;
use crate::store::Getter;
use crate::store::GetterValue;
use crate::store::Mutation;
use crate::store::Store;
use crate::store::Subscription;

/// Side-effect adapter between a [`Store`] and a [`Dom`].
pub struct StateManager {
    store: Store,
    subscription: Subscription,
}

impl StateManager {
    /// Applies the current appearance and keeps it in sync with the store.
    pub fn init(store: Store, dom: Arc<dyn Dom>) -> Self {
        apply_appearance(dom.as_ref(), &store.state());

        let subscription = store.subscribe(move |state| apply_appearance(dom.as_ref(), state));

        Self {
            store,
            subscription,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub async fn dispatch(&self, action: Action) -> Result<ActionOutput, ActionError> {
        self.store.dispatch(action).await
    }

    pub fn commit(&self, mutation: Mutation) {
        self.store.commit(mutation);
    }

    pub fn get(&self, getter: Getter) -> GetterValue {
        self.store.get(getter)
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&AppState) + Send + Sync + 'static,
    {
        self.store.subscribe(callback)
    }

    /// Stops reflecting state changes onto the document.
    pub fn dispose(&self) {
        self.subscription.unsubscribe();
    }
}

fn apply_appearance(dom: &dyn Dom, state: &AppState) {
    if let Err(e) = dom.toggle_class(ROOT_ID, DARK_CLASS, state.theme.is_dark()) {
        log::warn!("StateManager: cannot apply theme: {}", e);
        return;
    }
    if let Err(e) = dom.set_attribute(ROOT_ID, DIR_ATTRIBUTE, state.direction.as_str()) {
        log::warn!("StateManager: cannot apply direction: {}", e);
    }
}
