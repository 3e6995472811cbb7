//! Subscriber registration

use std::sync::Arc;
use std::sync::Weak;

use super::StoreInner;
use crate::model::AppState;

/// Callback invoked with a snapshot after every commit.
pub(crate) type Subscriber = Arc<dyn Fn(&AppState) + Send + Sync>;

/// Identifies one registered subscriber.
pub(crate) type SubscriberId = u64;

/// Handle returned by [`Store::subscribe`](super::Store::subscribe).
///
/// Dropping the handle does not unsubscribe; call
/// [`unsubscribe`](Self::unsubscribe).
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    id: SubscriberId,
    store: Weak<StoreInner>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriberId, store: &Arc<StoreInner>) -> Self {
        Self {
            id,
            store: Arc::downgrade(store),
        }
    }

    /// Removes exactly this subscriber. Calling it again is harmless.
    pub fn unsubscribe(&self) {
        if let Some(store) = self.store.upgrade() {
            store.remove_subscriber(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
