//! Transient toast messages shown alongside store notifications.
//!
//! [`ToastQueue`] is the in-memory [`Toaster`]; hosts with a real surface
//! implement the trait themselves.

use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::Instant;

use crate::model::NotificationKind;

/// Default duration for toast notifications.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(5);

/// Toast notification level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToastLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl From<NotificationKind> for ToastLevel {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Info => Self::Info,
            NotificationKind::Success => Self::Success,
            NotificationKind::Warning => Self::Warning,
            NotificationKind::Error => Self::Error,
        }
    }
}

/// A toast notification.
///
/// A zero `duration` keeps the toast until it is dismissed.
///
/// # Example
///
/// ```ignore
/// toaster.show(Toast::error("Connection failed"));
/// toaster.show(Toast::success("Saved").with_duration(Duration::from_secs(2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        Self {
            message: message.into(),
            level,
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Error)
    }

    /// Set a custom duration for this toast.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn is_sticky(&self) -> bool {
        self.duration.is_zero()
    }
}

impl From<String> for Toast {
    fn from(message: String) -> Self {
        Toast::info(message)
    }
}

impl From<&str> for Toast {
    fn from(message: &str) -> Self {
        Toast::info(message)
    }
}

/// Identifier of a shown toast, used to dismiss it early.
pub type ToastId = u64;

/// Surface that displays toasts.
pub trait Toaster: Send + Sync {
    fn show(&self, toast: Toast) -> ToastId;

    /// Removes a toast before its duration elapses. Unknown ids are ignored.
    fn dismiss(&self, id: ToastId);

    /// Removes every toast currently shown.
    fn clear(&self);
}

#[derive(Debug)]
struct ActiveToast {
    id: ToastId,
    toast: Toast,
    shown_at: Instant,
}

impl ActiveToast {
    fn is_expired(&self, now: Instant) -> bool {
        !self.toast.is_sticky() && now.duration_since(self.shown_at) >= self.toast.duration
    }
}

/// In-memory toast stack.
///
/// Expired toasts are dropped lazily when the stack is read.
#[derive(Debug, Default)]
pub struct ToastQueue {
    next_id: AtomicU64,
    active: Mutex<Vec<ActiveToast>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the toasts currently on screen, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        let now = Instant::now();
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        active.retain(|t| !t.is_expired(now));
        active.iter().map(|t| t.toast.clone()).collect()
    }
}

impl Toaster for ToastQueue {
    fn show(&self, toast: Toast) -> ToastId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        log::debug!("ToastQueue: showing toast {} ({:?})", id, toast.level);
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(ActiveToast {
                id,
                toast,
                shown_at: Instant::now(),
            });
        id
    }

    fn dismiss(&self, id: ToastId) {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .retain(|t| t.id != id);
    }

    fn clear(&self) {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}
