//! Toasts and the order-confirmation modal.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// How long a toast stays up before auto-dismissing.
pub const TOAST_TTL: Duration = Duration::from_secs(3);

/// Visual flavor of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// An ephemeral, fire-and-forget notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// Blocking confirmation shown after a submission attempt resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderModal {
    /// The backend confirmed the order under this id.
    Placed { order_id: String },
    /// The backend's answer was unusable; the shopper decides between
    /// treating the order as placed and retrying.
    Unconfirmed,
}

/// Schedules toasts and the confirmation modal.
///
/// Toasts replace one another (latest wins) and auto-dismiss after
/// [`TOAST_TTL`]; the modal stays up until explicitly resolved. The dismiss
/// timer runs on the ambient tokio runtime.
#[derive(Clone, Default)]
pub struct NotificationCenter {
    inner: Arc<NotifyInner>,
}

#[derive(Default)]
struct NotifyInner {
    toast: Mutex<Option<Toast>>,
    toast_seq: AtomicU64,
    modal: Mutex<Option<OrderModal>>,
}

impl NotificationCenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast, replacing any current one.
    pub fn toast(&self, kind: ToastKind, message: impl Into<String>) {
        let message = message.into();
        let seq = self.inner.toast_seq.fetch_add(1, Ordering::SeqCst) + 1;
        *lock(&self.inner.toast) = Some(Toast { kind, message });

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(TOAST_TTL).await;
            // A newer toast owns the slot now; leave it alone
            if inner.toast_seq.load(Ordering::SeqCst) == seq {
                *lock(&inner.toast) = None;
            }
        });
    }

    /// The toast currently on screen, if any.
    #[must_use]
    pub fn current_toast(&self) -> Option<Toast> {
        lock(&self.inner.toast).clone()
    }

    /// Open the confirmation modal. Cart and checkout interaction is
    /// blocked while it is up.
    pub fn open_modal(&self, modal: OrderModal) {
        *lock(&self.inner.modal) = Some(modal);
    }

    /// The open modal, if any.
    #[must_use]
    pub fn modal(&self) -> Option<OrderModal> {
        lock(&self.inner.modal).clone()
    }

    #[must_use]
    pub fn is_modal_open(&self) -> bool {
        lock(&self.inner.modal).is_some()
    }

    /// Close the modal and return what was showing. Callers own the reset
    /// that goes with dismissal.
    pub fn close_modal(&self) -> Option<OrderModal> {
        lock(&self.inner.modal).take()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
