//! Mutation notifications - transient confirmations raised after a record
//! manager commits (or refuses) a change.
//!
//! A [`Notifier`] is handed to each manager explicitly. Notifying cannot fail
//! and never affects the mutation it reports on. Two managers share a queue
//! only when the caller gives both the same `Rc<RefCell<_>>` handle.

#[cfg(feature = "emitter")]
mod emitter;
mod log;
mod toast;

#[cfg(feature = "emitter")]
pub use emitter::EmitterNotifier;
pub use log::LogNotifier;
pub use toast::{Toast, ToastQueue, DEFAULT_TOAST_TTL};

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

crate::choice! {
    /// Severity of a notification.
    pub enum NotificationKind {
        Success => "success",
        Error => "error",
        Info => "info",
    }
}

/// A short, human-readable message about one mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Notification {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }
}

/// Receives notifications. Implementations must not panic.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Notifier for Silent {
    fn notify(&mut self, _notification: Notification) {}
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Explicitly shared notifier (e.g. one toast stack for a whole page).
impl<N: Notifier> Notifier for Rc<RefCell<N>> {
    fn notify(&mut self, notification: Notification) {
        self.borrow_mut().notify(notification);
    }
}

/// Collects notifications in memory, in order.
impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Fan out to two notifiers, e.g. a toast stack plus a log.
impl<A: Notifier, B: Notifier> Notifier for (A, B) {
    fn notify(&mut self, notification: Notification) {
        self.0.notify(notification.clone());
        self.1.notify(notification);
    }
}
