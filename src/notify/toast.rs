use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use super::{Notification, NotificationKind, Notifier};

/// How long a toast stays visible unless configured otherwise.
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(3);

/// One raised notification with its display window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub raised_at: SystemTime,
    pub expires_at: SystemTime,
}

impl Toast {
    pub fn is_active_at(&self, now: SystemTime) -> bool {
        now < self.expires_at
    }
}

/// A stack of toasts that auto-dismiss after a fixed ttl.
///
/// Nothing runs in the background: expiry is evaluated against the `now`
/// passed to [`active_at`](Self::active_at) and
/// [`prune_expired`](Self::prune_expired). Each push prunes toasts that had
/// already expired; toasts still on screen are never dropped.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    ttl: Duration,
    next_id: u64,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastQueue {
    pub fn new() -> Self {
        ToastQueue {
            toasts: Vec::new(),
            ttl: DEFAULT_TOAST_TTL,
            next_id: 1,
        }
    }

    /// Set the display window for toasts raised from now on.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Raise a toast as of `now`. Returns its id.
    pub fn push_at(&mut self, notification: Notification, now: SystemTime) -> u64 {
        self.prune_expired(now);
        let id = self.next_id;
        self.next_id += 1;
        let expires_at = now.checked_add(self.ttl).unwrap_or(now);
        self.toasts.push(Toast {
            id,
            kind: notification.kind,
            message: notification.message,
            raised_at: now,
            expires_at,
        });
        id
    }

    /// Toasts still on screen at `now`, oldest first.
    pub fn active_at(&self, now: SystemTime) -> Vec<&Toast> {
        self.toasts
            .iter()
            .filter(|toast| toast.is_active_at(now))
            .collect()
    }

    /// Toasts still on screen right now.
    pub fn active(&self) -> Vec<&Toast> {
        self.active_at(SystemTime::now())
    }

    /// Forget toasts that expired by `now`. Returns how many were removed.
    pub fn prune_expired(&mut self, now: SystemTime) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.is_active_at(now));
        before - self.toasts.len()
    }

    /// Close one toast early (the user clicked it away).
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        before != self.toasts.len()
    }

    /// Every toast not yet pruned or dismissed, expired or not.
    pub fn all(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, notification: Notification) {
        self.push_at(notification, SystemTime::now());
    }
}
