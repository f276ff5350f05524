use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::notify::{ToastQueue, DEFAULT_TOAST_TTL};

/// Per-manager settings. Every field has a default, so a partial JSON
/// object (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Overrides the entity's noun in notification messages.
    pub noun: Option<String>,
    /// Raise an error notification when a mutation targets a missing record
    /// or an illegal transition.
    pub notify_failures: bool,
    /// Display window for toasts built by [`ManagerConfig::toast_queue`].
    pub toast_ttl_ms: u64,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        ManagerConfig {
            noun: None,
            notify_failures: true,
            toast_ttl_ms: DEFAULT_TOAST_TTL.as_millis() as u64,
        }
    }
}

impl ManagerConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_noun(mut self, noun: impl Into<String>) -> Self {
        self.noun = Some(noun.into());
        self
    }

    pub fn with_notify_failures(mut self, notify: bool) -> Self {
        self.notify_failures = notify;
        self
    }

    pub fn with_toast_ttl(mut self, ttl: Duration) -> Self {
        self.toast_ttl_ms = ttl.as_millis() as u64;
        self
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }

    /// A toast queue using this configuration's display window.
    pub fn toast_queue(&self) -> ToastQueue {
        ToastQueue::new().with_ttl(self.toast_ttl())
    }
}
