use tracing::{info, warn};

use super::{Notification, NotificationKind, Notifier};

/// Writes notifications to the `tracing` pipeline.
///
/// Errors go out at `warn`, everything else at `info`.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    scope: Option<String>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every line with a scope (e.g. the page the manager lives on).
    pub fn scoped(scope: impl Into<String>) -> Self {
        LogNotifier {
            scope: Some(scope.into()),
        }
    }
}

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: Notification) {
        let scope = self.scope.as_deref().unwrap_or("-");
        match notification.kind {
            NotificationKind::Error => {
                warn!(scope, kind = %notification.kind, "{}", notification.message)
            }
            _ => info!(scope, kind = %notification.kind, "{}", notification.message),
        }
    }
}
