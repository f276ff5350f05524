use crate::EventEmitter;

use super::{Notification, Notifier};

/// Forwards notifications to in-process listeners through an `EventEmitter`.
///
/// Each notification is emitted under `notification.<kind>` with the message
/// as payload.
pub struct EmitterNotifier {
    emitter: EventEmitter,
}

impl EmitterNotifier {
    pub fn new(emitter: EventEmitter) -> Self {
        EmitterNotifier { emitter }
    }

    pub fn event_name(notification: &Notification) -> String {
        format!("notification.{}", notification.kind)
    }

    pub fn emitter_mut(&mut self) -> &mut EventEmitter {
        &mut self.emitter
    }
}

impl Notifier for EmitterNotifier {
    fn notify(&mut self, notification: Notification) {
        let event = Self::event_name(&notification);
        self.emitter.emit(&event, notification.message);
    }
}
