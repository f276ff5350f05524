//! Toast stacking, expiry, and notifier sharing between managers.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use attune_records::entities::resource::{self, ResourceAllocation};
use attune_records::entities::stakeholder::{self, Stakeholder};
use attune_records::{
    LogNotifier, ManagerConfig, Notification, NotificationKind, Notifier, RecordId, RecordManager,
    ToastQueue,
};

#[test]
fn toasts_stack_and_expire() {
    let config = ManagerConfig::default();
    let toasts = Rc::new(RefCell::new(config.toast_queue()));

    let mut allocations = RecordManager::seeded(resource::fixture())
        .unwrap()
        .with_notifier(Rc::clone(&toasts));
    let mut stakeholders = RecordManager::seeded(stakeholder::fixture())
        .unwrap()
        .with_notifier(Rc::clone(&toasts));

    allocations.delete(RecordId(5)).unwrap();
    stakeholders.delete(RecordId(6)).unwrap();
    allocations.delete(RecordId(6)).unwrap();
    let now = SystemTime::now();

    let queue = toasts.borrow();
    let active: Vec<_> = queue.active_at(now).iter().map(|t| t.message.clone()).collect();
    assert_eq!(
        active,
        vec![
            "Resource allocation \"Member Feedback Survey\" deleted",
            "Stakeholder \"State Credit Union Examiner\" deleted",
            "Resource allocation \"Staff Financial Counseling Training\" deleted",
        ]
    );
    assert!(queue.active_at(now + Duration::from_secs(4)).is_empty());
    assert_eq!(queue.len(), 3);
}

#[test]
fn separate_queues_stay_separate() {
    let mut allocations = RecordManager::<ResourceAllocation>::seeded(resource::fixture())
        .unwrap()
        .with_notifier(ToastQueue::new());
    let mut stakeholders = RecordManager::<Stakeholder>::seeded(stakeholder::fixture())
        .unwrap()
        .with_notifier(ToastQueue::new());

    allocations.delete(RecordId(1)).unwrap();
    assert_eq!(allocations.notifier().len(), 1);
    assert!(stakeholders.notifier().is_empty());

    stakeholders.delete(RecordId(1)).unwrap();
    let (_, queue) = stakeholders.into_parts();
    assert_eq!(queue.latest().unwrap().kind, NotificationKind::Success);
}

#[test]
fn configured_ttl_and_pruning() {
    let config = ManagerConfig::from_json(r#"{"toast_ttl_ms": 1000}"#).unwrap();
    let mut queue = config.toast_queue();
    let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);

    let first = queue.push_at(Notification::info("first"), start);
    queue.push_at(Notification::info("second"), start + Duration::from_millis(800));

    assert!(queue.dismiss(first));
    assert_eq!(queue.active_at(start + Duration::from_millis(900)).len(), 1);
    assert_eq!(queue.prune_expired(start + Duration::from_millis(1_800)), 1);
    assert!(queue.is_empty());
}

#[test]
fn fan_out_to_two_notifiers() {
    let mut both = (ToastQueue::new(), Vec::<Notification>::new());
    both.notify(Notification::success("saved"));
    assert_eq!(both.0.len(), 1);
    assert_eq!(both.1[0].message, "saved");
}

#[test]
fn toasts_and_logs_together() {
    let mut manager = RecordManager::seeded(resource::fixture())
        .unwrap()
        .with_notifier((ToastQueue::new(), LogNotifier::scoped("resource-allocation")));
    manager.delete(RecordId(2)).unwrap();
    assert!(manager.delete(RecordId(2)).is_err());

    let (toasts, _log) = manager.notifier();
    let kinds: Vec<_> = toasts.all().iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::Success, NotificationKind::Error]);
}

#[cfg(feature = "emitter")]
#[test]
fn emitter_listeners_hear_mutations() {
    use attune_records::{EmitterNotifier, EventEmitter};
    use std::sync::mpsc;

    let mut emitter = EventEmitter::new();
    let (tx, rx) = mpsc::channel::<String>();
    emitter.on("notification.success", move |message: String| {
        tx.send(message).unwrap();
    });

    let mut manager = RecordManager::seeded(stakeholder::fixture())
        .unwrap()
        .with_notifier(EmitterNotifier::new(emitter));
    manager.delete(RecordId(3)).unwrap();

    let message = rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(message, "Stakeholder \"Priya Raman\" deleted");
}
