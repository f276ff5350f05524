//! Integration tests for request lifecycles, the form boundary, and
//! notifications across managers.

mod notifications;

use attune_records::entities::access_request::{self, AccessLevel, AccessRequest, AccessReview};
use attune_records::entities::provisioning::{self, ProvisioningRequest, ProvisioningWorkflow};
use attune_records::entities::stakeholder::{self, Stakeholder};
use attune_records::{
    AccessStatus, FormData, IntoForm, ManagerError, Notification, NotificationKind,
    ProvisioningStatus, RecordId, RecordManager, Tracked,
};

fn collected<T: attune_records::Entity>(
    manager: &RecordManager<T, Vec<Notification>>,
) -> Vec<(NotificationKind, &str)> {
    manager
        .notifier()
        .iter()
        .map(|n| (n.kind, n.message.as_str()))
        .collect()
}

#[test]
fn provisioning_only_moves_forward() {
    let mut manager = RecordManager::seeded(provisioning::fixture().unwrap())
        .unwrap()
        .with_notifier(Vec::new());
    let id = RecordId(1);

    manager.approve(id, "it-admin").unwrap();
    manager.begin_deprovisioning(id, "hr").unwrap();
    let done = manager.complete_deprovisioning(id, "it-admin").unwrap();
    assert_eq!(done.fields.status(), ProvisioningStatus::Deprovisioned);
    assert_eq!(done.fields.approved_by.as_deref(), Some("it-admin"));

    let snapshot = manager.get(id).unwrap().fields.clone();
    for attempt in [
        manager.approve(id, "it-admin").map(|_| ()),
        manager.begin_deprovisioning(id, "hr").map(|_| ()),
        manager.complete_deprovisioning(id, "hr").map(|_| ()),
        manager.reject(id, "hr", None).map(|_| ()),
    ] {
        assert!(matches!(attempt, Err(ManagerError::Transition(_))));
    }
    assert_eq!(manager.get(id).unwrap().fields, snapshot);

    let statuses: Vec<_> = snapshot.state.history().iter().map(|t| t.to).collect();
    assert_eq!(
        statuses,
        vec![
            ProvisioningStatus::Active,
            ProvisioningStatus::Deprovisioning,
            ProvisioningStatus::Deprovisioned,
        ]
    );

    let messages = collected(&manager);
    assert_eq!(messages[2], (NotificationKind::Success, "Provisioning request \"Emily Rodriguez\" deprovisioned"));
    assert_eq!(
        messages[3],
        (
            NotificationKind::Error,
            "Could not update Provisioning request: cannot move from deprovisioned to active"
        )
    );
}

#[test]
fn provisioning_cannot_skip_steps() {
    let mut manager = RecordManager::seeded(provisioning::fixture().unwrap()).unwrap();
    let err = manager.complete_deprovisioning(RecordId(1), "hr").unwrap_err();
    assert_eq!(err.to_string(), "cannot move from pending to deprovisioned");
    assert_eq!(
        manager.get(RecordId(1)).unwrap().fields.status(),
        ProvisioningStatus::Pending
    );
}

#[test]
fn finished_requests_cannot_be_reopened() {
    let mut manager = RecordManager::seeded(provisioning::fixture().unwrap())
        .unwrap()
        .with_notifier(Vec::new());
    let id = RecordId(1);
    manager.approve(id, "it-admin").unwrap();
    manager.begin_deprovisioning(id, "hr").unwrap();
    manager.complete_deprovisioning(id, "it-admin").unwrap();
    let finished = manager.get(id).unwrap().fields.clone();

    let err = manager
        .transition(id, "reopened", |request| {
            request.state = Tracked::new(ProvisioningStatus::Pending);
            Ok(())
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "cannot move from deprovisioned to pending");
    assert_eq!(manager.get(id).unwrap().fields, finished);
    assert!(manager.approve(id, "it-admin").is_err());
    assert_eq!(
        collected(&manager).last().map(|(kind, _)| *kind),
        Some(NotificationKind::Error)
    );

    let mut reviews = RecordManager::seeded(access_request::fixture().unwrap()).unwrap();
    let err = reviews
        .transition(RecordId(2), "reopened", |request| {
            request.state = Tracked::new(AccessStatus::Pending);
            request.reviewed_by = None;
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(err, ManagerError::Transition(_)));
    assert_eq!(reviews.get(RecordId(2)).unwrap().fields.status(), AccessStatus::Approved);
    assert_eq!(reviews.pending().count(), 2);
}

#[test]
fn rejected_provisioning_stays_listed() {
    let mut manager = RecordManager::seeded(provisioning::fixture().unwrap()).unwrap();
    let before = manager.len();
    manager.reject(RecordId(1), "it-admin", Some("no budget code".into())).unwrap();

    assert_eq!(manager.len(), before);
    assert_eq!(manager.with_status(ProvisioningStatus::Rejected).labels(), vec!["Emily Rodriguez"]);
    assert!(manager.get(RecordId(1)).unwrap().fields.state.is_terminal());
}

#[test]
fn empty_stakeholder_name_leaves_store_untouched() {
    let mut manager = RecordManager::seeded(stakeholder::fixture())
        .unwrap()
        .with_notifier(Vec::new());
    let before = serde_json::to_value(manager.list()).unwrap();

    let form = FormData::new()
        .with("name", "")
        .with("role", "Treasurer")
        .with("group", "board")
        .with("influence", "high")
        .with("interest", "medium")
        .with("alignment", "60");
    let err = manager.submit_create(&form).unwrap_err();
    assert_eq!(err.validation().unwrap().field("name"), vec!["is required"]);

    let mut edit = manager.edit_form(RecordId(2)).unwrap();
    edit.set("name", "   ");
    assert!(manager.submit_update(RecordId(2), &edit).is_err());

    assert_eq!(serde_json::to_value(manager.list()).unwrap(), before);
    assert!(manager.notifier().is_empty());
}

#[test]
fn form_errors_are_reported_together() {
    let mut manager = RecordManager::<Stakeholder>::seeded(stakeholder::fixture()).unwrap();
    let form = FormData::new()
        .with("name", "Treasurer's Office")
        .with("role", "Finance")
        .with("group", "shareholders")
        .with("influence", "")
        .with("interest", "high")
        .with("alignment", "about half");

    let errors = manager.submit_create(&form).unwrap_err();
    let errors = errors.validation().unwrap();
    assert_eq!(errors.len(), 3);
    assert_eq!(
        errors.field("group"),
        vec!["must be one of: board, management, staff, members, community, regulators"]
    );
    assert_eq!(errors.field("influence"), vec!["is required"]);
    assert_eq!(errors.field("alignment"), vec!["must be a valid number"]);
    assert_eq!(manager.len(), 6);
}

#[test]
fn access_requests_are_reviewed_once() {
    let mut manager = RecordManager::seeded(access_request::fixture().unwrap())
        .unwrap()
        .with_notifier(Vec::new());
    let id = RecordId(1);

    let approved = manager.approve(id, "security").unwrap();
    assert_eq!(approved.fields.status(), AccessStatus::Approved);
    assert_eq!(approved.fields.reviewed_by.as_deref(), Some("security"));
    assert!(approved.fields.review_date.is_some());

    let err = manager.reject(id, "security", "second thoughts").unwrap_err();
    assert!(matches!(err, ManagerError::Transition(_)));
    let stored = &manager.get(id).unwrap().fields;
    assert_eq!(stored.status(), AccessStatus::Approved);
    assert_eq!(stored.rejection_reason, None);

    assert_eq!(
        collected(&manager),
        vec![
            (NotificationKind::Success, "Access request \"Michael Chen\" approved"),
            (
                NotificationKind::Error,
                "Could not update Access request: cannot move from approved to rejected"
            ),
        ]
    );
}

#[test]
fn edits_cannot_reset_a_review() {
    let mut manager = RecordManager::seeded(access_request::fixture().unwrap()).unwrap();
    let id = RecordId(4);
    assert_eq!(manager.get(id).unwrap().fields.status(), AccessStatus::Rejected);

    let mut form = manager.get(id).unwrap().fields.to_form();
    form.set("access_level", "write");
    let updated = manager.submit_update(id, &form).unwrap();

    assert_eq!(updated.fields.access_level, AccessLevel::Write);
    assert_eq!(updated.fields.status(), AccessStatus::Rejected);
    assert_eq!(
        updated.fields.rejection_reason.as_deref(),
        Some("Admin access is limited to IT staff")
    );
}

#[test]
fn new_requests_start_pending() {
    let mut manager = RecordManager::seeded(access_request::fixture().unwrap()).unwrap();
    let request = AccessRequest::new(
        "Luis Ortega",
        "luis.ortega@attune.example",
        "Branch Reporting",
        AccessLevel::Read,
        "Weekly branch performance summaries",
    );
    let created = manager.create(request).unwrap();
    assert_eq!(created.display_id(), "AR-0005");
    assert_eq!(manager.pending().count(), 3);
}

#[test]
fn missing_requests_report_an_error() {
    let mut manager = RecordManager::seeded(Vec::<ProvisioningRequest>::new())
        .unwrap()
        .with_notifier(Vec::new());
    let err = manager.approve(RecordId(3), "it-admin").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        collected(&manager),
        vec![(NotificationKind::Error, "Provisioning request #3 no longer exists")]
    );
}
