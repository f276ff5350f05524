//! Integration tests for the record store, derived views, and the Entity
//! derive.

mod branch;

use attune_records::entities::resource::{self, AllocationStatus, Priority, ResourceAllocation};
use attune_records::{
    percentage_of, Entity, RecordId, RecordManager, RecordStore, Reducer, StoreError, View,
};
use branch::{BranchOffice, Region};

fn allocations() -> RecordManager<ResourceAllocation> {
    RecordManager::seeded(resource::fixture()).unwrap()
}

fn candidate(initiative: &str, budget: f64) -> ResourceAllocation {
    ResourceAllocation::new(initiative, budget, 40, 3, Priority::Low, AllocationStatus::Planning)
}

#[test]
fn ids_are_never_reused() {
    let mut manager = RecordManager::<ResourceAllocation>::empty();
    let a = manager.create(candidate("Initiative A", 100.0)).unwrap().id;
    let b = manager.create(candidate("Initiative B", 200.0)).unwrap().id;
    manager.delete(a).unwrap();
    let c = manager.create(candidate("Initiative C", 300.0)).unwrap().id;

    assert_ne!(c, a);
    assert_ne!(c, b);
    assert_eq!(manager.view().ids(), vec![b, c]);
}

#[test]
fn ids_continue_after_the_seeded_maximum() {
    let mut manager = allocations();
    manager.delete(RecordId(6)).unwrap();
    let created = manager.create(candidate("Youth Savings Accounts", 12000.0)).unwrap();
    assert_eq!(created.id, RecordId(7));
}

#[test]
fn update_preserves_identity() {
    let mut manager = allocations();
    let before = manager.len();

    let mut fields = manager.get(RecordId(3)).unwrap().fields.clone();
    fields.budget = 18000.0;
    fields.status = AllocationStatus::Completed;
    let updated = manager.update(RecordId(3), fields).unwrap();
    assert_eq!(updated.id, RecordId(3));

    assert_eq!(manager.len(), before);
    let stored = &manager.list()[2];
    assert_eq!(stored.id, RecordId(3));
    assert_eq!(stored.fields.budget, 18000.0);
    assert_eq!(stored.fields.status, AllocationStatus::Completed);
    assert!(stored.updated_at >= stored.created_at);
}

#[test]
fn delete_removes_exactly_one() {
    let mut manager = allocations();
    let before: Vec<_> = manager.list().iter().map(|r| (r.id, r.fields.clone())).collect();

    let removed = manager.delete(RecordId(2)).unwrap();
    assert_eq!(removed.fields.initiative, "Mobile App Financial Health Features");

    let after: Vec<_> = manager.list().iter().map(|r| (r.id, r.fields.clone())).collect();
    assert_eq!(after.len(), before.len() - 1);
    assert!(manager.get(RecordId(2)).is_none());

    let expected: Vec<_> = before.into_iter().filter(|(id, _)| *id != RecordId(2)).collect();
    assert_eq!(after, expected);
}

#[test]
fn missing_ids_are_errors() {
    let mut manager = allocations();
    let err = manager.update(RecordId(99), candidate("Ghost", 1.0)).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "record not found: resource_allocations:99");
    assert!(manager.delete(RecordId(99)).unwrap_err().is_not_found());
}

#[test]
fn percentages_guard_against_zero() {
    assert_eq!(percentage_of(0.0, 0.0), 0.0);
    assert_eq!(percentage_of(42.0, 0.0), 0.0);

    let manager = allocations();
    let all = manager.view();
    let completed = manager
        .view()
        .where_eq(|r| r.status, AllocationStatus::Completed);
    assert!(completed.is_empty());
    assert_eq!(completed.share_of(&all, |r| r.budget), 0.0);
    assert_eq!(completed.average(|r| r.budget), 0.0);
}

#[test]
fn budget_totals() {
    let manager = allocations();
    let budgets: Vec<f64> = manager.list().iter().map(|r| r.fields.budget).collect();
    assert_eq!(budgets, vec![25000.0, 75000.0, 15000.0, 30000.0, 5000.0, 20000.0]);

    let total = manager.view().aggregate(|r| r.budget, Reducer::Sum);
    assert_eq!(total, 170000.0);
    assert_eq!(percentage_of(25000.0, total), 14.7);
    assert_eq!(manager.view().aggregate(|r| r.budget, Reducer::Max), 75000.0);
    assert_eq!(manager.view().aggregate(|r| r.budget, Reducer::Count), 6.0);
}

#[test]
fn high_priority_filter() {
    let manager = allocations();
    let high = manager.view().where_eq(|r| r.priority, Priority::High);

    assert_eq!(
        high.labels(),
        vec![
            "Financial Education Workshop Series",
            "Mobile App Financial Health Features",
            "Emergency Savings Promotion",
        ]
    );
    assert_eq!(high.sum(|r| r.budget), 130000.0);

    let high_and_active = high.where_eq(|r| r.status, AllocationStatus::Active);
    assert_eq!(high_and_active.ids(), vec![RecordId(1), RecordId(4)]);
}

#[test]
fn json_fixture_round_trip() {
    let store = RecordStore::seeded(resource::fixture()).unwrap();
    let json = store.to_json().unwrap();

    let mut restored = RecordStore::<ResourceAllocation>::from_json(&json).unwrap();
    assert_eq!(restored.len(), 6);
    assert_eq!(restored.list()[3].fields, store.list()[3].fields);
    assert_eq!(restored.create(candidate("Next", 1.0)).id, RecordId(7));
}

#[test]
fn bad_fixtures_are_rejected() {
    let duplicate = r#"[
        {"id": 1, "initiative": "First initiative", "budget": 10, "staff_hours": 1,
         "timeline_months": 1, "priority": "low", "status": "active"},
        {"id": 1, "initiative": "Second initiative", "budget": 10, "staff_hours": 1,
         "timeline_months": 1, "priority": "low", "status": "active"}
    ]"#;
    assert!(matches!(
        RecordStore::<ResourceAllocation>::from_json(duplicate),
        Err(StoreError::DuplicateId { id: RecordId(1), .. })
    ));

    let unknown_priority = r#"[
        {"id": 1, "initiative": "First initiative", "budget": 10, "staff_hours": 1,
         "timeline_months": 1, "priority": "urgent", "status": "active"}
    ]"#;
    assert!(matches!(
        RecordStore::<ResourceAllocation>::from_json(unknown_priority),
        Err(StoreError::Serde(_))
    ));

    let too_long = r#"[
        {"id": 4, "initiative": "First initiative", "budget": 10, "staff_hours": 1,
         "timeline_months": 99, "priority": "low", "status": "active"}
    ]"#;
    match RecordStore::<ResourceAllocation>::from_json(too_long) {
        Err(StoreError::InvalidFixture { id, errors, .. }) => {
            assert_eq!(id, RecordId(4));
            assert!(errors.has_field("timeline_months"));
        }
        other => panic!("expected an invalid fixture, got {:?}", other.map(|s| s.len())),
    }
}

#[test]
fn derive_builds_schema_from_attributes() {
    assert_eq!(BranchOffice::COLLECTION, "branch_offices");
    assert_eq!(BranchOffice::NOUN, "Branch");
    assert_eq!(BranchOffice::ID_PREFIX, None);

    let schema = BranchOffice::schema();
    assert_eq!(
        schema.fields(),
        vec!["name", "city", "manager_email", "members", "satisfaction", "services"]
    );

    let ok = BranchOffice::new("Riverside", "Springfield", Region::North, 5400);
    assert!(schema.validate(&ok).is_ok());

    let mut bad = ok.clone();
    bad.name = " ".to_string();
    bad.manager_email = "not-an-email".to_string();
    bad.satisfaction = 7.5;
    bad.services.clear();

    let errors = schema.validate(&bad).unwrap_err();
    assert_eq!(errors.len(), 4);
    assert_eq!(errors.field("name"), vec!["is required"]);
    assert_eq!(errors.field("manager_email"), vec!["must be a valid email address"]);
    assert_eq!(errors.field("satisfaction"), vec!["must be between 0 and 5"]);
    assert_eq!(errors.field("services"), vec!["must include at least one entry"]);
}

#[test]
fn derived_entities_search_and_group() {
    let store = RecordStore::seeded(vec![
        BranchOffice::new("Riverside", "Springfield", Region::North, 5400),
        BranchOffice::new("Hilltop", "Shelbyville", Region::South, 3100),
        BranchOffice::new("Downtown", "Springfield", Region::South, 8800),
    ])
    .unwrap();

    let view = View::new(store.list());
    assert_eq!(view.clone().search("springfield").count(), 2);

    let by_region = view.group_sum(|b| b.region, |b| b.members as f64);
    assert_eq!(by_region[&Region::North].sum, 5400.0);
    assert_eq!(by_region[&Region::South].count, 2);
    assert_eq!(by_region[&Region::South].average(), 5950.0);
}
