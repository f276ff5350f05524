//! Resource allocation: budgeted initiatives with staffing and timelines.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::form::{FormData, FromForm, IntoForm};
use crate::schema::ValidationErrors;
use crate::view::{percentage_of, round_to_tenth, GroupStats, Metric, Reducer, SortKey, View};
use crate::Entity;

crate::choice! {
    pub enum Priority {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

crate::choice! {
    pub enum AllocationStatus {
        Planning => "planning",
        Active => "active",
        Paused => "paused",
        Completed => "completed",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Entity)]
#[entity(
    collection = "resource_allocations",
    noun = "Resource allocation",
    label = initiative
)]
pub struct ResourceAllocation {
    #[entity(min_len = 3, max_len = 120, search)]
    pub initiative: String,
    #[entity(min = 0)]
    pub budget: f64,
    #[entity(min = 0)]
    pub staff_hours: u32,
    #[entity(min = 1, max = 60)]
    pub timeline_months: u32,
    pub priority: Priority,
    pub status: AllocationStatus,
    #[entity(optional, max_len = 500)]
    #[serde(default)]
    pub notes: String,
}

impl ResourceAllocation {
    pub fn new(
        initiative: impl Into<String>,
        budget: f64,
        staff_hours: u32,
        timeline_months: u32,
        priority: Priority,
        status: AllocationStatus,
    ) -> Self {
        ResourceAllocation {
            initiative: initiative.into(),
            budget,
            staff_hours,
            timeline_months,
            priority,
            status,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Budget spread evenly over the timeline.
    pub fn monthly_budget(&self) -> f64 {
        if self.timeline_months == 0 {
            return 0.0;
        }
        self.budget / self.timeline_months as f64
    }
}

crate::choice! {
    /// Numeric columns of the allocation table.
    pub enum ResourceMetric {
        Budget => "budget",
        StaffHours => "staff_hours",
        TimelineMonths => "timeline_months",
    }
}

impl Metric<ResourceAllocation> for ResourceMetric {
    fn value(&self, record: &ResourceAllocation) -> f64 {
        match self {
            ResourceMetric::Budget => record.budget,
            ResourceMetric::StaffHours => record.staff_hours as f64,
            ResourceMetric::TimelineMonths => record.timeline_months as f64,
        }
    }
}

crate::choice! {
    /// Sortable columns of the allocation table.
    pub enum ResourceSort {
        Initiative => "initiative",
        Budget => "budget",
        StaffHours => "staff_hours",
        TimelineMonths => "timeline_months",
        Priority => "priority",
        Status => "status",
    }
}

impl SortKey<ResourceAllocation> for ResourceSort {
    fn compare(&self, a: &ResourceAllocation, b: &ResourceAllocation) -> Ordering {
        match self {
            ResourceSort::Initiative => a
                .initiative
                .to_lowercase()
                .cmp(&b.initiative.to_lowercase()),
            ResourceSort::Budget => a.budget.total_cmp(&b.budget),
            ResourceSort::StaffHours => a.staff_hours.cmp(&b.staff_hours),
            ResourceSort::TimelineMonths => a.timeline_months.cmp(&b.timeline_months),
            ResourceSort::Priority => a.priority.cmp(&b.priority),
            ResourceSort::Status => a.status.cmp(&b.status),
        }
    }
}

/// Headline figures for the allocation dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSummary {
    pub initiatives: usize,
    pub total_budget: f64,
    pub total_staff_hours: f64,
    pub average_timeline_months: f64,
    pub active: usize,
    /// Percent of the total budget held by high-priority initiatives.
    pub high_priority_share: f64,
    /// Percent of the total budget already spent on completed initiatives.
    pub completed_share: f64,
    pub by_priority: BTreeMap<Priority, GroupStats>,
    pub by_status: BTreeMap<AllocationStatus, GroupStats>,
}

impl AllocationSummary {
    pub fn of(view: &View<'_, ResourceAllocation>) -> Self {
        let budget = |r: &ResourceAllocation| r.budget;
        let high = view.clone().where_eq(|r| r.priority, Priority::High);
        let completed = view
            .clone()
            .where_eq(|r| r.status, AllocationStatus::Completed);

        AllocationSummary {
            initiatives: view.count(),
            total_budget: view.sum(budget),
            total_staff_hours: view.aggregate_metric(&ResourceMetric::StaffHours, Reducer::Sum),
            average_timeline_months: round_to_tenth(view.average(|r| r.timeline_months as f64)),
            active: view
                .clone()
                .where_eq(|r| r.status, AllocationStatus::Active)
                .count(),
            high_priority_share: high.share_of(view, budget),
            completed_share: completed.share_of(view, budget),
            by_priority: view.group_sum(|r| r.priority, budget),
            by_status: view.group_sum(|r| r.status, budget),
        }
    }

    /// Percent of the total budget held by one priority band.
    pub fn priority_share(&self, priority: Priority) -> f64 {
        let part = self.by_priority.get(&priority).map_or(0.0, |g| g.sum);
        percentage_of(part, self.total_budget)
    }
}

impl FromForm for ResourceAllocation {
    fn from_form(form: &FormData) -> Result<Self, ValidationErrors> {
        let mut reader = form.reader();
        let allocation = ResourceAllocation {
            initiative: reader.text("initiative"),
            budget: reader.number("budget"),
            staff_hours: reader.number("staff_hours"),
            timeline_months: reader.number("timeline_months"),
            priority: reader.choice("priority"),
            status: reader.choice("status"),
            notes: reader.text("notes"),
        };
        reader.finish(allocation)
    }
}

impl IntoForm for ResourceAllocation {
    fn to_form(&self) -> FormData {
        FormData::new()
            .with("initiative", self.initiative.as_str())
            .with("budget", self.budget.to_string())
            .with("staff_hours", self.staff_hours.to_string())
            .with("timeline_months", self.timeline_months.to_string())
            .with("priority", self.priority.to_string())
            .with("status", self.status.to_string())
            .with("notes", self.notes.as_str())
    }
}

/// The allocation table as first shown on the dashboard.
pub fn fixture() -> Vec<ResourceAllocation> {
    use AllocationStatus::*;
    use Priority::*;

    vec![
        ResourceAllocation::new("Financial Education Workshop Series", 25000.0, 320, 6, High, Active)
            .with_notes("Monthly workshops across all branches"),
        ResourceAllocation::new("Mobile App Financial Health Features", 75000.0, 1200, 9, High, Planning)
            .with_notes("Budgeting tools and savings goals in the member app"),
        ResourceAllocation::new("Community Outreach Program", 15000.0, 240, 12, Medium, Active),
        ResourceAllocation::new("Emergency Savings Promotion", 30000.0, 160, 3, High, Active)
            .with_notes("Matched deposits for new emergency savings accounts"),
        ResourceAllocation::new("Member Feedback Survey", 5000.0, 60, 2, Low, Paused),
        ResourceAllocation::new("Staff Financial Counseling Training", 20000.0, 400, 4, Medium, Planning),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, RecordManager, RecordId};

    fn manager() -> RecordManager<ResourceAllocation> {
        RecordManager::seeded(fixture()).unwrap()
    }

    #[test]
    fn fixture_totals() {
        let manager = manager();
        let summary = AllocationSummary::of(&manager.view());
        assert_eq!(summary.initiatives, 6);
        assert_eq!(summary.total_budget, 170000.0);
        assert_eq!(summary.total_staff_hours, 2380.0);
        assert_eq!(summary.active, 3);
        assert_eq!(summary.high_priority_share, 76.5);
        assert_eq!(summary.completed_share, 0.0);
        assert_eq!(summary.priority_share(Priority::Low), 2.9);
        assert_eq!(summary.by_priority[&Priority::High].count, 3);
        assert!(!summary.by_status.contains_key(&AllocationStatus::Completed));
    }

    #[test]
    fn sort_by_budget_descending() {
        let manager = manager();
        let view = manager.view().sort(&ResourceSort::Budget, Direction::Descending);
        assert_eq!(view.first().unwrap().fields.initiative, "Mobile App Financial Health Features");
        assert_eq!(view.records().last().unwrap().id, RecordId(5));
    }

    #[test]
    fn schema_bounds() {
        let schema = ResourceAllocation::schema();
        let mut candidate = fixture().remove(0);
        candidate.initiative = "ab".to_string();
        candidate.budget = -1.0;
        candidate.timeline_months = 61;
        candidate.notes = "x".repeat(501);

        let errors = schema.validate(&candidate).unwrap_err();
        assert_eq!(errors.field("initiative"), vec!["must be at least 3 characters"]);
        assert_eq!(errors.field("budget"), vec!["must be at least 0"]);
        assert_eq!(errors.field("timeline_months"), vec!["must be between 1 and 60"]);
        assert_eq!(errors.field("notes"), vec!["must be at most 500 characters"]);
    }

    #[test]
    fn edit_form_round_trips() {
        let original = fixture().remove(3);
        let parsed = ResourceAllocation::from_form(&original.to_form()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn monthly_budget() {
        assert_eq!(fixture()[3].monthly_budget(), 10000.0);
    }
}
