//! Stakeholder alignment: who matters, how much, and how aligned they are.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::form::{FormData, FromForm, IntoForm};
use crate::schema::{Constraint, ValidationErrors};
use crate::view::{round_to_tenth, GroupStats, View};
use crate::Entity;

crate::choice! {
    pub enum StakeholderGroup {
        Board => "board",
        Management => "management",
        Staff => "staff",
        Members => "members",
        Community => "community",
        Regulators => "regulators",
    }
}

crate::choice! {
    pub enum Level {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

crate::choice! {
    /// Cell of the influence/interest matrix.
    pub enum Quadrant {
        ManageClosely => "manage closely",
        KeepSatisfied => "keep satisfied",
        KeepInformed => "keep informed",
        Monitor => "monitor",
    }
}

impl Quadrant {
    /// Only `High` counts as high; `Medium` falls on the low side of both axes.
    pub fn of(influence: Level, interest: Level) -> Self {
        match (influence == Level::High, interest == Level::High) {
            (true, true) => Quadrant::ManageClosely,
            (true, false) => Quadrant::KeepSatisfied,
            (false, true) => Quadrant::KeepInformed,
            (false, false) => Quadrant::Monitor,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Entity)]
#[entity(collection = "stakeholders", noun = "Stakeholder")]
pub struct Stakeholder {
    #[entity(required, min_len = 2, search)]
    pub name: String,
    #[entity(required, min_len = 2, search)]
    pub role: String,
    pub group: StakeholderGroup,
    pub influence: Level,
    pub interest: Level,
    /// 0 (opposed) to 100 (fully aligned).
    #[entity(min = 0, max = 100)]
    pub alignment: u8,
    #[entity(optional, max_len = 500)]
    #[serde(default)]
    pub concerns: String,
}

impl Stakeholder {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        group: StakeholderGroup,
        influence: Level,
        interest: Level,
        alignment: u8,
    ) -> Self {
        Stakeholder {
            name: name.into(),
            role: role.into(),
            group,
            influence,
            interest,
            alignment,
            concerns: String::new(),
        }
    }

    pub fn with_concerns(mut self, concerns: impl Into<String>) -> Self {
        self.concerns = concerns.into();
        self
    }

    pub fn quadrant(&self) -> Quadrant {
        Quadrant::of(self.influence, self.interest)
    }

    /// Alignment of 70 or more.
    pub fn is_aligned(&self) -> bool {
        self.alignment >= ALIGNED_THRESHOLD
    }
}

pub const ALIGNED_THRESHOLD: u8 = 70;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentSummary {
    pub stakeholders: usize,
    pub average_alignment: f64,
    /// Percent of stakeholders at or above the aligned threshold.
    pub aligned_share: f64,
    pub by_group: BTreeMap<StakeholderGroup, GroupStats>,
    pub by_quadrant: BTreeMap<Quadrant, GroupStats>,
}

impl AlignmentSummary {
    pub fn of(view: &View<'_, Stakeholder>) -> Self {
        let alignment = |s: &Stakeholder| s.alignment as f64;
        AlignmentSummary {
            stakeholders: view.count(),
            average_alignment: round_to_tenth(view.average(alignment)),
            aligned_share: view
                .clone()
                .filter(Stakeholder::is_aligned)
                .count_share_of(view),
            by_group: view.group_sum(|s| s.group, alignment),
            by_quadrant: view.group_sum(Stakeholder::quadrant, alignment),
        }
    }
}

impl FromForm for Stakeholder {
    fn from_form(form: &FormData) -> Result<Self, ValidationErrors> {
        let mut reader = form.reader();
        let stakeholder = Stakeholder {
            name: reader.text("name"),
            role: reader.text("role"),
            group: reader.choice("group"),
            influence: reader.choice("influence"),
            interest: reader.choice("interest"),
            alignment: reader.bounded("alignment", Constraint::Range(0.0, 100.0)),
            concerns: reader.text("concerns"),
        };
        reader.finish(stakeholder)
    }
}

impl IntoForm for Stakeholder {
    fn to_form(&self) -> FormData {
        FormData::new()
            .with("name", self.name.as_str())
            .with("role", self.role.as_str())
            .with("group", self.group.to_string())
            .with("influence", self.influence.to_string())
            .with("interest", self.interest.to_string())
            .with("alignment", self.alignment.to_string())
            .with("concerns", self.concerns.as_str())
    }
}

pub fn fixture() -> Vec<Stakeholder> {
    use Level::*;
    use StakeholderGroup::*;

    vec![
        Stakeholder::new("Margaret Chen", "Board Chair", Board, High, High, 85)
            .with_concerns("Long-term member value and regulatory standing"),
        Stakeholder::new("David Okafor", "Chief Executive Officer", Management, High, High, 90),
        Stakeholder::new("Priya Raman", "Branch Operations Lead", Staff, Medium, High, 65)
            .with_concerns("Training time for front-line staff"),
        Stakeholder::new("Member Advisory Council", "Member representatives", Members, Medium, High, 72),
        Stakeholder::new("Eastside Community Partners", "Nonprofit partner", Community, Low, Medium, 58),
        Stakeholder::new("State Credit Union Examiner", "Regulator", Regulators, High, Low, 50)
            .with_concerns("Disclosure accuracy in financial education materials"),
    ]
}
