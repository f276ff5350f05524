//! Access requests: a user asks for a level of access to a resource and a
//! reviewer approves or rejects it, once.

use std::collections::BTreeMap;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::entity::{Record, RecordId};
use crate::lifecycle::{AccessStatus, Tracked, TransitionError};
use crate::manager::{ManagerError, RecordManager};
use crate::notify::Notifier;
use crate::schema::form::{FormData, FromForm, IntoForm};
use crate::schema::ValidationErrors;
use crate::view::{GroupStats, View};
use crate::Entity;

crate::choice! {
    pub enum AccessLevel {
        Read => "read",
        Write => "write",
        Admin => "admin",
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Entity)]
#[entity(
    collection = "access_requests",
    noun = "Access request",
    label = requester,
    id_prefix = "AR"
)]
pub struct AccessRequest {
    #[entity(required, min_len = 2, search)]
    pub requester: String,
    #[entity(required, email, search)]
    pub email: String,
    #[entity(required, min_len = 2, search)]
    pub resource: String,
    pub access_level: AccessLevel,
    #[entity(required, min_len = 10, max_len = 1000)]
    pub justification: String,
    #[entity(preserve, lifecycle)]
    pub state: Tracked<AccessStatus>,
    #[entity(preserve)]
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[entity(preserve)]
    #[serde(default)]
    pub review_date: Option<SystemTime>,
    #[entity(preserve)]
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl AccessRequest {
    /// A new, pending request.
    pub fn new(
        requester: impl Into<String>,
        email: impl Into<String>,
        resource: impl Into<String>,
        access_level: AccessLevel,
        justification: impl Into<String>,
    ) -> Self {
        AccessRequest {
            requester: requester.into(),
            email: email.into(),
            resource: resource.into(),
            access_level,
            justification: justification.into(),
            state: Tracked::new(AccessStatus::Pending),
            reviewed_by: None,
            review_date: None,
            rejection_reason: None,
        }
    }

    pub fn status(&self) -> AccessStatus {
        self.state.status()
    }

    pub fn approve(&mut self, reviewer: &str) -> Result<(), TransitionError> {
        self.approve_at(reviewer, SystemTime::now())
    }

    pub fn approve_at(&mut self, reviewer: &str, at: SystemTime) -> Result<(), TransitionError> {
        self.state
            .advance_at(AccessStatus::Approved, reviewer, None, at)?;
        self.stamp(reviewer, at);
        Ok(())
    }

    pub fn reject(&mut self, reviewer: &str, reason: &str) -> Result<(), TransitionError> {
        self.reject_at(reviewer, reason, SystemTime::now())
    }

    /// Reject with a reason. A blank reason is recorded as none.
    pub fn reject_at(
        &mut self,
        reviewer: &str,
        reason: &str,
        at: SystemTime,
    ) -> Result<(), TransitionError> {
        let reason = Some(reason.trim().to_string()).filter(|r| !r.is_empty());
        self.state
            .advance_at(AccessStatus::Rejected, reviewer, reason.clone(), at)?;
        self.stamp(reviewer, at);
        self.rejection_reason = reason;
        Ok(())
    }

    fn stamp(&mut self, reviewer: &str, at: SystemTime) {
        self.reviewed_by = Some(reviewer.to_string());
        self.review_date = Some(at);
    }
}

/// Review actions on a manager of access requests.
pub trait AccessReview {
    fn approve(
        &mut self,
        id: RecordId,
        reviewer: &str,
    ) -> Result<&Record<AccessRequest>, ManagerError>;

    fn reject(
        &mut self,
        id: RecordId,
        reviewer: &str,
        reason: &str,
    ) -> Result<&Record<AccessRequest>, ManagerError>;

    /// Requests still waiting for a reviewer.
    fn pending(&self) -> View<'_, AccessRequest>;

    fn status_counts(&self) -> BTreeMap<AccessStatus, GroupStats>;
}

impl<N: Notifier> AccessReview for RecordManager<AccessRequest, N> {
    fn approve(
        &mut self,
        id: RecordId,
        reviewer: &str,
    ) -> Result<&Record<AccessRequest>, ManagerError> {
        self.transition(id, "approved", |request| request.approve(reviewer))
    }

    fn reject(
        &mut self,
        id: RecordId,
        reviewer: &str,
        reason: &str,
    ) -> Result<&Record<AccessRequest>, ManagerError> {
        self.transition(id, "rejected", |request| request.reject(reviewer, reason))
    }

    fn pending(&self) -> View<'_, AccessRequest> {
        self.view().where_eq(AccessRequest::status, AccessStatus::Pending)
    }

    fn status_counts(&self) -> BTreeMap<AccessStatus, GroupStats> {
        self.view().group_by(AccessRequest::status)
    }
}

impl FromForm for AccessRequest {
    /// Review fields are never read from a form; a submission always
    /// describes a pending request.
    fn from_form(form: &FormData) -> Result<Self, ValidationErrors> {
        let mut reader = form.reader();
        let request = AccessRequest::new(
            reader.text("requester"),
            reader.text("email"),
            reader.text("resource"),
            reader.choice("access_level"),
            reader.text("justification"),
        );
        reader.finish(request)
    }
}

impl IntoForm for AccessRequest {
    fn to_form(&self) -> FormData {
        FormData::new()
            .with("requester", self.requester.as_str())
            .with("email", self.email.as_str())
            .with("resource", self.resource.as_str())
            .with("access_level", self.access_level.to_string())
            .with("justification", self.justification.as_str())
    }
}

/// Two pending requests, one approved and one rejected.
pub fn fixture() -> Result<Vec<AccessRequest>, TransitionError> {
    let mut approved = AccessRequest::new(
        "Sarah Johnson",
        "sarah.johnson@attune.example",
        "Member Analytics Dashboard",
        AccessLevel::Read,
        "Quarterly member engagement reporting for the board",
    );
    approved.approve("IT Security")?;

    let mut rejected = AccessRequest::new(
        "Tom Becker",
        "tom.becker@attune.example",
        "Core Banking Admin Console",
        AccessLevel::Admin,
        "Needs to reset member passwords during evening shifts",
    );
    rejected.reject("IT Security", "Admin access is limited to IT staff")?;

    Ok(vec![
        AccessRequest::new(
            "Michael Chen",
            "michael.chen@attune.example",
            "Loan Origination System",
            AccessLevel::Write,
            "Processing auto loan applications for the new branch",
        ),
        approved,
        AccessRequest::new(
            "Aisha Patel",
            "aisha.patel@attune.example",
            "HR Information System",
            AccessLevel::Read,
            "Reviewing training completion for financial counseling staff",
        ),
        rejected,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Choice;

    #[test]
    fn review_stamps() {
        let at = SystemTime::UNIX_EPOCH;
        let mut request = fixture().unwrap().remove(0);
        request.reject_at("Dana", "  ", at).unwrap();
        assert_eq!(request.status(), AccessStatus::Rejected);
        assert_eq!(request.reviewed_by.as_deref(), Some("Dana"));
        assert_eq!(request.review_date, Some(at));
        assert_eq!(request.rejection_reason, None);
        assert_eq!(request.state.last_transition().unwrap().actor, "Dana");
    }

    #[test]
    fn reviewed_requests_stay_reviewed() {
        let mut request = fixture().unwrap().remove(1);
        let err = request.reject("Dana", "changed my mind").unwrap_err();
        assert_eq!(err.from, AccessStatus::Approved.as_str());
        assert_eq!(request.status(), AccessStatus::Approved);
        assert_eq!(request.rejection_reason, None);
    }

    #[test]
    fn form_always_starts_pending() {
        let approved = fixture().unwrap().remove(1);
        let parsed = AccessRequest::from_form(&approved.to_form()).unwrap();
        assert_eq!(parsed.status(), AccessStatus::Pending);
        assert_eq!(parsed.requester, approved.requester);
        assert_eq!(parsed.reviewed_by, None);
    }

    #[test]
    fn display_ids_carry_prefix() {
        let manager = RecordManager::seeded(fixture().unwrap()).unwrap();
        assert_eq!(manager.list()[2].display_id(), "AR-0003");
        assert_eq!(manager.pending().count(), 2);
        assert_eq!(manager.status_counts()[&AccessStatus::Rejected].count, 1);
    }
}
