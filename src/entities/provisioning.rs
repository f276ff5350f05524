//! User provisioning: account requests that move from approval through to
//! deprovisioning.

use std::collections::BTreeMap;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::entity::{Record, RecordId};
use crate::lifecycle::{ProvisioningStatus, Tracked, TransitionError};
use crate::manager::{ManagerError, RecordManager};
use crate::notify::Notifier;
use crate::schema::form::{FormData, FromForm, IntoForm};
use crate::schema::ValidationErrors;
use crate::view::{GroupStats, View};
use crate::Entity;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Entity)]
#[entity(
    collection = "provisioning_requests",
    noun = "Provisioning request",
    label = full_name,
    id_prefix = "PR"
)]
pub struct ProvisioningRequest {
    #[entity(required, min_len = 2, search)]
    pub full_name: String,
    #[entity(required, email, search)]
    pub email: String,
    #[entity(required, search)]
    pub department: String,
    #[entity(required)]
    pub role: String,
    #[entity(min_items = 1)]
    pub systems: Vec<String>,
    #[entity(preserve, lifecycle)]
    pub state: Tracked<ProvisioningStatus>,
    #[entity(preserve)]
    #[serde(default)]
    pub approved_by: Option<String>,
    #[entity(preserve)]
    #[serde(default)]
    pub approved_date: Option<SystemTime>,
}

impl ProvisioningRequest {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
        role: impl Into<String>,
        systems: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        ProvisioningRequest {
            full_name: full_name.into(),
            email: email.into(),
            department: department.into(),
            role: role.into(),
            systems: systems.into_iter().map(Into::into).collect(),
            state: Tracked::new(ProvisioningStatus::Pending),
            approved_by: None,
            approved_date: None,
        }
    }

    pub fn status(&self) -> ProvisioningStatus {
        self.state.status()
    }

    pub fn approve(&mut self, approver: &str) -> Result<(), TransitionError> {
        self.approve_at(approver, SystemTime::now())
    }

    /// Activate the account and stamp the approval.
    pub fn approve_at(&mut self, approver: &str, at: SystemTime) -> Result<(), TransitionError> {
        self.state
            .advance_at(ProvisioningStatus::Active, approver, None, at)?;
        self.approved_by = Some(approver.to_string());
        self.approved_date = Some(at);
        Ok(())
    }

    /// Decline a pending request. The request stays on record.
    pub fn reject(&mut self, reviewer: &str, reason: Option<String>) -> Result<(), TransitionError> {
        self.state
            .advance(ProvisioningStatus::Rejected, reviewer, reason)
            .map(|_| ())
    }

    pub fn begin_deprovisioning(&mut self, actor: &str) -> Result<(), TransitionError> {
        self.state
            .advance(ProvisioningStatus::Deprovisioning, actor, None)
            .map(|_| ())
    }

    pub fn complete_deprovisioning(&mut self, actor: &str) -> Result<(), TransitionError> {
        self.state
            .advance(ProvisioningStatus::Deprovisioned, actor, None)
            .map(|_| ())
    }
}

/// Lifecycle actions on a manager of provisioning requests.
pub trait ProvisioningWorkflow {
    fn approve(
        &mut self,
        id: RecordId,
        approver: &str,
    ) -> Result<&Record<ProvisioningRequest>, ManagerError>;

    fn reject(
        &mut self,
        id: RecordId,
        reviewer: &str,
        reason: Option<String>,
    ) -> Result<&Record<ProvisioningRequest>, ManagerError>;

    fn begin_deprovisioning(
        &mut self,
        id: RecordId,
        actor: &str,
    ) -> Result<&Record<ProvisioningRequest>, ManagerError>;

    fn complete_deprovisioning(
        &mut self,
        id: RecordId,
        actor: &str,
    ) -> Result<&Record<ProvisioningRequest>, ManagerError>;

    fn with_status(&self, status: ProvisioningStatus) -> View<'_, ProvisioningRequest>;

    fn status_counts(&self) -> BTreeMap<ProvisioningStatus, GroupStats>;
}

impl<N: Notifier> ProvisioningWorkflow for RecordManager<ProvisioningRequest, N> {
    fn approve(
        &mut self,
        id: RecordId,
        approver: &str,
    ) -> Result<&Record<ProvisioningRequest>, ManagerError> {
        self.transition(id, "approved", |request| request.approve(approver))
    }

    fn reject(
        &mut self,
        id: RecordId,
        reviewer: &str,
        reason: Option<String>,
    ) -> Result<&Record<ProvisioningRequest>, ManagerError> {
        self.transition(id, "rejected", |request| request.reject(reviewer, reason))
    }

    fn begin_deprovisioning(
        &mut self,
        id: RecordId,
        actor: &str,
    ) -> Result<&Record<ProvisioningRequest>, ManagerError> {
        self.transition(id, "marked for deprovisioning", |request| {
            request.begin_deprovisioning(actor)
        })
    }

    fn complete_deprovisioning(
        &mut self,
        id: RecordId,
        actor: &str,
    ) -> Result<&Record<ProvisioningRequest>, ManagerError> {
        self.transition(id, "deprovisioned", |request| {
            request.complete_deprovisioning(actor)
        })
    }

    fn with_status(&self, status: ProvisioningStatus) -> View<'_, ProvisioningRequest> {
        self.view().where_eq(ProvisioningRequest::status, status)
    }

    fn status_counts(&self) -> BTreeMap<ProvisioningStatus, GroupStats> {
        self.view().group_by(ProvisioningRequest::status)
    }
}

impl FromForm for ProvisioningRequest {
    fn from_form(form: &FormData) -> Result<Self, ValidationErrors> {
        let mut reader = form.reader();
        let request = ProvisioningRequest::new(
            reader.text("full_name"),
            reader.text("email"),
            reader.text("department"),
            reader.text("role"),
            reader.list("systems"),
        );
        reader.finish(request)
    }
}

impl IntoForm for ProvisioningRequest {
    fn to_form(&self) -> FormData {
        FormData::new()
            .with("full_name", self.full_name.as_str())
            .with("email", self.email.as_str())
            .with("department", self.department.as_str())
            .with("role", self.role.as_str())
            .with("systems", self.systems.join(", "))
    }
}

/// Seed rows covering pending, active and deprovisioning requests. The
/// later states are reached through the lifecycle itself.
pub fn fixture() -> Result<Vec<ProvisioningRequest>, TransitionError> {
    let mut active = ProvisioningRequest::new(
        "Jennifer Walsh",
        "jennifer.walsh@attune.example",
        "Lending",
        "Loan Officer",
        ["Core Banking", "Loan Origination", "Email"],
    );
    active.approve("IT Admin")?;

    let mut leaving = ProvisioningRequest::new(
        "Robert Kim",
        "robert.kim@attune.example",
        "Marketing",
        "Marketing Analyst",
        ["Member CRM", "Analytics Dashboard"],
    );
    leaving.approve("IT Admin")?;
    leaving.begin_deprovisioning("HR")?;

    Ok(vec![
        ProvisioningRequest::new(
            "Emily Rodriguez",
            "emily.rodriguez@attune.example",
            "Member Services",
            "Member Service Representative",
            ["Core Banking", "Member CRM", "Email"],
        ),
        active,
        leaving,
    ])
}
