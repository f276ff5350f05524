use super::Lifecycle;

crate::choice! {
    /// Account state of a provisioning request.
    ///
    /// `Rejected` is a tracked terminal state; a declined request stays on
    /// record instead of being deleted.
    pub enum ProvisioningStatus {
        Pending => "pending",
        Active => "active",
        Deprovisioning => "deprovisioning",
        Deprovisioned => "deprovisioned",
        Rejected => "rejected",
    }
}

impl Lifecycle for ProvisioningStatus {
    fn can_transition_to(&self, next: Self) -> bool {
        use ProvisioningStatus::*;
        matches!(
            (self, next),
            (Pending, Active)
                | (Pending, Rejected)
                | (Active, Deprovisioning)
                | (Deprovisioning, Deprovisioned)
        )
    }
}
