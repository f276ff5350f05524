use super::Lifecycle;

crate::choice! {
    /// Review state of an access request.
    pub enum AccessStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

impl Lifecycle for AccessStatus {
    fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (AccessStatus::Pending, AccessStatus::Approved)
                | (AccessStatus::Pending, AccessStatus::Rejected)
        )
    }
}
