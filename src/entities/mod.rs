//! The record types behind each dashboard widget, with their fixtures.
//!
//! Every entity here is a flat struct deriving [`Entity`](crate::Entity);
//! the widgets differ only in fields, derived summaries, and (for the two
//! request types) a lifecycle.

pub mod access_request;
pub mod provisioning;
pub mod resource;
pub mod session_policy;
pub mod stakeholder;
pub mod user;

pub use access_request::{AccessLevel, AccessRequest, AccessReview};
pub use provisioning::{ProvisioningRequest, ProvisioningWorkflow};
pub use resource::{AllocationStatus, AllocationSummary, Priority, ResourceAllocation};
pub use session_policy::{PolicyEditor, SessionPolicy};
pub use stakeholder::{AlignmentSummary, Level, Quadrant, Stakeholder, StakeholderGroup};
pub use user::{User, UserDirectory, UserRole, UserStatus};
