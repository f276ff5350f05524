use crate::lifecycle::TransitionError;
use crate::schema::ValidationErrors;
use crate::store::StoreError;

/// Why a record manager refused a mutation. The store is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManagerError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl ManagerError {
    /// Field-level messages, when the failure was a validation failure.
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            ManagerError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ManagerError::Store(StoreError::NotFound { .. }))
    }
}
