//! Request lifecycles - small explicit state machines layered on records.
//!
//! A status enum implements [`Lifecycle`] by listing its legal edges. A
//! [`Tracked`] status only moves along those edges, stamps every move with
//! who made it and when, and keeps the stamps as an audit trail. Moves are
//! irreversible: there is no way to step back along an edge.

mod access;
mod provisioning;

pub use access::AccessStatus;
pub use provisioning::ProvisioningStatus;

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::entity::Choice;

/// A status enum with a fixed set of forward transitions.
pub trait Lifecycle: Choice {
    /// Whether `self -> next` is an edge of the state machine.
    fn can_transition_to(&self, next: Self) -> bool;

    /// A state with no outgoing edges.
    fn is_terminal(&self) -> bool {
        !Self::VARIANTS
            .iter()
            .any(|next| self.can_transition_to(*next))
    }

    /// States reachable in one step.
    fn next_states(&self) -> Vec<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }
}

/// An attempted move that is not an edge of the state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot move from {from} to {to}")]
pub struct TransitionError {
    pub from: &'static str,
    pub to: &'static str,
}

/// Audit stamp for one committed move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition<S> {
    pub from: S,
    pub to: S,
    pub actor: String,
    pub at: SystemTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A status plus the history of how it got there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracked<S> {
    status: S,
    #[serde(default = "Vec::new")]
    history: Vec<Transition<S>>,
}

impl<S: Lifecycle> Tracked<S> {
    pub fn new(status: S) -> Self {
        Tracked {
            status,
            history: Vec::new(),
        }
    }

    pub fn status(&self) -> S {
        self.status
    }

    pub fn history(&self) -> &[Transition<S>] {
        &self.history
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The most recent move, if any.
    pub fn last_transition(&self) -> Option<&Transition<S>> {
        self.history.last()
    }

    /// Move to `next` as `actor` at `at`. The status is unchanged on error.
    pub fn advance_at(
        &mut self,
        next: S,
        actor: impl Into<String>,
        note: Option<String>,
        at: SystemTime,
    ) -> Result<&Transition<S>, TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.status.as_str(),
                to: next.as_str(),
            });
        }
        self.history.push(Transition {
            from: self.status,
            to: next,
            actor: actor.into(),
            at,
            note,
        });
        self.status = next;
        Ok(&self.history[self.history.len() - 1])
    }

    /// [`advance_at`](Self::advance_at) stamped with the current time.
    pub fn advance(
        &mut self,
        next: S,
        actor: impl Into<String>,
        note: Option<String>,
    ) -> Result<&Transition<S>, TransitionError> {
        self.advance_at(next, actor, note, SystemTime::now())
    }

    /// Check that `self` is `previous` unchanged, or `previous` moved along
    /// exactly one edge with its history intact.
    pub fn follows(&self, previous: &Self) -> Result<(), TransitionError> {
        if self == previous {
            return Ok(());
        }
        let refused = TransitionError {
            from: previous.status.as_str(),
            to: self.status.as_str(),
        };
        let Some((step, earlier)) = self.history.split_last() else {
            return Err(refused);
        };
        let extends = earlier == previous.history.as_slice()
            && step.from == previous.status
            && step.to == self.status
            && previous.status.can_transition_to(self.status);
        if extends {
            Ok(())
        } else {
            Err(refused)
        }
    }
}
