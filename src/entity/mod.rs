mod choice;
mod record;

pub use choice::{Choice, UnknownChoice};
pub use record::{Record, RecordId, Seed};

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

use crate::lifecycle::TransitionError;
use crate::schema::Schema;

/// Trait for flat record types held by a record manager.
///
/// Usually derived with `#[derive(Entity)]`, which builds the schema from
/// field attributes.
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// The collection name for this entity type (e.g., "resource_allocations").
    const COLLECTION: &'static str;

    /// Human-readable name of one record, used in notifications ("Stakeholder").
    const NOUN: &'static str;

    /// Optional display prefix for ids (`AR` renders id 3 as `AR-0003`).
    const ID_PREFIX: Option<&'static str> = None;

    /// The field that names a record to a person.
    fn label(&self) -> &str;

    /// Field rules every committed record must satisfy.
    fn schema() -> Schema<Self>;

    /// Text fields matched by free-text search. Defaults to the label.
    fn search_text(&self) -> Vec<&str> {
        vec![self.label()]
    }

    /// Copy fields an edit must not change (lifecycle state, review stamps)
    /// from the stored version into an incoming candidate.
    fn keep_on_update(&mut self, _previous: &Self) {}

    /// Refuse an in-place change that moves lifecycle state anywhere other
    /// than one legal step on from `previous`.
    fn check_change(&self, _previous: &Self) -> Result<(), TransitionError> {
        Ok(())
    }
}
