use crate::entity::RecordId;
use crate::schema::ValidationErrors;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No record with this id exists (e.g. it was deleted through another path).
    #[error("record not found: {collection}:{id}")]
    NotFound {
        collection: &'static str,
        id: RecordId,
    },
    /// A fixture listed the same id twice.
    #[error("duplicate id in fixture: {collection}:{id}")]
    DuplicateId {
        collection: &'static str,
        id: RecordId,
    },
    /// A fixture id leaves no room for the ids of records created later.
    #[error("fixture id out of range: {collection}:{id}")]
    IdOutOfRange {
        collection: &'static str,
        id: RecordId,
    },
    /// A fixture row does not satisfy the entity schema.
    #[error("invalid fixture record {collection}:{id}: {errors}")]
    InvalidFixture {
        collection: &'static str,
        id: RecordId,
        errors: ValidationErrors,
    },
    /// Fixture or snapshot JSON could not be (de)serialized.
    #[error("fixture serialization error: {0}")]
    Serde(String),
}
