use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::Entity;

/// Identity of a record within its collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId(value)
    }
}

/// A stored record: store-assigned identity plus the entity's fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: T,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

impl<T: Entity> Record<T> {
    pub(crate) fn new(id: RecordId, fields: T) -> Self {
        let now = SystemTime::now();
        Record {
            id,
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn label(&self) -> &str {
        self.fields.label()
    }

    /// Id as shown to users, with the entity's prefix if it declares one.
    pub fn display_id(&self) -> String {
        match T::ID_PREFIX {
            Some(prefix) => format!("{}-{:04}", prefix, self.id.0),
            None => self.id.to_string(),
        }
    }
}

/// A fixture row: an explicit id plus fields. Timestamps are assigned on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Seed<T> {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: T,
}

impl<T> Seed<T> {
    pub fn new(id: u64, fields: T) -> Self {
        Seed {
            id: RecordId(id),
            fields,
        }
    }
}
