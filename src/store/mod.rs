//! RecordStore - the authoritative in-memory, insertion-ordered collection
//! for one entity type.
//!
//! The store does not validate mutations; callers hand it candidates that
//! already passed the entity schema (the record manager does this). Fixtures
//! are the exception: they are checked on load.
//!
//! Ids come from a high-water mark that only moves forward, so an id is never
//! handed out twice in a session, even after the record holding it is deleted.

mod error;

pub use error::StoreError;

use std::collections::HashSet;
use std::time::SystemTime;

use tracing::debug;

use crate::entity::{Entity, Record, RecordId, Seed};

#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    records: Vec<Record<T>>,
    high_water: u64,
}

impl<T: Entity> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> RecordStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        RecordStore {
            records: Vec::new(),
            high_water: 0,
        }
    }

    /// Seed from fixture rows without ids; ids are assigned 1, 2, 3, ...
    pub fn seeded(fixture: impl IntoIterator<Item = T>) -> Result<Self, StoreError> {
        let seeds = fixture
            .into_iter()
            .enumerate()
            .map(|(i, fields)| Seed::new(i as u64 + 1, fields))
            .collect();
        Self::from_seeds(seeds)
    }

    /// Seed from fixture rows carrying explicit ids.
    ///
    /// Rejects duplicate ids, `u64::MAX` and rows that fail the schema. The
    /// next created record gets the largest seeded id + 1.
    pub fn from_seeds(seeds: Vec<Seed<T>>) -> Result<Self, StoreError> {
        let schema = T::schema();
        let mut seen = HashSet::with_capacity(seeds.len());
        let mut store = Self::new();

        for seed in seeds {
            if seed.id.0 == u64::MAX {
                return Err(StoreError::IdOutOfRange {
                    collection: T::COLLECTION,
                    id: seed.id,
                });
            }
            if !seen.insert(seed.id) {
                return Err(StoreError::DuplicateId {
                    collection: T::COLLECTION,
                    id: seed.id,
                });
            }
            schema
                .validate(&seed.fields)
                .map_err(|errors| StoreError::InvalidFixture {
                    collection: T::COLLECTION,
                    id: seed.id,
                    errors,
                })?;
            store.high_water = store.high_water.max(seed.id.0);
            store.records.push(Record::new(seed.id, seed.fields));
        }

        debug!(
            collection = T::COLLECTION,
            records = store.records.len(),
            "seeded record store"
        );
        Ok(store)
    }

    /// Seed from a JSON array of `{ "id": .., ...fields }` objects.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let seeds: Vec<Seed<T>> =
            serde_json::from_str(json).map_err(|e| StoreError::Serde(e.to_string()))?;
        Self::from_seeds(seeds)
    }

    /// Export the live collection as a JSON fixture.
    pub fn to_json(&self) -> Result<String, StoreError> {
        let seeds: Vec<Seed<&T>> = self
            .records
            .iter()
            .map(|record| Seed {
                id: record.id,
                fields: &record.fields,
            })
            .collect();
        serde_json::to_string_pretty(&seeds).map_err(|e| StoreError::Serde(e.to_string()))
    }

    /// Append a new record with a fresh id.
    pub fn create(&mut self, fields: T) -> &Record<T> {
        // seeding refuses u64::MAX, so this stays below it
        self.high_water += 1;
        let id = RecordId(self.high_water);
        debug!(collection = T::COLLECTION, %id, "create");
        self.records.push(Record::new(id, fields));
        &self.records[self.records.len() - 1]
    }

    /// Replace the fields of an existing record; id and position are kept.
    pub fn update(&mut self, id: RecordId, fields: T) -> Result<&Record<T>, StoreError> {
        let index = self.position(id)?;
        debug!(collection = T::COLLECTION, %id, "update");
        let record = &mut self.records[index];
        record.fields = fields;
        record.updated_at = SystemTime::now();
        Ok(&self.records[index])
    }

    /// Remove a record, returning it. Other records keep their relative order.
    pub fn delete(&mut self, id: RecordId) -> Result<Record<T>, StoreError> {
        let index = self.position(id)?;
        debug!(collection = T::COLLECTION, %id, "delete");
        Ok(self.records.remove(index))
    }

    pub fn get(&self, id: RecordId) -> Option<&Record<T>> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Like [`get`](Self::get) but not-found is an error.
    pub fn require(&self, id: RecordId) -> Result<&Record<T>, StoreError> {
        self.position(id).map(|index| &self.records[index])
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.get(id).is_some()
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[Record<T>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: RecordId) -> Result<usize, StoreError> {
        self.records
            .iter()
            .position(|record| record.id == id)
            .ok_or(StoreError::NotFound {
                collection: T::COLLECTION,
                id,
            })
    }
}
