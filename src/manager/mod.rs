//! RecordManager - the local record manager behind every CRUD widget.
//!
//! A manager owns one [`RecordStore`], validates every mutation against the
//! entity schema before touching the store, and reports each committed change
//! to its [`Notifier`]. Reads go through [`View`]s over the live collection.
//!
//! ## Example
//!
//! ```ignore
//! use attune_records::{entities::resource, FormData, RecordManager, ToastQueue};
//!
//! let mut manager = RecordManager::seeded(resource::fixture())?
//!     .with_notifier(ToastQueue::new());
//!
//! let form = FormData::new()
//!     .with("initiative", "Youth Savings Accounts")
//!     .with("budget", "12000")
//!     .with("staff_hours", "80")
//!     .with("timeline_months", "6")
//!     .with("priority", "medium")
//!     .with("status", "planning");
//! let created = manager.submit_create(&form)?;
//! ```

mod config;
mod error;

pub use config::ManagerConfig;
pub use error::ManagerError;

use tracing::{debug, warn};

use crate::entity::{Entity, Record, RecordId};
use crate::lifecycle::TransitionError;
use crate::notify::{Notification, Notifier, Silent};
use crate::schema::form::{FormData, FromForm, IntoForm};
use crate::schema::Schema;
use crate::store::{RecordStore, StoreError};
use crate::view::View;

pub struct RecordManager<T, N = Silent> {
    store: RecordStore<T>,
    schema: Schema<T>,
    notifier: N,
    config: ManagerConfig,
}

impl<T: Entity> RecordManager<T, Silent> {
    /// Wrap an existing store. Notifications are discarded until a notifier
    /// is attached with [`with_notifier`](Self::with_notifier).
    pub fn new(store: RecordStore<T>) -> Self {
        RecordManager {
            store,
            schema: T::schema(),
            notifier: Silent,
            config: ManagerConfig::default(),
        }
    }

    /// Seed from fixture rows; ids are assigned in order starting at 1.
    pub fn seeded(fixture: impl IntoIterator<Item = T>) -> Result<Self, StoreError> {
        Ok(Self::new(RecordStore::seeded(fixture)?))
    }

    /// Start with no records.
    pub fn empty() -> Self {
        Self::new(RecordStore::new())
    }
}

impl<T: Entity, N: Notifier> RecordManager<T, N> {
    /// Replace the notifier.
    pub fn with_notifier<M: Notifier>(self, notifier: M) -> RecordManager<T, M> {
        RecordManager {
            store: self.store,
            schema: self.schema,
            notifier,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn schema(&self) -> &Schema<T> {
        &self.schema
    }

    pub fn store(&self) -> &RecordStore<T> {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Take the manager apart, e.g. to hand the notifier to another owner.
    pub fn into_parts(self) -> (RecordStore<T>, N) {
        (self.store, self.notifier)
    }

    /// The word used for one record in messages.
    pub fn noun(&self) -> &str {
        self.config.noun.as_deref().unwrap_or(T::NOUN)
    }

    // ------------------------------------------------------------------
    // reads
    // ------------------------------------------------------------------

    /// All records in insertion (display) order.
    pub fn list(&self) -> &[Record<T>] {
        self.store.list()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record<T>> {
        self.store.get(id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// A fresh derived view over the current records.
    pub fn view(&self) -> View<'_, T> {
        View::new(self.store.list())
    }

    /// Validate a candidate without committing it.
    pub fn validate(&self, candidate: &T) -> Result<(), ManagerError> {
        self.schema.validate(candidate).map_err(|errors| {
            warn!(
                collection = T::COLLECTION,
                fields = errors.len(),
                "rejected invalid {}",
                self.noun()
            );
            ManagerError::Validation(errors)
        })
    }

    // ------------------------------------------------------------------
    // mutations
    // ------------------------------------------------------------------

    /// Validate and append a new record.
    pub fn create(&mut self, candidate: T) -> Result<&Record<T>, ManagerError> {
        self.validate(&candidate)?;
        let id = self.store.create(candidate).id;
        self.announce(id, "created");
        Ok(self.store.require(id)?)
    }

    /// Validate and replace the editable fields of an existing record.
    pub fn update(&mut self, id: RecordId, mut candidate: T) -> Result<&Record<T>, ManagerError> {
        if let Some(previous) = self.store.get(id) {
            candidate.keep_on_update(&previous.fields);
        }
        self.validate(&candidate)?;
        let outcome = self.store.update(id, candidate).map(|_| ());
        if let Err(err) = outcome {
            return Err(self.refuse(err.into()));
        }
        self.announce(id, "updated");
        Ok(self.store.require(id)?)
    }

    /// Remove a record, returning it.
    pub fn delete(&mut self, id: RecordId) -> Result<Record<T>, ManagerError> {
        match self.store.delete(id) {
            Ok(record) => {
                let message = self.message(record.label(), "deleted");
                self.notifier.notify(Notification::success(message));
                Ok(record)
            }
            Err(err) => Err(self.refuse(err.into())),
        }
    }

    /// Apply a fallible in-place change (usually a lifecycle move) to one
    /// record. Nothing is committed unless `apply` succeeds, the result
    /// passes [`Entity::check_change`] against the stored record, and it
    /// still satisfies the schema. `verb` names the action in the
    /// notification ("approved", "deprovisioned").
    pub fn transition<F>(
        &mut self,
        id: RecordId,
        verb: &str,
        apply: F,
    ) -> Result<&Record<T>, ManagerError>
    where
        F: FnOnce(&mut T) -> Result<(), TransitionError>,
    {
        let current = self.store.require(id).map(|record| record.fields.clone());
        let previous = match current {
            Ok(fields) => fields,
            Err(err) => return Err(self.refuse(err.into())),
        };
        let mut fields = previous.clone();
        if let Err(err) = apply(&mut fields).and_then(|()| fields.check_change(&previous)) {
            return Err(self.refuse(err.into()));
        }
        self.validate(&fields)?;
        self.store.update(id, fields)?;
        self.announce(id, verb);
        Ok(self.store.require(id)?)
    }

    // ------------------------------------------------------------------
    // form boundary
    // ------------------------------------------------------------------

    /// Parse, validate, and create from a form submission.
    pub fn submit_create(&mut self, form: &FormData) -> Result<&Record<T>, ManagerError>
    where
        T: FromForm,
    {
        let candidate = T::from_form(form)?;
        self.create(candidate)
    }

    /// Parse, validate, and update from an edit form submission.
    pub fn submit_update(
        &mut self,
        id: RecordId,
        form: &FormData,
    ) -> Result<&Record<T>, ManagerError>
    where
        T: FromForm,
    {
        let candidate = T::from_form(form)?;
        self.update(id, candidate)
    }

    /// The edit form for an existing record, pre-filled with its fields.
    pub fn edit_form(&self, id: RecordId) -> Result<FormData, ManagerError>
    where
        T: IntoForm,
    {
        Ok(self.store.require(id)?.fields.to_form())
    }

    // ------------------------------------------------------------------
    // notifications
    // ------------------------------------------------------------------

    fn message(&self, label: &str, verb: &str) -> String {
        format!("{} \"{}\" {}", self.noun(), label, verb)
    }

    fn announce(&mut self, id: RecordId, verb: &str) {
        let Some(record) = self.store.get(id) else {
            return;
        };
        let message = self.message(record.label(), verb);
        debug!(collection = T::COLLECTION, %id, verb, "committed");
        self.notifier.notify(Notification::success(message));
    }

    /// Report a refused mutation and hand the error back.
    fn refuse(&mut self, error: ManagerError) -> ManagerError {
        warn!(collection = T::COLLECTION, %error, "mutation refused");
        if self.config.notify_failures {
            let message = match &error {
                ManagerError::Store(StoreError::NotFound { id, .. }) => {
                    format!("{} #{} no longer exists", self.noun(), id)
                }
                other => format!("Could not update {}: {}", self.noun(), other),
            };
            self.notifier.notify(Notification::error(message));
        }
        error
    }
}
