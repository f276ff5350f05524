// The Entity derive emits `::attune_records::` paths; this lets them resolve
// inside the crate itself.
extern crate self as attune_records;

mod entity;
mod lifecycle;
mod manager;
mod notify;
mod schema;
mod store;
mod view;

pub mod entities;
pub mod routes;

pub use attune_records_macros::Entity;
pub use entity::{Choice, Entity, Record, RecordId, Seed, UnknownChoice};
pub use lifecycle::{
    AccessStatus, Lifecycle, ProvisioningStatus, Tracked, Transition, TransitionError,
};
pub use manager::{ManagerConfig, ManagerError, RecordManager};
#[cfg(feature = "emitter")]
pub use notify::EmitterNotifier;
pub use notify::{
    LogNotifier, Notification, NotificationKind, Notifier, Silent, Toast, ToastQueue,
    DEFAULT_TOAST_TTL,
};
pub use schema::form::{FormData, FormReader, FromForm, IntoForm};
pub use schema::{Accessor, Constraint, FieldRule, Schema, ValidationError, ValidationErrors};
pub use store::{RecordStore, StoreError};
pub use view::{
    percentage_of, round_to_tenth, Direction, GroupStats, Metric, Reducer, SortKey, View,
};

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
