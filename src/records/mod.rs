//! Record kinds and the contract the store requires of them.

mod actor;
mod movie;

pub use actor::{ActorField, ActorRecord};
pub use movie::{MovieField, MovieRecord};

use crate::error::Result;
use crate::types::{FieldValue, Timestamp};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A keyed record the store can manage.
///
/// Each record kind declares its own enumerated set of updatable fields, so
/// an update naming anything outside that set fails gracefully instead of
/// writing an arbitrary key into the file.
pub trait StoreRecord: Clone + Serialize + DeserializeOwned {
    /// Updatable field set for this record kind.
    type Field: Copy + std::fmt::Debug;

    /// Kind name used in log events.
    const KIND: &'static str;

    /// Build a new record for `key` with this kind's creation defaults.
    fn create(key: &str, now: Timestamp) -> Self;

    /// The unique key value.
    fn key(&self) -> &str;

    /// False once the record has been soft-deleted.
    fn is_valid(&self) -> bool;

    /// Soft-delete the record. There is no way back to valid.
    fn invalidate(&mut self);

    /// Refresh the timestamp.
    fn touch(&mut self, now: Timestamp);

    /// Resolve a field name to this kind's field set.
    fn parse_field(name: &str) -> Option<Self::Field>;

    /// Coerce `value` for `field` and write it. Fails without touching the
    /// record when the value cannot be coerced.
    fn apply(&mut self, field: Self::Field, value: &FieldValue) -> Result<()>;
}

pub(crate) fn default_true() -> bool {
    true
}
