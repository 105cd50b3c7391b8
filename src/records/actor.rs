//! Actor records.

use super::{default_true, StoreRecord};
use crate::error::Result;
use crate::types::{FieldValue, Timestamp};
use serde::{Deserialize, Serialize};

/// One performer, keyed by display name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorRecord {
    /// Display name, unique within the collection.
    pub name: String,

    /// Last-modified marker, refreshed on every mutation.
    pub timestamp: Timestamp,

    /// None means unrated.
    #[serde(default)]
    pub rating: Option<i64>,

    /// Cleared by soft delete. Older files never carried this flag, so
    /// absence loads as valid.
    #[serde(default = "default_true")]
    pub is_valid: bool,
}

/// Updatable actor fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActorField {
    Rating,
}

impl StoreRecord for ActorRecord {
    type Field = ActorField;

    const KIND: &'static str = "actor";

    fn create(key: &str, now: Timestamp) -> Self {
        Self {
            name: key.to_string(),
            timestamp: now,
            rating: None,
            is_valid: true,
        }
    }

    fn key(&self) -> &str {
        &self.name
    }

    fn is_valid(&self) -> bool {
        self.is_valid
    }

    fn invalidate(&mut self) {
        self.is_valid = false;
    }

    fn touch(&mut self, now: Timestamp) {
        self.timestamp = now;
    }

    fn parse_field(name: &str) -> Option<ActorField> {
        match name {
            "rating" => Some(ActorField::Rating),
            _ => None,
        }
    }

    fn apply(&mut self, field: ActorField, value: &FieldValue) -> Result<()> {
        match field {
            ActorField::Rating => self.rating = value.to_nullable_int("rating")?,
        }
        Ok(())
    }
}
