//! Movie records.

use super::{default_true, StoreRecord};
use crate::error::Result;
use crate::types::{FieldValue, Timestamp};
use serde::{Deserialize, Serialize};

/// Category assigned at creation.
const DEFAULT_CATEGORY: &str = "Straight";

/// Actor name used when the relative path carries no actor folder.
const UNKNOWN_ACTOR: &str = "Unknown";

/// One movie file, keyed by its path relative to the collection root.
///
/// The relative path is the identity on purpose: titles collide between
/// folders, and absolute paths break when the collection root moves. Moving
/// a file within the collection resets its stats, which is acceptable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Relative file path, unique within the collection.
    pub rel_path: String,

    /// Last-modified marker, refreshed on every mutation.
    pub timestamp: Timestamp,

    /// Cleared by soft delete; invalid records are dropped by `cleanup`.
    #[serde(default = "default_true")]
    pub is_valid: bool,

    /// None means unrated.
    #[serde(default)]
    pub rating: Option<i64>,

    #[serde(default)]
    pub playcount: u64,

    /// Display name, derived from the path at creation time.
    #[serde(default = "unknown_actor")]
    pub actor: String,

    #[serde(default = "default_category")]
    pub category: String,

    /// Marks the file for deletion by the folder-fixing pass.
    #[serde(default)]
    pub delete: bool,

    /// Marks the file for the splitter tooling.
    #[serde(default)]
    pub split: bool,

    #[serde(default)]
    pub note: Option<String>,
}

/// Updatable movie fields.
///
/// `rel_path` and `timestamp` are deliberately absent: the store stamps the
/// timestamp itself, and rewriting the key would break uniqueness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovieField {
    Rating,
    Playcount,
    Actor,
    Category,
    IsValid,
    Delete,
    Split,
    Note,
}

impl StoreRecord for MovieRecord {
    type Field = MovieField;

    const KIND: &'static str = "movie";

    fn create(key: &str, now: Timestamp) -> Self {
        Self {
            rel_path: key.to_string(),
            timestamp: now,
            is_valid: true,
            rating: None,
            playcount: 0,
            actor: actor_from_path(key),
            category: DEFAULT_CATEGORY.to_string(),
            delete: false,
            split: false,
            note: None,
        }
    }

    fn key(&self) -> &str {
        &self.rel_path
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

    fn parse_field(name: &str) -> Option<MovieField> {
        match name {
            "rating" => Some(MovieField::Rating),
            "playcount" => Some(MovieField::Playcount),
            "actor" => Some(MovieField::Actor),
            "category" => Some(MovieField::Category),
            "is_valid" => Some(MovieField::IsValid),
            "delete" => Some(MovieField::Delete),
            "split" => Some(MovieField::Split),
            "note" => Some(MovieField::Note),
            _ => None,
        }
    }

    fn apply(&mut self, field: MovieField, value: &FieldValue) -> Result<()> {
        match field {
            MovieField::Rating => self.rating = value.to_nullable_int("rating")?,
            MovieField::Playcount => self.playcount = value.to_count("playcount")?,
            MovieField::Actor => self.actor = value.to_text("actor")?,
            MovieField::Category => self.category = value.to_text("category")?,
            MovieField::IsValid => self.is_valid = value.to_flag(),
            MovieField::Delete => self.delete = value.to_flag(),
            MovieField::Split => self.split = value.to_flag(),
            MovieField::Note => self.note = value.to_nullable_text("note")?,
        }
        Ok(())
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn unknown_actor() -> String {
    UNKNOWN_ACTOR.to_string()
}

/// Derive the actor name from the relative path.
///
/// The collection is organized as `<actor>/<file>` or
/// `<category>/<actor>/<...>/<file>`: after dropping the file name, the actor
/// is the second directory component when present, otherwise the first.
fn actor_from_path(rel_path: &str) -> String {
    let mut dirs: Vec<&str> = rel_path
        .split(|c| c == '/' || c == '\\')
        .filter(|part| !part.is_empty())
        .collect();
    dirs.pop(); // file name

    match (dirs.first(), dirs.get(1)) {
        (_, Some(second)) => second.to_string(),
        (Some(first), None) => first.to_string(),
        (None, None) => UNKNOWN_ACTOR.to_string(),
    }
}
