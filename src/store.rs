//! The record store: one keyed collection backed by a single JSON file.

use crate::error::{Result, StoreError};
use crate::records::StoreRecord;
use crate::types::{FieldValue, Timestamp};
use serde::Serialize;
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A keyed collection of records, backed 1:1 by a JSON file on disk.
///
/// The store owns its collection and its backing file exclusively; every
/// mutating call persists before returning, so there is no separate commit
/// step. Lookups are first-match linear scans — collections here are a few
/// thousand records, and scan order doubles as insertion order.
///
/// Single-threaded by contract: one process, one writer, no locking.
#[derive(Debug)]
pub struct RecordStore<R> {
    /// Backing file.
    path: PathBuf,

    /// The collection, in insertion order.
    records: Vec<R>,
}

impl<R: StoreRecord> RecordStore<R> {
    /// Open the store at `path`, creating an empty backing file if none
    /// exists.
    ///
    /// A missing file is created empty; an existing zero-length file yields
    /// an empty collection without a parse attempt; anything else must parse
    /// as a JSON array of records. A malformed file is fatal — the store
    /// cannot establish a safe initial state, and partial recovery would
    /// silently drop records on the next save.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = Self::load_or_init(&path)?;
        debug!(
            kind = R::KIND,
            path = %path.display(),
            count = records.len(),
            "opened store"
        );
        Ok(Self { path, records })
    }

    /// Load-or-create semantics, shared by every store kind.
    fn load_or_init(path: &Path) -> Result<Vec<R>> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            File::create(path)?;
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(path)?;
        if contents.is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    // --- Lookups ---

    /// True iff a record with `key` is present, soft-deleted ones included.
    pub fn exists(&self, key: &str) -> bool {
        self.records.iter().any(|r| r.key() == key)
    }

    /// Position of the first record with `key`.
    pub fn get_index(&self, key: &str) -> Option<usize> {
        self.records.iter().position(|r| r.key() == key)
    }

    /// First record with `key`.
    pub fn get(&self, key: &str) -> Option<&R> {
        self.records.iter().find(|r| r.key() == key)
    }

    /// The whole collection, in insertion order.
    ///
    /// Callers iterate and filter this directly ("all records rated at least
    /// N" and the like); the store offers no query layer.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // --- Mutations ---

    /// Add a new record for `key` with the kind's creation defaults and a
    /// fresh timestamp, then persist.
    ///
    /// Duplicate keys are rejected as a logged no-op, soft-deleted records
    /// included, so the collection never holds two records for one key and a
    /// soft-deleted record cannot be resurrected by re-adding it.
    pub fn add(&mut self, key: &str) -> Result<()> {
        if self.exists(key) {
            warn!(kind = R::KIND, key, "already in database, skipping add");
            return Ok(());
        }

        info!(kind = R::KIND, key, "adding to database");
        self.records.push(R::create(key, Timestamp::now()));

        if let Err(e) = self.save() {
            self.records.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Update one field of the first record with `key`, then persist.
    ///
    /// The field name must belong to the kind's updatable set and the value
    /// must coerce to the field's stored type; either failure is a
    /// recoverable error that leaves the store untouched. A missing key is a
    /// logged no-op. On success the field and a fresh timestamp are written
    /// together — never one without the other.
    pub fn update(&mut self, key: &str, field: &str, value: impl Into<FieldValue>) -> Result<()> {
        let value = value.into();

        let Some(parsed) = R::parse_field(field) else {
            warn!(kind = R::KIND, key, field, "unknown field, skipping update");
            return Err(StoreError::UnknownField(field.to_string()));
        };

        let Some(idx) = self.get_index(key) else {
            warn!(kind = R::KIND, key, "not in database, skipping update");
            return Ok(());
        };

        // Coercion happens before anything is written, so a bad value leaves
        // the record untouched.
        let prev = self.records[idx].clone();
        if let Err(e) = self.records[idx].apply(parsed, &value) {
            warn!(kind = R::KIND, key, field, error = %e, "rejected update");
            return Err(e);
        }
        self.records[idx].touch(Timestamp::now());
        debug!(kind = R::KIND, key, field, value = ?value, "updating field");

        if let Err(e) = self.save() {
            self.records[idx] = prev;
            return Err(e);
        }
        Ok(())
    }

    /// Set the rating for `key`; shorthand for `update(key, "rating", ...)`.
    pub fn rate(&mut self, key: &str, value: impl Into<FieldValue>) -> Result<()> {
        self.update(key, "rating", value)
    }

    /// Soft-delete the first record with `key`, then persist.
    ///
    /// The record stays in the collection with its validity flag cleared
    /// until a later [`cleanup`] pass drops it; there is no transition back
    /// to valid. A missing key is a logged no-op.
    ///
    /// [`cleanup`]: RecordStore::cleanup
    pub fn remove(&mut self, key: &str) -> Result<()> {
        let Some(idx) = self.get_index(key) else {
            warn!(kind = R::KIND, key, "not in database, skipping remove");
            return Ok(());
        };

        info!(kind = R::KIND, key, "removing from database");
        let prev = self.records[idx].clone();
        self.records[idx].invalidate();
        self.records[idx].touch(Timestamp::now());

        if let Err(e) = self.save() {
            self.records[idx] = prev;
            return Err(e);
        }
        Ok(())
    }

    /// Physically drop every soft-deleted record, persisting once at the end
    /// rather than per record. Returns how many records were dropped.
    pub fn cleanup(&mut self) -> Result<usize> {
        let prev = self.records.clone();

        self.records.retain(|record| {
            if record.is_valid() {
                true
            } else {
                info!(kind = R::KIND, key = record.key(), "dropping invalid record");
                false
            }
        });

        let dropped = prev.len() - self.records.len();
        if dropped == 0 {
            return Ok(0);
        }

        if let Err(e) = self.save() {
            self.records = prev;
            return Err(e);
        }
        Ok(dropped)
    }

    // --- Persistence ---

    /// Serialize the whole collection and atomically replace the backing
    /// file.
    ///
    /// The document is written to a sibling temp file which is then renamed
    /// over the original, so a crash mid-write cannot leave a truncated
    /// database behind.
    pub fn save(&self) -> Result<()> {
        let tmp = self.tmp_path();

        if let Err(e) = self.write_document(&tmp) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, &self.path)?;

        debug!(
            kind = R::KIND,
            path = %self.path.display(),
            count = self.records.len(),
            "saved database"
        );
        Ok(())
    }

    fn write_document(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        {
            // Indented output, so the file stays hand-inspectable.
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(&mut file, formatter);
            self.records.serialize(&mut ser)?;
        }
        file.sync_all()?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}
