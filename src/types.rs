//! Core types for the record store.

use crate::error::{Result, StoreError};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wire format for timestamps. Parsing uses `%.f` so files written before
/// fractional seconds were recorded still load.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S%.6f";
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%d_%H:%M:%S%.f";

/// Microseconds since Unix epoch.
///
/// Serialized as a human-readable `YYYY-MM-DD_HH:MM:SS.ffffff` string (UTC),
/// the format the database files have always carried.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        Timestamp(Utc::now().timestamp_micros())
    }

    /// Parse from the wire format.
    pub fn parse(s: &str) -> Option<Self> {
        let dt = NaiveDateTime::parse_from_str(s, TIMESTAMP_PARSE_FORMAT).ok()?;
        Some(Timestamp(dt.and_utc().timestamp_micros()))
    }

    fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format(TIMESTAMP_FORMAT)),
            None => write!(f, "{}", self.0),
        }
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse(&s).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {s:?}")))
    }
}

/// A caller-supplied field value, before coercion.
///
/// Callers sit behind an interactive menu, so values usually arrive as
/// strings; the store coerces them to each field's stored type on write.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
}

impl FieldValue {
    /// Coerce to an integer. Digit strings are accepted, surrounding
    /// whitespace tolerated; booleans map to 0/1.
    pub fn to_int(&self, field: &'static str) -> Result<i64> {
        match self {
            FieldValue::Int(n) => Ok(*n),
            FieldValue::Bool(b) => Ok(*b as i64),
            FieldValue::Str(s) => s.trim().parse().map_err(|_| self.invalid(field)),
            FieldValue::Null => Err(self.invalid(field)),
        }
    }

    /// Coerce to a nullable integer; `Null` clears the value.
    pub fn to_nullable_int(&self, field: &'static str) -> Result<Option<i64>> {
        match self {
            FieldValue::Null => Ok(None),
            other => other.to_int(field).map(Some),
        }
    }

    /// Coerce to a non-negative count.
    pub fn to_count(&self, field: &'static str) -> Result<u64> {
        let n = self.to_int(field)?;
        u64::try_from(n).map_err(|_| self.invalid(field))
    }

    /// Coerce to a workflow flag. Only `true` and the string `"True"`/`"true"`
    /// are truthy; everything else is false. Total, so flag updates never fail.
    pub fn to_flag(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Str(s) => s == "True" || s == "true",
            _ => false,
        }
    }

    /// Coerce to text.
    pub fn to_text(&self, field: &'static str) -> Result<String> {
        match self {
            FieldValue::Str(s) => Ok(s.clone()),
            _ => Err(self.invalid(field)),
        }
    }

    /// Coerce to nullable text; `Null` clears the value.
    pub fn to_nullable_text(&self, field: &'static str) -> Result<Option<String>> {
        match self {
            FieldValue::Null => Ok(None),
            other => other.to_text(field).map(Some),
        }
    }

    fn invalid(&self, field: &'static str) -> StoreError {
        StoreError::InvalidValue {
            field,
            value: self.render(),
        }
    }

    fn render(&self) -> String {
        match self {
            FieldValue::Null => "null".to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(n) => n.to_string(),
            FieldValue::Str(s) => s.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Int(n as i64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => FieldValue::Null,
        }
    }
}
