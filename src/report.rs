//! Core diagnostic report types
//!
//! This module defines the data structures a snapshot is built from:
//! individual labeled readings and the immutable, timestamped snapshot
//! that groups them.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Timestamp type for consistent time handling across the application
pub type Timestamp = DateTime<Utc>;

/// A single diagnostic reading
///
/// Values are either numeric, a preformatted string (e.g. `"12 / 30"`),
/// or an explicit marker for a reading that could not be taken.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// A numeric reading
    Number(f64),
    /// A preformatted textual reading
    Text(String),
    /// The underlying facility was absent, restricted, or faulted
    Unavailable(String),
}

impl MetricValue {
    /// Numeric view of the value, if it has one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Human-readable rendering used by the dialog surface
    pub fn display(&self) -> String {
        match self {
            MetricValue::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{:.2}", n)
                }
            }
            MetricValue::Text(s) | MetricValue::Unavailable(s) => s.clone(),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Number(n) => serializer.serialize_f64(*n),
            MetricValue::Text(s) | MetricValue::Unavailable(s) => serializer.serialize_str(s),
        }
    }
}

/// A labeled reading produced by a probe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricEntry {
    pub label: String,
    pub value: MetricValue,
}

impl MetricEntry {
    pub fn number(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value: MetricValue::Number(value),
        }
    }

    pub fn text(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: MetricValue::Text(value.into()),
        }
    }

    pub fn unavailable(label: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: MetricValue::Unavailable(marker.into()),
        }
    }
}

/// One complete, timestamped set of diagnostic readings
///
/// Entries keep probe registration order so downstream rendering and
/// grouping is deterministic. A snapshot is never mutated after the
/// collector builds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    timestamp: Timestamp,
    entries: Vec<MetricEntry>,
}

impl Snapshot {
    pub fn new(timestamp: Timestamp, entries: Vec<MetricEntry>) -> Self {
        Self { timestamp, entries }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn entries(&self) -> &[MetricEntry] {
        &self.entries
    }

    /// Labels in entry order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    /// Look up a reading by its label
    pub fn get(&self, label: &str) -> Option<&MetricValue> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| &e.value)
    }
}

impl Serialize for Snapshot {
    /// Serializes as a flat map: a `timestamp` field followed by one key
    /// per label, in entry order.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len() + 1))?;
        map.serialize_entry("timestamp", &self.timestamp.to_rfc3339())?;
        for entry in &self.entries {
            map.serialize_entry(&entry.label, &entry.value)?;
        }
        map.end()
    }
}
