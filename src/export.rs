//! JSON export of snapshots
//!
//! Serializes a snapshot wrapped with the export time and writes it to a
//! file named `<prefix>-<millis-since-epoch>.json`, pretty-printed with
//! 2-space indentation, UTF-8.

use crate::error::ExportError;
use crate::report::Snapshot;
use chrono::Utc;
use log::info;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

/// Logical content type of exported reports
pub const CONTENT_TYPE: &str = "application/json";

/// Default export file name prefix
pub const DEFAULT_PREFIX: &str = "perf-report";

/// A snapshot wrapped with its export time, in the flat shape the report
/// file carries: `exportedAt`, `timestamp`, then one key per label.
struct ExportedReport<'a> {
    exported_at_ms: i64,
    snapshot: &'a Snapshot,
}

impl Serialize for ExportedReport<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.snapshot.entries();
        let mut map = serializer.serialize_map(Some(entries.len() + 2))?;
        map.serialize_entry("exportedAt", &self.exported_at_ms)?;
        map.serialize_entry("timestamp", &self.snapshot.timestamp().to_rfc3339())?;
        for entry in entries {
            map.serialize_entry(&entry.label, &entry.value)?;
        }
        map.end()
    }
}

/// Writes snapshot reports to a directory.
pub struct Exporter {
    directory: PathBuf,
    prefix: String,
}

impl Exporter {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    /// Render the report payload for a snapshot exported now.
    pub fn render(snapshot: &Snapshot) -> Result<String, ExportError> {
        let report = ExportedReport {
            exported_at_ms: Utc::now().timestamp_millis(),
            snapshot,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Serialize the snapshot, then write it to a timestamped file.
    /// Returns the path written.
    pub async fn export(&self, snapshot: &Snapshot) -> Result<PathBuf, ExportError> {
        let payload = Self::render(snapshot)?;
        let filename = format!("{}-{}.json", self.prefix, Utc::now().timestamp_millis());
        let path = self.directory.join(filename);

        tokio::fs::write(&path, payload).await?;
        info!("Exported snapshot to {}", path.display());
        Ok(path)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MetricEntry;
    use serde_json::Value;

    fn sample_snapshot() -> Snapshot {
        Snapshot::new(
            Utc::now(),
            vec![
                MetricEntry::number("DOM Element Count", 1234.0),
                MetricEntry::text("Active Modules", "4 / 7"),
                MetricEntry::unavailable("Patches", "Unavailable (Not Installed)"),
            ],
        )
    }

    #[test]
    fn test_render_uses_two_space_indentation() {
        let payload = Exporter::render(&sample_snapshot()).unwrap();
        assert!(payload.contains("\n  \"exportedAt\""));
        assert!(payload.contains("\n  \"DOM Element Count\": 1234.0"));
    }

    #[test]
    fn test_round_trip_reproduces_label_mapping() {
        let snapshot = sample_snapshot();
        let payload = Exporter::render(&snapshot).unwrap();
        let parsed: Value = serde_json::from_str(&payload).unwrap();

        // Wrapping timestamp fields aside, the mapping must match
        for entry in snapshot.entries() {
            let expected = serde_json::to_value(&entry.value).unwrap();
            assert_eq!(parsed[&entry.label], expected, "label {}", entry.label);
        }
        assert!(parsed.get("exportedAt").is_some());
        assert!(parsed.get("timestamp").is_some());
        assert_eq!(
            parsed.as_object().unwrap().len(),
            snapshot.entries().len() + 2
        );
    }

    #[tokio::test]
    async fn test_export_writes_prefixed_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path(), DEFAULT_PREFIX);

        let path = exporter.export(&sample_snapshot()).await.unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("perf-report-"));
        assert!(name.ends_with(".json"));

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["Active Modules"], "4 / 7");
    }
}
