/// Error types for probes, export, and configuration
pub mod error;

/// Core report types: metric values and snapshots
pub mod report;

/// Read-only handles onto host data sources
pub mod host;

/// Diagnostic probes
pub mod probes;

/// Snapshot collector
pub mod collector;

/// Interval-driven snapshot sampler
pub mod sampler;

/// Highlight thresholds for rendered values
pub mod highlight;

/// Dialog view-model and action dispatch
pub mod dialog;

/// JSON report export
pub mod export;

/// Configuration management
pub mod config;

// Re-export commonly used types
pub use collector::SnapshotCollector;
pub use error::{ConfigError, ExportError, ProbeError};
pub use report::{MetricEntry, MetricValue, Snapshot};
pub use sampler::Sampler;
