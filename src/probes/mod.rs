//! Diagnostic probes
//!
//! Each probe is an independently-failable reading of one host facility.
//! Probes never fault the caller: anything unexpected is reported as a
//! [`ProbeError`] and substituted by the collector.

use crate::error::ProbeError;
use crate::report::MetricEntry;
use std::future::Future;
use std::pin::Pin;

/// Memory heap probe
pub mod memory;

/// Document tree structure probe
pub mod document;

/// Hook/patch/message/module registry probes
pub mod registries;

/// Scene redraw timing and entity count probes
pub mod scene;

pub use document::DocumentProbe;
pub use memory::MemoryProbe;
pub use registries::{HooksProbe, MessagesProbe, ModulesProbe, PatchesProbe};
pub use scene::{EntitiesProbe, RedrawProbe};

/// A single named diagnostic reading function
pub trait Probe: Send + Sync {
    /// Diagnostic name, used for logging only
    fn name(&self) -> &str;

    /// Labels this probe is responsible for when its collection fails,
    /// so snapshots stay complete under partial failure
    fn labels(&self) -> Vec<String>;

    /// Whether the probe performs a costly or host-visible side effect
    /// and should be skipped by timer-driven sampling
    fn expensive(&self) -> bool {
        false
    }

    /// Take the reading(s). Runs to completion before the next probe starts.
    fn collect<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MetricEntry>, ProbeError>> + Send + 'a>>;
}
