//! Probes over the host's extension-facing registries: event hooks,
//! third-party patches, cross-process message handlers, and the module
//! list itself.
//!
//! The patching and messaging facilities are optional host add-ons; their
//! probes take an `Option` handle and report `Not Installed` when absent.

use super::Probe;
use crate::error::ProbeError;
use crate::host::{HookRegistry, MessageRegistry, ModuleRegistry, PatchRegistry};
use crate::report::MetricEntry;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub const HOOKS_LABEL: &str = "Hooks";
pub const PATCHES_LABEL: &str = "Patches";
pub const SOCKETS_LABEL: &str = "Sockets";
pub const MODULES_LABEL: &str = "Active Modules";

fn grouped_entries(base: &str, counts: Vec<(String, u64)>) -> Vec<MetricEntry> {
    counts
        .into_iter()
        .map(|(extension, count)| {
            MetricEntry::number(format!("{}: {}", base, extension), count as f64)
        })
        .collect()
}

/// Event-hook callback counts, one entry per owning extension.
pub struct HooksProbe {
    registry: Arc<dyn HookRegistry>,
}

impl HooksProbe {
    pub fn new(registry: Arc<dyn HookRegistry>) -> Self {
        Self { registry }
    }
}

impl Probe for HooksProbe {
    fn name(&self) -> &str {
        "hooks"
    }

    fn labels(&self) -> Vec<String> {
        vec![HOOKS_LABEL.to_string()]
    }

    fn collect<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MetricEntry>, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let counts = self.registry.callbacks_per_extension()?;
            Ok(grouped_entries(HOOKS_LABEL, counts))
        })
    }
}

/// Patch registration counts per extension; the facility is optional.
pub struct PatchesProbe {
    registry: Option<Arc<dyn PatchRegistry>>,
}

impl PatchesProbe {
    pub fn new(registry: Option<Arc<dyn PatchRegistry>>) -> Self {
        Self { registry }
    }
}

impl Probe for PatchesProbe {
    fn name(&self) -> &str {
        "patches"
    }

    fn labels(&self) -> Vec<String> {
        vec![PATCHES_LABEL.to_string()]
    }

    fn collect<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MetricEntry>, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let registry = self.registry.as_ref().ok_or_else(|| ProbeError::Unavailable {
                reason: "Not Installed".to_string(),
            })?;
            let counts = registry.patches_per_extension()?;
            Ok(grouped_entries(PATCHES_LABEL, counts))
        })
    }
}

/// Cross-process message handler counts per extension; optional facility.
pub struct MessagesProbe {
    registry: Option<Arc<dyn MessageRegistry>>,
}

impl MessagesProbe {
    pub fn new(registry: Option<Arc<dyn MessageRegistry>>) -> Self {
        Self { registry }
    }
}

impl Probe for MessagesProbe {
    fn name(&self) -> &str {
        "messages"
    }

    fn labels(&self) -> Vec<String> {
        vec![SOCKETS_LABEL.to_string()]
    }

    fn collect<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MetricEntry>, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let registry = self.registry.as_ref().ok_or_else(|| ProbeError::Unavailable {
                reason: "Not Installed".to_string(),
            })?;
            let counts = registry.handlers_per_extension()?;
            Ok(grouped_entries(SOCKETS_LABEL, counts))
        })
    }
}

/// Active vs installed module units, formatted `"<active> / <total>"`.
pub struct ModulesProbe {
    registry: Arc<dyn ModuleRegistry>,
}

impl ModulesProbe {
    pub fn new(registry: Arc<dyn ModuleRegistry>) -> Self {
        Self { registry }
    }
}

impl Probe for ModulesProbe {
    fn name(&self) -> &str {
        "modules"
    }

    fn labels(&self) -> Vec<String> {
        vec![MODULES_LABEL.to_string()]
    }

    fn collect<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MetricEntry>, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let counts = self.registry.module_counts()?;
            Ok(vec![MetricEntry::text(
                MODULES_LABEL,
                format!("{} / {}", counts.active, counts.total),
            )])
        })
    }
}
