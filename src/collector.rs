//! Snapshot collection
//!
//! Runs every registered probe in registration order and merges their
//! readings into one immutable, timestamped [`Snapshot`]. Probe failures
//! are isolated: a failing probe contributes unavailable markers for its
//! declared labels and the rest of the collection proceeds.

use crate::host::{
    DocumentSource, HookRegistry, MemorySource, MessageRegistry, ModuleRegistry, PatchRegistry,
    SceneSource,
};
use crate::probes::{
    DocumentProbe, EntitiesProbe, HooksProbe, MemoryProbe, MessagesProbe, ModulesProbe,
    PatchesProbe, Probe, RedrawProbe,
};
use crate::report::{MetricEntry, Snapshot};
use chrono::Utc;
use log::{debug, warn};
use std::sync::Arc;

/// Marker substituted for expensive probes skipped during sampling
pub const SKIPPED_MARKER: &str = "Skipped (Tracking Active)";

/// Produces snapshots by running all registered probes sequentially.
///
/// Probes run on the caller's task, one at a time; each completes
/// (including any asynchronous redraw wait) before the next begins, so the
/// shared scene is never measured while being mutated by a sibling probe.
pub struct SnapshotCollector {
    probes: Vec<Box<dyn Probe>>,
}

impl SnapshotCollector {
    pub fn new() -> Self {
        Self { probes: Vec::new() }
    }

    /// Append a probe; snapshots list its labels after all earlier probes'.
    pub fn register(&mut self, probe: Box<dyn Probe>) -> &mut Self {
        self.probes.push(probe);
        self
    }

    /// The standard probe set over a full set of host handles.
    ///
    /// The patching and messaging facilities are optional host add-ons and
    /// may be absent.
    #[allow(clippy::too_many_arguments)]
    pub fn standard(
        memory: Arc<dyn MemorySource>,
        document: Arc<dyn DocumentSource>,
        hooks: Arc<dyn HookRegistry>,
        patches: Option<Arc<dyn PatchRegistry>>,
        messages: Option<Arc<dyn MessageRegistry>>,
        modules: Arc<dyn ModuleRegistry>,
        scene: Arc<dyn SceneSource>,
    ) -> Self {
        let mut collector = Self::new();
        collector
            .register(Box::new(MemoryProbe::new(memory)))
            .register(Box::new(DocumentProbe::new(document)))
            .register(Box::new(HooksProbe::new(hooks)))
            .register(Box::new(PatchesProbe::new(patches)))
            .register(Box::new(MessagesProbe::new(messages)))
            .register(Box::new(ModulesProbe::new(modules)))
            .register(Box::new(RedrawProbe::new(Arc::clone(&scene))))
            .register(Box::new(EntitiesProbe::new(scene)));
        collector
    }

    /// Collect one snapshot.
    ///
    /// With `skip_expensive` set, probes flagged expensive are not run and
    /// their labels carry the [`SKIPPED_MARKER`] value instead, so the label
    /// set stays identical to a full collection.
    pub async fn collect(&self, skip_expensive: bool) -> Snapshot {
        debug!(
            "Collecting snapshot from {} probes (skip_expensive={})",
            self.probes.len(),
            skip_expensive
        );

        let mut entries = Vec::new();
        for probe in &self.probes {
            if skip_expensive && probe.expensive() {
                debug!("Skipping expensive probe: {}", probe.name());
                for label in probe.labels() {
                    entries.push(MetricEntry::unavailable(label, SKIPPED_MARKER));
                }
                continue;
            }

            match probe.collect().await {
                Ok(mut probe_entries) => entries.append(&mut probe_entries),
                Err(err) => {
                    warn!("Probe '{}' failed: {}", probe.name(), err);
                    let marker = err.marker();
                    for label in probe.labels() {
                        entries.push(MetricEntry::unavailable(label, marker.clone()));
                    }
                }
            }
        }

        Snapshot::new(Utc::now(), entries)
    }
}

impl Default for SnapshotCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::report::MetricValue;
    use std::future::Future;
    use std::pin::Pin;

    struct StaticProbe {
        name: &'static str,
        entries: Vec<MetricEntry>,
        expensive: bool,
    }

    impl Probe for StaticProbe {
        fn name(&self) -> &str {
            self.name
        }

        fn labels(&self) -> Vec<String> {
            self.entries.iter().map(|e| e.label.clone()).collect()
        }

        fn expensive(&self) -> bool {
            self.expensive
        }

        fn collect<'a>(
            &'a self,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<MetricEntry>, ProbeError>> + Send + 'a>>
        {
            let entries = self.entries.clone();
            Box::pin(async move { Ok(entries) })
        }
    }

    struct FaultyProbe;

    impl Probe for FaultyProbe {
        fn name(&self) -> &str {
            "faulty"
        }

        fn labels(&self) -> Vec<String> {
            vec!["Broken".to_string()]
        }

        fn collect<'a>(
            &'a self,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<MetricEntry>, ProbeError>> + Send + 'a>>
        {
            Box::pin(async { Err(ProbeError::Fault("registry shape changed".to_string())) })
        }
    }

    fn static_probe(name: &'static str, label: &str, value: f64) -> Box<StaticProbe> {
        Box::new(StaticProbe {
            name,
            entries: vec![MetricEntry::number(label, value)],
            expensive: false,
        })
    }

    #[tokio::test]
    async fn test_label_set_complete_under_partial_failure() {
        let mut collector = SnapshotCollector::new();
        collector
            .register(static_probe("a", "Alpha", 1.0))
            .register(Box::new(FaultyProbe))
            .register(static_probe("b", "Beta", 2.0));

        let snapshot = collector.collect(false).await;

        assert_eq!(
            snapshot.labels().collect::<Vec<_>>(),
            vec!["Alpha", "Broken", "Beta"]
        );
        assert_eq!(snapshot.get("Alpha"), Some(&MetricValue::Number(1.0)));
        assert_eq!(
            snapshot.get("Broken"),
            Some(&MetricValue::Unavailable("Unavailable".to_string()))
        );
        assert_eq!(snapshot.get("Beta"), Some(&MetricValue::Number(2.0)));
    }

    #[tokio::test]
    async fn test_all_probes_failing_still_produces_snapshot() {
        let mut collector = SnapshotCollector::new();
        collector
            .register(Box::new(FaultyProbe))
            .register(Box::new(FaultyProbe));

        let snapshot = collector.collect(false).await;
        assert_eq!(snapshot.entries().len(), 2);
        assert!(snapshot
            .entries()
            .iter()
            .all(|e| matches!(e.value, MetricValue::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_ordering_is_deterministic_across_calls() {
        let mut collector = SnapshotCollector::new();
        collector
            .register(static_probe("z", "Zeta", 1.0))
            .register(static_probe("a", "Alpha", 2.0));

        let first = collector.collect(false).await;
        let second = collector.collect(false).await;
        assert_eq!(
            first.labels().collect::<Vec<_>>(),
            second.labels().collect::<Vec<_>>()
        );
        assert_eq!(first.labels().next(), Some("Zeta"));
    }

    #[tokio::test]
    async fn test_skip_expensive_substitutes_marker() {
        let mut collector = SnapshotCollector::new();
        collector
            .register(static_probe("cheap", "Cheap", 1.0))
            .register(Box::new(StaticProbe {
                name: "costly",
                entries: vec![MetricEntry::number("Costly", 9.0)],
                expensive: true,
            }));

        let sampled = collector.collect(true).await;
        assert_eq!(
            sampled.get("Costly"),
            Some(&MetricValue::Unavailable(SKIPPED_MARKER.to_string()))
        );

        let full = collector.collect(false).await;
        assert_eq!(full.get("Costly"), Some(&MetricValue::Number(9.0)));
        assert_eq!(
            sampled.labels().collect::<Vec<_>>(),
            full.labels().collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_restricted_memory_scenario() {
        use crate::host::{EntityCounts, MockDocumentSource, MockHookRegistry,
            MockMemorySource, MockModuleRegistry, ModuleCounts, SceneSource};
        use std::sync::Arc;

        struct QuietScene;

        impl SceneSource for QuietScene {
            fn entity_counts(&self) -> Result<EntityCounts, ProbeError> {
                Ok(EntityCounts {
                    actors: 3,
                    ..EntityCounts::default()
                })
            }

            fn force_redraw<'a>(
                &'a self,
            ) -> Pin<Box<dyn Future<Output = Result<(), ProbeError>> + Send + 'a>> {
                Box::pin(async { Ok(()) })
            }
        }

        let mut memory = MockMemorySource::new();
        memory.expect_heap_stats().returning(|| {
            Err(ProbeError::Unavailable {
                reason: "Browser Restricted".to_string(),
            })
        });
        let mut document = MockDocumentSource::new();
        document.expect_element_count().returning(|| Ok(800));
        let mut hooks = MockHookRegistry::new();
        hooks
            .expect_callbacks_per_extension()
            .returning(|| Ok(vec![("core".to_string(), 5)]));
        let mut modules = MockModuleRegistry::new();
        modules
            .expect_module_counts()
            .returning(|| Ok(ModuleCounts { active: 1, total: 2 }));

        let collector = SnapshotCollector::standard(
            Arc::new(memory),
            Arc::new(document),
            Arc::new(hooks),
            None,
            None,
            Arc::new(modules),
            Arc::new(QuietScene),
        );

        let snapshot = collector.collect(false).await;

        assert_eq!(
            snapshot.get("JS Heap (used / total)"),
            Some(&MetricValue::Unavailable(
                "Unavailable (Browser Restricted)".to_string()
            ))
        );
        assert_eq!(snapshot.get("DOM Element Count"), Some(&MetricValue::Number(800.0)));
        assert_eq!(snapshot.get("Hooks: core"), Some(&MetricValue::Number(5.0)));
        assert_eq!(
            snapshot.get("Active Modules"),
            Some(&MetricValue::Text("1 / 2".to_string()))
        );
        assert_eq!(snapshot.get("Actors"), Some(&MetricValue::Number(3.0)));
        assert!(snapshot.get("Canvas Redraw Time (ms)").is_some());
    }
}
