use super::Probe;
use crate::error::ProbeError;
use crate::host::MemorySource;
use crate::report::MetricEntry;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub const HEAP_LABEL: &str = "JS Heap (used / total)";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Reports process heap usage as `"<used> MB / <total> MB"` with
/// two-decimal precision.
pub struct MemoryProbe {
    source: Arc<dyn MemorySource>,
}

impl MemoryProbe {
    pub fn new(source: Arc<dyn MemorySource>) -> Self {
        Self { source }
    }
}

impl Probe for MemoryProbe {
    fn name(&self) -> &str {
        "memory"
    }

    fn labels(&self) -> Vec<String> {
        vec![HEAP_LABEL.to_string()]
    }

    fn collect<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MetricEntry>, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let stats = self.source.heap_stats()?;
            let used_mb = stats.used_bytes as f64 / BYTES_PER_MB;
            let total_mb = stats.total_bytes as f64 / BYTES_PER_MB;
            Ok(vec![MetricEntry::text(
                HEAP_LABEL,
                format!("{:.2} MB / {:.2} MB", used_mb, total_mb),
            )])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryStats, MockMemorySource};
    use crate::report::MetricValue;

    #[tokio::test]
    async fn test_memory_probe_formats_two_decimals() {
        let mut mock = MockMemorySource::new();
        mock.expect_heap_stats().returning(|| {
            Ok(MemoryStats {
                used_bytes: 512 * 1024 * 1024,
                total_bytes: 2048 * 1024 * 1024,
            })
        });

        let probe = MemoryProbe::new(Arc::new(mock));
        let entries = probe.collect().await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, HEAP_LABEL);
        assert_eq!(
            entries[0].value,
            MetricValue::Text("512.00 MB / 2048.00 MB".to_string())
        );
    }

    #[tokio::test]
    async fn test_memory_probe_propagates_restriction() {
        let mut mock = MockMemorySource::new();
        mock.expect_heap_stats().returning(|| {
            Err(ProbeError::Unavailable {
                reason: "Browser Restricted".to_string(),
            })
        });

        let probe = MemoryProbe::new(Arc::new(mock));
        let err = probe.collect().await.unwrap_err();
        assert_eq!(err.marker(), "Unavailable (Browser Restricted)");
    }
}
