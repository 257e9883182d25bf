use super::Probe;
use crate::error::ProbeError;
use crate::host::DocumentSource;
use crate::report::MetricEntry;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub const DOM_LABEL: &str = "DOM Element Count";

/// Reports the structural element count of the active document tree.
pub struct DocumentProbe {
    source: Arc<dyn DocumentSource>,
}

impl DocumentProbe {
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self { source }
    }
}

impl Probe for DocumentProbe {
    fn name(&self) -> &str {
        "document"
    }

    fn labels(&self) -> Vec<String> {
        vec![DOM_LABEL.to_string()]
    }

    fn collect<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MetricEntry>, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let count = self.source.element_count()?;
            Ok(vec![MetricEntry::number(DOM_LABEL, count as f64)])
        })
    }
}
