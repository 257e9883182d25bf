//! Scene probes: redraw timing and domain entity counts.
//!
//! The redraw probe forces a full render of the active visual scene as a
//! side effect of measurement. That cost is why it is the one probe marked
//! expensive and skipped during timer-driven sampling.

use super::Probe;
use crate::error::ProbeError;
use crate::host::SceneSource;
use crate::report::MetricEntry;
use log::warn;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

pub const REDRAW_LABEL: &str = "Canvas Redraw Time (ms)";
pub const ACTORS_LABEL: &str = "Actors";
pub const ITEMS_LABEL: &str = "Items";
pub const JOURNALS_LABEL: &str = "Journals";
pub const SCENES_LABEL: &str = "Scenes";
pub const TOKENS_LABEL: &str = "Active Scene Tokens";
pub const UNIQUE_ACTORS_LABEL: &str = "Active Scene Unique Actors";

/// Times a full forced redraw of the active scene in milliseconds.
///
/// A failed redraw is reported as the value `Error Measuring` rather than a
/// probe error; the rest of the snapshot is unaffected either way.
pub struct RedrawProbe {
    scene: Arc<dyn SceneSource>,
}

impl RedrawProbe {
    pub fn new(scene: Arc<dyn SceneSource>) -> Self {
        Self { scene }
    }
}

impl Probe for RedrawProbe {
    fn name(&self) -> &str {
        "redraw"
    }

    fn labels(&self) -> Vec<String> {
        vec![REDRAW_LABEL.to_string()]
    }

    fn expensive(&self) -> bool {
        true
    }

    fn collect<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MetricEntry>, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let start = Instant::now();
            match self.scene.force_redraw().await {
                Ok(()) => {
                    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
                    Ok(vec![MetricEntry::number(REDRAW_LABEL, elapsed_ms)])
                }
                Err(err) => {
                    warn!("Forced redraw failed: {}", err);
                    Ok(vec![MetricEntry::unavailable(REDRAW_LABEL, "Error Measuring")])
                }
            }
        })
    }
}

/// Counts of domain entities plus active-scene token statistics.
pub struct EntitiesProbe {
    scene: Arc<dyn SceneSource>,
}

impl EntitiesProbe {
    pub fn new(scene: Arc<dyn SceneSource>) -> Self {
        Self { scene }
    }
}

impl Probe for EntitiesProbe {
    fn name(&self) -> &str {
        "entities"
    }

    fn labels(&self) -> Vec<String> {
        vec![
            ACTORS_LABEL.to_string(),
            ITEMS_LABEL.to_string(),
            JOURNALS_LABEL.to_string(),
            SCENES_LABEL.to_string(),
            TOKENS_LABEL.to_string(),
            UNIQUE_ACTORS_LABEL.to_string(),
        ]
    }

    fn collect<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MetricEntry>, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let counts = self.scene.entity_counts()?;
            Ok(vec![
                MetricEntry::number(ACTORS_LABEL, counts.actors as f64),
                MetricEntry::number(ITEMS_LABEL, counts.items as f64),
                MetricEntry::number(JOURNALS_LABEL, counts.journals as f64),
                MetricEntry::number(SCENES_LABEL, counts.scenes as f64),
                MetricEntry::number(TOKENS_LABEL, counts.active_scene_tokens as f64),
                MetricEntry::number(UNIQUE_ACTORS_LABEL, counts.active_scene_unique_actors as f64),
            ])
        })
    }
}
