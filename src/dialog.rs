//! Diagnostics dialog view-model and action dispatch
//!
//! The dialog itself is rendered by the host's UI layer; this module
//! produces the grouped rows it displays and handles the closed set of
//! actions the dialog can emit. No widget code lives here.

use crate::collector::SnapshotCollector;
use crate::error::ExportError;
use crate::export::Exporter;
use crate::highlight::{highlight_for, HighlightLevel};
use crate::report::{Snapshot, Timestamp};
use crate::sampler::Sampler;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// Actions the dialog surface can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Refresh,
    ToggleTracking,
    Export,
    Close,
}

/// One rendered label/value row
#[derive(Debug, Clone, PartialEq)]
pub struct DialogRow {
    pub label: String,
    pub value: String,
    pub highlight: HighlightLevel,
}

/// A titled group of rows
#[derive(Debug, Clone, PartialEq)]
pub struct DialogGroup {
    pub title: String,
    pub rows: Vec<DialogRow>,
}

/// Everything the UI layer needs to render the dialog
#[derive(Debug, Clone, PartialEq)]
pub struct DialogView {
    pub generated_at: Timestamp,
    pub is_tracking: bool,
    pub groups: Vec<DialogGroup>,
}

fn group_title(label: &str) -> &'static str {
    if label.starts_with("Hooks") {
        "Hooks"
    } else if label.starts_with("Patches") {
        "Patches"
    } else if label.starts_with("Sockets") {
        "Sockets"
    } else if label.starts_with("JS Heap") {
        "Memory"
    } else if label.starts_with("DOM") {
        "Document"
    } else if label == "Active Modules" {
        "Modules"
    } else if label.starts_with("Canvas") || label.starts_with("Active Scene") {
        "Scene"
    } else {
        "Entities"
    }
}

impl DialogView {
    /// Build the grouped view for a snapshot. Groups appear in the order
    /// their first label appears, so rendering is as deterministic as the
    /// snapshot itself.
    pub fn build(snapshot: &Snapshot, is_tracking: bool) -> Self {
        let mut groups: Vec<DialogGroup> = Vec::new();

        for entry in snapshot.entries() {
            let title = group_title(&entry.label);
            let row = DialogRow {
                label: entry.label.clone(),
                value: entry.value.display(),
                highlight: highlight_for(&entry.label, &entry.value),
            };

            match groups.iter_mut().find(|g| g.title == title) {
                Some(group) => group.rows.push(row),
                None => groups.push(DialogGroup {
                    title: title.to_string(),
                    rows: vec![row],
                }),
            }
        }

        Self {
            generated_at: snapshot.timestamp(),
            is_tracking,
            groups,
        }
    }
}

/// What an action produced, for the caller driving the dialog
#[derive(Debug, PartialEq)]
pub enum DialogOutcome {
    Rendered(DialogView),
    Exported(PathBuf),
    Closed,
}

/// One open diagnostics dialog: the current snapshot plus the components
/// its actions drive.
pub struct DialogSession {
    collector: Arc<SnapshotCollector>,
    sampler: Sampler,
    exporter: Exporter,
    snapshot: Snapshot,
}

impl DialogSession {
    /// Open the dialog with a freshly collected snapshot.
    ///
    /// While a tracking session is active, expensive probes are skipped
    /// here too, so opening or refreshing the dialog never forces a scene
    /// redraw mid-session.
    pub async fn open(
        collector: Arc<SnapshotCollector>,
        sampler: Sampler,
        exporter: Exporter,
    ) -> Self {
        let snapshot = collector.collect(sampler.is_active()).await;
        Self {
            collector,
            sampler,
            exporter,
            snapshot,
        }
    }

    pub fn view(&self) -> DialogView {
        DialogView::build(&self.snapshot, self.sampler.is_active())
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Dispatch one dialog action.
    pub async fn handle(&mut self, action: DialogAction) -> Result<DialogOutcome, ExportError> {
        match action {
            DialogAction::Refresh => {
                self.snapshot = self.collector.collect(self.sampler.is_active()).await;
                Ok(DialogOutcome::Rendered(self.view()))
            }
            DialogAction::ToggleTracking => {
                if self.sampler.is_active() {
                    self.sampler.stop().await;
                    info!(
                        "Tracking stopped from dialog, {} samples collected",
                        self.sampler.series().len()
                    );
                } else {
                    self.sampler.start();
                }
                Ok(DialogOutcome::Rendered(self.view()))
            }
            DialogAction::Export => {
                let path = self.exporter.export(&self.snapshot).await?;
                Ok(DialogOutcome::Exported(path))
            }
            DialogAction::Close => Ok(DialogOutcome::Closed),
        }
    }
}
