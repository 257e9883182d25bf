//! Value-dependent highlight thresholds for the dialog surface.

use crate::report::MetricValue;

/// Highlight applied to a rendered row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightLevel {
    None,
    Orange,
    Red,
}

/// Orange/red cutoffs for the labels that carry them. Values must exceed
/// the cutoff strictly to highlight.
fn thresholds(label: &str) -> Option<(f64, f64)> {
    match label {
        "DOM Element Count" => Some((10_000.0, 20_000.0)),
        "Canvas Redraw Time (ms)" => Some((100.0, 200.0)),
        "Active Scene Tokens" => Some((100.0, 200.0)),
        "Actors" => Some((2_000.0, 4_000.0)),
        _ => None,
    }
}

/// Highlight level for one label/value pair. Non-numeric values and labels
/// without thresholds never highlight.
pub fn highlight_for(label: &str, value: &MetricValue) -> HighlightLevel {
    let Some(number) = value.as_number() else {
        return HighlightLevel::None;
    };
    let Some((orange, red)) = thresholds(label) else {
        return HighlightLevel::None;
    };

    if number > red {
        HighlightLevel::Red
    } else if number > orange {
        HighlightLevel::Orange
    } else {
        HighlightLevel::None
    }
}
