//! Map placement and per-type counts for detections.

use serde::Serialize;
use weedscope_feed::{Detection, WeedLocation, WeedTypeCount};

use crate::model::UNKNOWN_WEED;

/// Place each detection on the map by offsetting the drone position.
pub fn locate_detections(
    drone_lat: f64,
    drone_lng: f64,
    detections: &[Detection],
) -> Vec<WeedLocation> {
    detections
        .iter()
        .map(|det| WeedLocation {
            lat: drone_lat + det.lat_offset,
            lng: drone_lng + det.lng_offset,
            weed_type: det.weed_type.clone(),
            confidence: det.confidence,
        })
        .collect()
}

fn type_or_unknown(weed_type: Option<&str>) -> &str {
    match weed_type {
        Some(t) if !t.is_empty() => t,
        _ => UNKNOWN_WEED,
    }
}

/// Count locations per weed type, in first-seen order.
pub fn summarize(locations: &[WeedLocation]) -> Vec<WeedTypeCount> {
    let mut counts: Vec<WeedTypeCount> = Vec::new();
    for loc in locations {
        let weed_type = type_or_unknown(loc.weed_type.as_deref());
        match counts
            .iter_mut()
            .find(|c| c.weed_type.as_deref() == Some(weed_type))
        {
            Some(entry) => entry.count += 1,
            None => counts.push(WeedTypeCount {
                weed_type: Some(weed_type.to_string()),
                count: 1,
            }),
        }
    }
    counts
}

/// Distinct weed types offered by the treatment selector, first-seen order.
pub fn selectable_types(summary: &[WeedTypeCount]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for entry in summary {
        let weed_type = type_or_unknown(entry.weed_type.as_deref());
        if !types.iter().any(|t| t == weed_type) {
            types.push(weed_type.to_string());
        }
    }
    types
}

/// Selection state of the treatment panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreatmentSelection {
    selected: Option<String>,
}

impl TreatmentSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Choose a weed type explicitly.
    pub fn select(&mut self, weed_type: impl Into<String>) {
        self.selected = Some(weed_type.into());
    }

    /// Default to the first summarized type if nothing is selected yet.
    pub fn sync_with(&mut self, summary: &[WeedTypeCount]) {
        if self.selected.is_some() {
            return;
        }
        if let Some(first) = summary.first() {
            self.selected = Some(type_or_unknown(first.weed_type.as_deref()).to_string());
        }
    }
}
