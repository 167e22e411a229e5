//! Detection records and their render-ready overlay form.

use serde::Serialize;
use weedscope_feed::Detection;

use super::weed::{self, UNKNOWN_WEED, WeedStyle};
use crate::projection::{BoundingBox, ProjectedAnnotation};

/// One weed sighting in native image pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRecord {
    pub bounding_box: BoundingBox,
    /// Classifier label; empty when the backend sent none
    pub label: String,
    /// Confidence in [0, 1]
    pub confidence: f32,
}

impl DetectionRecord {
    pub fn new(bounding_box: BoundingBox, label: impl Into<String>, confidence: f32) -> Self {
        Self {
            bounding_box,
            label: label.into(),
            confidence,
        }
    }

    /// Label used for lookups, with empty labels mapped to "Unknown Weed".
    pub fn effective_label(&self) -> &str {
        if self.label.is_empty() {
            UNKNOWN_WEED
        } else {
            &self.label
        }
    }
}

impl From<&Detection> for DetectionRecord {
    fn from(det: &Detection) -> Self {
        Self {
            bounding_box: BoundingBox::new(det.bbox.x, det.bbox.y, det.bbox.width, det.bbox.height),
            label: det.weed_type.clone().unwrap_or_default(),
            confidence: det.confidence,
        }
    }
}

/// Convert a wire batch into detection records, keeping order.
pub fn records_from_batch(batch: &[Detection]) -> Vec<DetectionRecord> {
    batch.iter().map(DetectionRecord::from).collect()
}

/// Everything a renderer needs to paint one overlay box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedAnnotation {
    pub rect: ProjectedAnnotation,
    /// Name shown in the badge under the box
    pub display_name: &'static str,
    /// Whether the badge should be drawn at all
    pub show_badge: bool,
    pub tooltip: String,
    pub confidence: f32,
    pub style: &'static WeedStyle,
}

impl RenderedAnnotation {
    /// Attach label presentation to a projected rectangle.
    pub fn new(record: &DetectionRecord, rect: ProjectedAnnotation) -> Self {
        let label = record.effective_label();
        Self {
            rect,
            display_name: weed::display_name(label),
            show_badge: !record.label.is_empty(),
            tooltip: weed::tooltip(label, record.confidence),
            confidence: record.confidence,
            style: weed::style_for_label(label),
        }
    }
}
