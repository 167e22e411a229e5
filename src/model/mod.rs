//! Data models for the weedscope dashboard.

mod detection;
pub mod treatment;
pub mod weed;

pub use detection::{DetectionRecord, RenderedAnnotation, records_from_batch};
pub use treatment::{Recommendation, recommendation_for};
pub use weed::{UNKNOWN_WEED, WeedStyle, display_name, style_for_label, tooltip};
