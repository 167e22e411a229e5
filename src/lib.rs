//! weedscope - field weed detection dashboard core
//!
//! Maps backend weed detections, given in the native pixel space of a drone
//! capture, onto the image as it is displayed, and keeps that overlay correct
//! while the image loads and the layout resizes. Around that sit the
//! dashboard state, the static weed style and treatment tables, weather
//! advice and feed polling.
//!
//! Runs natively (command-line tool) and in the browser via WASM.

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod model;
pub mod poll;
pub mod projection;
pub mod projector;
pub mod summary;
pub mod weather;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;

pub use config::AppConfig;
pub use dashboard::DashboardState;
pub use model::{DetectionRecord, RenderedAnnotation, style_for_label};
pub use projection::{BoundingBox, Dimensions, ProjectedAnnotation, project};
pub use projector::{AnnotationProjector, LoadState, LoadTicket};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
