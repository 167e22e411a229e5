//! Wire formats for the weedscope dashboard feeds.
//!
//! Covers the detection backend (`latest_image`, `weed_locations`,
//! `classified_weeds_summary`, `upload_image`) and the weather provider.
//! Fetching itself happens in the host (browser or CLI); this crate only
//! builds URLs and decodes payloads.

pub mod backend;
pub mod endpoint;
pub mod error;
pub mod weather;

pub use backend::{
    BoxDto, Detection, LatestImage, UploadRequest, UploadResponse, WeedLocation, WeedTypeCount,
    decode_detections, decode_latest_image, decode_summary, decode_upload_response,
    decode_weed_locations,
};
pub use endpoint::{DEFAULT_BACKEND_URL, Endpoint, WeatherResource};
pub use error::FeedError;
pub use weather::{CurrentWeather, Forecast, ForecastEntry};
