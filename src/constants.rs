//! Global constants for the weedscope dashboard

/// Default weather location (Port-au-Prince), as (lat, lon)
pub const DEFAULT_WEATHER_LOCATION: (f64, f64) = (18.59, -72.33);

/// Default center of the distribution map (central Haiti), as (lat, lng)
pub const DEFAULT_MAP_CENTER: (f64, f64) = (18.9712, -72.2852);

/// Default zoom level of the distribution map
pub const DEFAULT_MAP_ZOOM: u8 = 13;

/// Image shown when an upload could not be processed
pub const UPLOAD_ERROR_IMAGE_URL: &str =
    "https://via.placeholder.com/800x600/FF0000/FFFFFF?text=Error+Loading+Image";

/// MIME type prefix accepted for uploads
pub const IMAGE_MIME_PREFIX: &str = "image/";
