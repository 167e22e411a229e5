//! URL construction for the backend and the weather provider.

/// Default backend API root.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/api";

/// Weather provider API root.
pub const WEATHER_API_ROOT: &str = "https://api.openweathermap.org/data/2.5";

/// Placeholder value shipped in sample configs instead of a real key.
pub const WEATHER_KEY_PLACEHOLDER: &str = "YOUR_OPENWEATHERMAP_API_KEY";

/// Backend REST endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Most recent drone capture with detections
    LatestImage,
    /// Aggregated weed positions for the map
    WeedLocations,
    /// Weed counts per type
    ClassifiedSummary,
    /// User image upload (POST)
    UploadImage,
}

impl Endpoint {
    /// Path of this endpoint relative to the API root.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::LatestImage => "latest_image",
            Endpoint::WeedLocations => "weed_locations",
            Endpoint::ClassifiedSummary => "classified_weeds_summary",
            Endpoint::UploadImage => "upload_image",
        }
    }

    /// All endpoints polled by the dashboard refresh, in fetch order.
    pub fn polled() -> &'static [Endpoint] {
        &[
            Endpoint::LatestImage,
            Endpoint::WeedLocations,
            Endpoint::ClassifiedSummary,
        ]
    }

    /// Full URL under `base`, tolerating a trailing slash on the base.
    pub fn url(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.path())
    }
}

/// Which weather resource to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherResource {
    Current,
    Forecast,
}

impl WeatherResource {
    fn path(&self) -> &'static str {
        match self {
            WeatherResource::Current => "weather",
            WeatherResource::Forecast => "forecast",
        }
    }
}

/// Check that a weather API key is usable.
pub fn is_usable_api_key(key: Option<&str>) -> bool {
    matches!(key, Some(k) if !k.trim().is_empty() && k != WEATHER_KEY_PLACEHOLDER)
}

/// Build a metric-units weather request URL.
pub fn weather_url(resource: WeatherResource, lat: f64, lon: f64, api_key: &str) -> String {
    format!(
        "{}/{}?lat={}&lon={}&appid={}&units=metric",
        WEATHER_API_ROOT,
        resource.path(),
        lat,
        lon,
        api_key
    )
}

/// Icon image URL for a condition icon code.
pub fn weather_icon_url(icon_code: &str) -> String {
    format!("http://openweathermap.org/img/wn/{}@2x.png", icon_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        assert_eq!(
            Endpoint::LatestImage.url(DEFAULT_BACKEND_URL),
            "http://localhost:5000/api/latest_image"
        );
        assert_eq!(
            Endpoint::ClassifiedSummary.url("http://farm.local/api/"),
            "http://farm.local/api/classified_weeds_summary"
        );
    }

    #[test]
    fn test_weather_url() {
        let url = weather_url(WeatherResource::Forecast, 18.59, -72.33, "k");
        assert_eq!(
            url,
            "https://api.openweathermap.org/data/2.5/forecast?lat=18.59&lon=-72.33&appid=k&units=metric"
        );
    }

    #[test]
    fn test_api_key_usability() {
        assert!(!is_usable_api_key(None));
        assert!(!is_usable_api_key(Some("")));
        assert!(!is_usable_api_key(Some(WEATHER_KEY_PLACEHOLDER)));
        assert!(is_usable_api_key(Some("abc123")));
    }

    #[test]
    fn test_icon_url() {
        assert_eq!(
            weather_icon_url("10d"),
            "http://openweathermap.org/img/wn/10d@2x.png"
        );
    }
}
