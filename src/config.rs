//! Configuration file support for weedscope.
//!
//! Settings are stored as versioned JSON: in the user config directory on
//! native builds and in localStorage in the browser.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use weedscope_feed::endpoint::{is_usable_api_key, weather_url};
use weedscope_feed::{DEFAULT_BACKEND_URL, Endpoint, FeedError, WeatherResource};

use crate::constants::{DEFAULT_MAP_CENTER, DEFAULT_MAP_ZOOM, DEFAULT_WEATHER_LOCATION};
use crate::poll::PollTimer;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(not(target_arch = "wasm32"), derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Detection backend settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Weather widget settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Distribution map settings
    #[serde(default)]
    pub map: MapConfig,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Detection backend section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// API root, e.g. `http://localhost:5000/api`
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Seconds between dashboard refreshes
    #[serde(default = "default_dashboard_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_dashboard_refresh_secs() -> u64 {
    PollTimer::DASHBOARD_INTERVAL.as_secs()
}

impl BackendConfig {
    /// Full URL of a backend endpoint.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        endpoint.url(&self.url)
    }

    /// URLs fetched by one dashboard refresh, in fetch order.
    pub fn polled_urls(&self) -> Vec<String> {
        Endpoint::polled()
            .iter()
            .map(|e| self.endpoint_url(*e))
            .collect()
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            refresh_secs: default_dashboard_refresh_secs(),
        }
    }
}

/// Weather widget section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_lat")]
    pub latitude: f64,
    #[serde(default = "default_weather_lon")]
    pub longitude: f64,

    /// OpenWeatherMap API key; the widget shows a configuration message without one
    #[serde(default)]
    pub api_key: Option<String>,

    /// Seconds between weather refreshes
    #[serde(default = "default_weather_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_weather_lat() -> f64 {
    DEFAULT_WEATHER_LOCATION.0
}

fn default_weather_lon() -> f64 {
    DEFAULT_WEATHER_LOCATION.1
}

fn default_weather_refresh_secs() -> u64 {
    PollTimer::WEATHER_INTERVAL.as_secs()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            latitude: default_weather_lat(),
            longitude: default_weather_lon(),
            api_key: None,
            refresh_secs: default_weather_refresh_secs(),
        }
    }
}

impl WeatherConfig {
    /// The API key, if it is set and not the sample placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        let key = self.api_key.as_deref();
        if is_usable_api_key(key) { key } else { None }
    }

    /// Request URL for a weather resource at the configured location.
    pub fn request_url(&self, resource: WeatherResource) -> Result<String, FeedError> {
        let key = self.usable_api_key().ok_or(FeedError::MissingApiKey)?;
        Ok(weather_url(resource, self.latitude, self.longitude, key))
    }
}

/// Distribution map section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_map_center")]
    pub center: (f64, f64),
    #[serde(default = "default_map_zoom")]
    pub zoom: u8,
}

fn default_map_center() -> (f64, f64) {
    DEFAULT_MAP_CENTER
}

fn default_map_zoom() -> u8 {
    DEFAULT_MAP_ZOOM
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: default_map_center(),
            zoom: default_map_zoom(),
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            backend: BackendConfig::default(),
            weather: WeatherConfig::default(),
            map: MapConfig::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Timer for the backend refresh loop.
    pub fn dashboard_timer(&self) -> PollTimer {
        PollTimer::new("dashboard", Duration::from_secs(self.backend.refresh_secs))
    }

    /// Timer for the weather refresh loop.
    pub fn weather_timer(&self) -> PollTimer {
        PollTimer::new("weather", Duration::from_secs(self.weather.refresh_secs))
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }
        if config.backend.refresh_secs == 0 || config.weather.refresh_secs == 0 {
            return Err(ConfigError::Invalid(
                "refresh intervals must be at least one second".to_string(),
            ));
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "weedscope-config.json"
    }

    /// Get the default config file path for auto-load/save.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("weedscope").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("weedscope")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a specific file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration from a file that may not exist yet.
    ///
    /// A missing file is `Ok(None)`; a file that exists but cannot be read
    /// or parsed is an error.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_if_exists(path: &std::path::Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return Ok(None);
        }
        Self::load_from_path(path).map(Some)
    }

    /// Save configuration to a specific file, creating parent directories.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// LocalStorage key for WASM config persistence.
    #[cfg(target_arch = "wasm32")]
    const LOCALSTORAGE_KEY: &'static str = "weedscope-config";

    /// Try to load configuration from localStorage (WASM only).
    /// Returns None if not found or can't be parsed.
    #[cfg(target_arch = "wasm32")]
    pub fn load_from_local_storage() -> Option<Self> {
        let window = web_sys::window()?;
        let storage = window.local_storage().ok()??;

        match storage.get_item(Self::LOCALSTORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from localStorage");
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config from localStorage: {}", e);
                    None
                }
            },
            Ok(None) => {
                log::debug!("No config found in localStorage");
                None
            }
            Err(e) => {
                log::warn!("Failed to read from localStorage: {:?}", e);
                None
            }
        }
    }

    /// Save configuration to localStorage (WASM only).
    #[cfg(target_arch = "wasm32")]
    pub fn save_to_local_storage(&self) -> Result<(), ConfigError> {
        let window = web_sys::window()
            .ok_or_else(|| ConfigError::StorageError("No window object available".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(|e| ConfigError::StorageError(format!("localStorage access error: {:?}", e)))?
            .ok_or_else(|| ConfigError::StorageError("localStorage not available".to_string()))?;

        let json = self.to_json()?;

        storage
            .set_item(Self::LOCALSTORAGE_KEY, &json)
            .map_err(|e| {
                ConfigError::StorageError(format!("Failed to save to localStorage: {:?}", e))
            })?;

        log::info!("Saved configuration to localStorage");
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// Values that parse but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Storage error (localStorage in WASM)
    #[error("Storage error: {0}")]
    StorageError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trip() {
        let config = AppConfig::new();
        let json = config.to_json().unwrap();
        assert_eq!(AppConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.backend.url, "http://localhost:5000/api");
        assert_eq!(config.backend.refresh_secs, 300);
        assert_eq!(config.weather.refresh_secs, 1800);
        assert_eq!(config.weather.latitude, 18.59);
        assert_eq!(config.map.zoom, 13);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config =
            AppConfig::from_json(r#"{"version": 1, "backend": {"url": "http://farm:8000/api"}}"#)
                .unwrap();
        assert_eq!(config.backend.url, "http://farm:8000/api");
        assert_eq!(config.backend.refresh_secs, 300);
        assert_eq!(config.weather, WeatherConfig::default());
    }

    #[test]
    fn test_version_too_new() {
        let err = AppConfig::from_json(r#"{"version": 99}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::VersionTooNew {
                file_version: 99,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let err = AppConfig::from_json(r#"{"version": 1, "weather": {"refresh_secs": 0}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_usable_api_key() {
        let mut weather = WeatherConfig::default();
        assert_eq!(weather.usable_api_key(), None);
        weather.api_key = Some("YOUR_OPENWEATHERMAP_API_KEY".into());
        assert_eq!(weather.usable_api_key(), None);
        weather.api_key = Some("abc".into());
        assert_eq!(weather.usable_api_key(), Some("abc"));
    }

    #[test]
    fn test_weather_url_requires_key() {
        let mut weather = WeatherConfig::default();
        assert!(matches!(
            weather.request_url(WeatherResource::Current),
            Err(FeedError::MissingApiKey)
        ));

        weather.api_key = Some("k123".into());
        let url = weather.request_url(WeatherResource::Forecast).unwrap();
        assert!(url.contains("/forecast?lat=18.59&lon=-72.33&appid=k123"));
        assert!(url.ends_with("units=metric"));
    }

    #[test]
    fn test_polled_urls() {
        let mut backend = BackendConfig::default();
        backend.url = "http://farm:8000/api/".into();
        assert_eq!(
            backend.polled_urls(),
            vec![
                "http://farm:8000/api/latest_image",
                "http://farm:8000/api/weed_locations",
                "http://farm:8000/api/classified_weeds_summary",
            ]
        );
        assert_eq!(
            backend.endpoint_url(Endpoint::UploadImage),
            "http://farm:8000/api/upload_image"
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_if_exists() {
        let dir = std::env::temp_dir().join("weedscope-config-test");
        std::fs::create_dir_all(&dir).unwrap();

        let missing = dir.join("missing.json");
        let _ = std::fs::remove_file(&missing);
        assert_eq!(AppConfig::load_if_exists(&missing).unwrap(), None);

        let rejected = dir.join("rejected.json");
        std::fs::write(
            &rejected,
            r#"{"version": 1, "backend": {"url": "http://farm:9000/api", "refresh_secs": 0}}"#,
        )
        .unwrap();
        assert!(matches!(
            AppConfig::load_if_exists(&rejected),
            Err(ConfigError::Invalid(_))
        ));

        let valid = dir.join("valid.json");
        AppConfig::new().save_to_path(&valid).unwrap();
        assert_eq!(
            AppConfig::load_if_exists(&valid).unwrap(),
            Some(AppConfig::new())
        );
    }

    #[test]
    fn test_log_level_lowercase() {
        let config = AppConfig::from_json(r#"{"version": 1, "log_level": "debug"}"#).unwrap();
        assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_timers_follow_config() {
        let mut config = AppConfig::new();
        config.backend.refresh_secs = 10;
        assert_eq!(config.dashboard_timer().interval(), Duration::from_secs(10));
        assert_eq!(config.weather_timer().name(), "weather");
    }
}
