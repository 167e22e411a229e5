//! Subset of the OpenWeatherMap current/forecast responses used by the dashboard.

use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// Weather condition summary (`weather[0]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

/// Main measurements block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    /// Temperature in degrees Celsius (metric units)
    pub temp: f32,
    #[serde(default)]
    pub humidity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wind {
    /// Wind speed in m/s
    #[serde(default)]
    pub speed: f32,
}

/// Rain volume block; the key is optional upstream.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rain {
    #[serde(rename = "1h", default)]
    pub last_hour: Option<f32>,
}

/// Payload of `/data/2.5/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Location name reported by the provider
    #[serde(default)]
    pub name: String,
    pub weather: Vec<Condition>,
    pub main: MainReadings,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub rain: Option<Rain>,
}

impl CurrentWeather {
    /// First reported condition, if any.
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }

    /// Rain over the last hour in mm, zero when not reported.
    pub fn rain_last_hour(&self) -> f32 {
        self.rain.and_then(|r| r.last_hour).unwrap_or(0.0)
    }
}

/// One 3-hourly entry of `/data/2.5/forecast`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Unix timestamp (seconds)
    pub dt: i64,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    /// Probability of precipitation in [0, 1]
    #[serde(default)]
    pub pop: Option<f32>,
}

/// Payload of `/data/2.5/forecast`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub list: Vec<ForecastEntry>,
}

/// Decode a current-weather response.
pub fn decode_current(json: &str) -> Result<CurrentWeather, FeedError> {
    Ok(serde_json::from_str(json)?)
}

/// Decode a forecast response.
pub fn decode_forecast(json: &str) -> Result<Forecast, FeedError> {
    Ok(serde_json::from_str(json)?)
}
