//! Farming advice derived from weather readings.

use serde::Serialize;
use weedscope_feed::{CurrentWeather, Forecast, ForecastEntry};

/// Rain over the last hour (mm) above which spraying is discouraged.
pub const RAIN_THRESHOLD_MM: f32 = 0.5;

/// Temperature (°C) above which field work should move to cooler hours.
pub const HOT_THRESHOLD_C: f32 = 30.0;

/// Temperature (°C) below which crop tolerance should be checked.
pub const COLD_THRESHOLD_C: f32 = 10.0;

/// Forecast entries are 3-hourly, so every 8th one is a new day.
pub const ENTRIES_PER_DAY: usize = 8;

/// Advice shown under the current conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FarmingTip {
    RainExpected,
    Hot,
    Cold,
    Favorable,
}

impl FarmingTip {
    /// Pick the tip for a temperature and last-hour rainfall. Rain wins over heat.
    pub fn for_conditions(temp_c: f32, rain_mm_1h: f32) -> Self {
        if rain_mm_1h > RAIN_THRESHOLD_MM {
            FarmingTip::RainExpected
        } else if temp_c > HOT_THRESHOLD_C {
            FarmingTip::Hot
        } else if temp_c < COLD_THRESHOLD_C {
            FarmingTip::Cold
        } else {
            FarmingTip::Favorable
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FarmingTip::RainExpected => "Rain expected: Avoid spraying today.",
            FarmingTip::Hot => "Very hot: Consider early morning/late evening activities.",
            FarmingTip::Cold => "Cold: Check crop tolerance.",
            FarmingTip::Favorable => "Favorable conditions for field work.",
        }
    }
}

/// Tip for the current conditions.
pub fn tip_for(current: &CurrentWeather) -> FarmingTip {
    FarmingTip::for_conditions(current.main.temp, current.rain_last_hour())
}

/// One entry per day from the 3-hourly forecast.
pub fn daily_forecast(forecast: &Forecast) -> Vec<&ForecastEntry> {
    forecast.list.iter().step_by(ENTRIES_PER_DAY).collect()
}

/// Rain probability as a whole percentage, when reported and non-zero.
pub fn rain_probability_percent(entry: &ForecastEntry) -> Option<u32> {
    entry
        .pop
        .filter(|p| *p > 0.0)
        .map(|p| (p * 100.0).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weedscope_feed::weather::{Condition, MainReadings};

    fn entry(dt: i64, pop: Option<f32>) -> ForecastEntry {
        ForecastEntry {
            dt,
            main: MainReadings {
                temp: 25.0,
                humidity: 60.0,
            },
            weather: vec![Condition {
                description: "clouds".into(),
                icon: "03d".into(),
            }],
            pop,
        }
    }

    #[test]
    fn test_tip_priority() {
        assert_eq!(FarmingTip::for_conditions(35.0, 1.0), FarmingTip::RainExpected);
        assert_eq!(FarmingTip::for_conditions(35.0, 0.5), FarmingTip::Hot);
        assert_eq!(FarmingTip::for_conditions(5.0, 0.0), FarmingTip::Cold);
        assert_eq!(FarmingTip::for_conditions(30.0, 0.0), FarmingTip::Favorable);
        assert_eq!(FarmingTip::for_conditions(10.0, 0.0), FarmingTip::Favorable);
    }

    #[test]
    fn test_tip_messages() {
        assert_eq!(
            FarmingTip::RainExpected.message(),
            "Rain expected: Avoid spraying today."
        );
        assert_eq!(
            FarmingTip::Favorable.message(),
            "Favorable conditions for field work."
        );
    }

    #[test]
    fn test_daily_forecast_takes_every_eighth() {
        let forecast = Forecast {
            list: (0..40).map(|i| entry(i * 10_800, None)).collect(),
        };
        let daily = daily_forecast(&forecast);
        assert_eq!(daily.len(), 5);
        assert_eq!(daily[1].dt, 8 * 10_800);
        assert_eq!(daily[4].dt, 32 * 10_800);
    }

    #[test]
    fn test_rain_probability() {
        assert_eq!(rain_probability_percent(&entry(0, Some(0.256))), Some(26));
        assert_eq!(rain_probability_percent(&entry(0, Some(0.0))), None);
        assert_eq!(rain_probability_percent(&entry(0, None)), None);
    }
}
