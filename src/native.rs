//! Command-line front end for native builds.
//!
//! Reads backend payloads from files and prints the derived overlay,
//! summary or advice as JSON.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use weedscope_feed::endpoint::weather_icon_url;
use weedscope_feed::weather::{decode_current, decode_forecast};
use weedscope_feed::{
    Endpoint, FeedError, LatestImage, WeatherResource, WeedLocation, WeedTypeCount,
    decode_latest_image, decode_summary, decode_weed_locations,
};

use crate::config::{AppConfig, ConfigError, LogLevel};
use crate::dashboard::{DashboardState, ImagePanel};
use crate::model::{Recommendation, RenderedAnnotation, recommendation_for};
use crate::projection::Dimensions;
use crate::projector::AnnotationProjector;
use crate::summary::{locate_detections, summarize};
use crate::weather::{FarmingTip, daily_forecast, rain_probability_percent, tip_for};

#[derive(Debug, Parser)]
#[command(name = "weedscope-native", version, about = "Weed detection overlay tools")]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long, global = true, value_enum, ignore_case = true)]
    pub log_level: Option<LogLevel>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Project a capture's detections onto a displayed image size
    Project {
        /// `latest_image` JSON payload
        #[arg(long)]
        payload: PathBuf,
        /// Image file to read the native size from
        #[arg(long, conflicts_with = "native")]
        image: Option<PathBuf>,
        /// Native size as WIDTHxHEIGHT, instead of reading an image file
        #[arg(long, value_parser = parse_size)]
        native: Option<Dimensions>,
        /// Displayed size as WIDTHxHEIGHT
        #[arg(long, value_parser = parse_size)]
        display: Dimensions,
    },
    /// Place a capture's detections on the map and count them per type
    Summary {
        /// `latest_image` JSON payload
        #[arg(long)]
        payload: PathBuf,
    },
    /// Build the dashboard from saved backend responses
    Dashboard {
        /// `latest_image` JSON payload
        #[arg(long)]
        latest: PathBuf,
        /// `weed_locations` JSON payload
        #[arg(long)]
        locations: Option<PathBuf>,
        /// `classified_weeds_summary` JSON payload
        #[arg(long)]
        summary: Option<PathBuf>,
    },
    /// Farming advice from saved weather responses
    Weather {
        /// Current-weather JSON payload
        #[arg(long)]
        current: PathBuf,
        /// Forecast JSON payload
        #[arg(long)]
        forecast: Option<PathBuf>,
    },
    /// List the URLs the dashboard polls
    Feeds,
    /// Show treatment advice for a weed type
    Treatment {
        weed_type: String,
    },
    /// Print the effective configuration
    Config {
        /// Write the default configuration to the config path
        #[arg(long)]
        write_default: bool,
    },
}

/// Errors surfaced by the command-line tool.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid payload: {0}")]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Either --image or --native is required")]
    MissingNativeSize,

    #[error("Could not determine config directory")]
    NoConfigPath,
}

/// Parse `WIDTHxHEIGHT` into dimensions.
pub fn parse_size(s: &str) -> Result<Dimensions, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let width: f32 = w.trim().parse().map_err(|e| format!("bad width '{}': {}", w, e))?;
    let height: f32 = h
        .trim()
        .parse()
        .map_err(|e| format!("bad height '{}': {}", h, e))?;
    if width < 0.0 || height < 0.0 {
        return Err(format!("size must not be negative, got '{}'", s));
    }
    Ok(Dimensions::new(width, height))
}

#[derive(Debug, Serialize)]
struct ProjectionReport<'a> {
    image_id: &'a str,
    native: Option<Dimensions>,
    display: Dimensions,
    annotations: &'a [RenderedAnnotation],
}

#[derive(Debug, Serialize)]
struct SummaryReport {
    locations: Vec<WeedLocation>,
    summary: Vec<WeedTypeCount>,
}

#[derive(Debug, Serialize)]
struct DashboardReport {
    image_id: String,
    caption: Option<String>,
    locations: usize,
    summary: Vec<WeedTypeCount>,
    treatment_options: Vec<String>,
    selected: Option<String>,
    recommendation: Option<&'static Recommendation>,
}

#[derive(Debug, Serialize)]
struct DailyReport {
    dt: i64,
    temp: f32,
    description: Option<String>,
    icon_url: Option<String>,
    rain_probability: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WeatherReport {
    location: String,
    temp: f32,
    humidity: f32,
    wind_speed: f32,
    description: Option<String>,
    tip: FarmingTip,
    advice: &'static str,
    daily: Vec<DailyReport>,
}

#[derive(Debug, Serialize)]
struct FeedsReport {
    refresh_secs: u64,
    polled: Vec<String>,
    upload: String,
    weather_refresh_secs: u64,
    weather: Vec<String>,
    weather_error: Option<String>,
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the config named on the command line, else the default file.
///
/// Only a missing default file falls back to defaults; a default file that
/// fails to load is reported like an explicit one.
fn load_config(path: Option<&Path>) -> Result<AppConfig, CliError> {
    match path {
        Some(path) => Ok(AppConfig::load_from_path(path)?),
        None => match AppConfig::default_path() {
            Some(path) => Ok(AppConfig::load_if_exists(&path)?.unwrap_or_default()),
            None => Ok(AppConfig::default()),
        },
    }
}

/// Feed a capture into a fresh projector and resolve the image's native size.
///
/// An explicit `native` size wins; otherwise the size is read from the image
/// file header. An unreadable image leaves the projector in the failed state.
fn project_capture(
    capture: &LatestImage,
    image: Option<&Path>,
    native: Option<Dimensions>,
    display: Dimensions,
) -> Result<AnnotationProjector, CliError> {
    let mut projector = AnnotationProjector::new();
    projector.on_display_resize(display.width, display.height);
    projector.set_detection_batch(&capture.detections);

    let source = image
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| capture.image_url.clone());
    let ticket = projector.on_image_source_change(source);

    match (native, image) {
        (Some(native), _) => {
            projector.on_image_load_complete(ticket, native.width, native.height);
        }
        (None, Some(path)) => match image::image_dimensions(path) {
            Ok(size) => {
                let native = Dimensions::from(size);
                projector.on_image_load_complete(ticket, native.width, native.height);
            }
            Err(e) => {
                log::warn!("Could not read image {:?}: {}", path, e);
                projector.on_image_load_failed(ticket);
            }
        },
        (None, None) => return Err(CliError::MissingNativeSize),
    }
    Ok(projector)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

/// Parse arguments, set up logging and run the chosen command.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let level = cli.log_level.unwrap_or(config.log_level);

    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();

    execute(&cli, &config)
}

/// Run a parsed command against a loaded configuration.
pub fn execute(cli: &Cli, config: &AppConfig) -> Result<(), CliError> {
    match &cli.command {
        Command::Project {
            payload,
            image,
            native,
            display,
        } => {
            let capture = decode_latest_image(&read_file(payload)?)?;
            let projector = project_capture(&capture, image.as_deref(), *native, *display)?;

            print_json(
                &ProjectionReport {
                    image_id: &capture.id,
                    native: projector.native_dimensions(),
                    display: projector.display_dimensions(),
                    annotations: projector.annotations(),
                },
                cli.pretty,
            )
        }
        Command::Summary { payload } => {
            let capture = decode_latest_image(&read_file(payload)?)?;
            let locations =
                locate_detections(capture.drone_lat, capture.drone_lng, &capture.detections);
            let summary = summarize(&locations);
            print_json(&SummaryReport { locations, summary }, cli.pretty)
        }
        Command::Dashboard {
            latest,
            locations,
            summary,
        } => {
            let capture = decode_latest_image(&read_file(latest)?)?;
            let mut state = DashboardState::new();
            state.begin_refresh();
            state.apply_latest_image(&capture);
            if let Some(path) = locations {
                state.apply_locations(decode_weed_locations(&read_file(path)?)?);
            }
            let summary = match summary {
                Some(path) => decode_summary(&read_file(path)?)?,
                None => summarize(state.locations()),
            };
            state.apply_summary(summary);

            let caption = match state.image_panel() {
                ImagePanel::Ready(origin) => Some(origin.caption()),
                _ => None,
            };
            print_json(
                &DashboardReport {
                    image_id: capture.id,
                    caption,
                    locations: state.locations().len(),
                    summary: state.summary().to_vec(),
                    treatment_options: state.treatment_options(),
                    selected: state.selected_weed_type().map(str::to_string),
                    recommendation: state.recommendation(),
                },
                cli.pretty,
            )
        }
        Command::Weather { current, forecast } => {
            let current = decode_current(&read_file(current)?)?;
            let daily = match forecast {
                Some(path) => {
                    let forecast = decode_forecast(&read_file(path)?)?;
                    daily_forecast(&forecast)
                        .into_iter()
                        .map(|entry| DailyReport {
                            dt: entry.dt,
                            temp: entry.main.temp,
                            description: entry.weather.first().map(|c| c.description.clone()),
                            icon_url: entry.weather.first().map(|c| weather_icon_url(&c.icon)),
                            rain_probability: rain_probability_percent(entry),
                        })
                        .collect()
                }
                None => Vec::new(),
            };
            let tip = tip_for(&current);
            print_json(
                &WeatherReport {
                    location: current.name.clone(),
                    temp: current.main.temp,
                    humidity: current.main.humidity,
                    wind_speed: current.wind.speed,
                    description: current.condition().map(|c| c.description.clone()),
                    tip,
                    advice: tip.message(),
                    daily,
                },
                cli.pretty,
            )
        }
        Command::Feeds => {
            let weather = [WeatherResource::Current, WeatherResource::Forecast]
                .into_iter()
                .map(|r| config.weather.request_url(r))
                .collect::<Result<Vec<_>, _>>();
            let (weather, weather_error) = match weather {
                Ok(urls) => (urls, None),
                Err(e) => {
                    log::warn!("Weather feed disabled: {}", e);
                    (Vec::new(), Some(e.to_string()))
                }
            };
            print_json(
                &FeedsReport {
                    refresh_secs: config.dashboard_timer().interval().as_secs(),
                    polled: config.backend.polled_urls(),
                    upload: config.backend.endpoint_url(Endpoint::UploadImage),
                    weather_refresh_secs: config.weather_timer().interval().as_secs(),
                    weather,
                    weather_error,
                },
                cli.pretty,
            )
        }
        Command::Treatment { weed_type } => {
            print_json(recommendation_for(weed_type), cli.pretty)
        }
        Command::Config { write_default } => {
            if *write_default {
                let path = match &cli.config {
                    Some(path) => path.clone(),
                    None => AppConfig::default_path().ok_or(CliError::NoConfigPath)?,
                };
                AppConfig::new().save_to_path(&path)?;
            }
            print_json(config, cli.pretty)
        }
    }
}
