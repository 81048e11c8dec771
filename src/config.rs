use chrono::NaiveTime;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::poller::{EvaluationTime, PollSettings, ReportFormat, DEFAULT_INTERVAL, DEFAULT_PREFIX};
use crate::predict::{
    load_tle_file, GroundStation, OrbitalElements, PredictError, SunEphemeris, TrackingSetup,
};

pub const DEFAULT_TLE: &str = "\
1 25544U 98067A   13104.86288288  .00014856  00000-0  24654-3 0  6129
2 25544  51.6469  62.5942 0010689 141.3178 311.5110 15.52291388824875";
pub const DEFAULT_LABEL: &str = "ISS";
pub const DEFAULT_COORDINATES: &str = "40.972975, -76.886064";
pub const DEFAULT_ALTITUDE_M: f64 = 134.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },
    #[error("{0}")]
    Predict(#[from] PredictError),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub station: StationConfig,
    #[serde(default)]
    pub satellite: SatelliteConfig,
    #[serde(default)]
    pub poll: PollConfig,
    /// SPK/BSP kernel for the Sun; the embedded DE440s when absent.
    pub ephemeris: Option<PathBuf>,
    pub pointing: Option<PointingConfig>,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            name: None,
            coordinates: DEFAULT_COORDINATES.to_string(),
            altitude_m: DEFAULT_ALTITUDE_M,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteConfig {
    pub label: Option<String>,
    pub tle: Option<String>,
    pub tle_file: Option<PathBuf>,
    pub norad_id: Option<u64>,
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self {
            label: Some(DEFAULT_LABEL.to_string()),
            tle: Some(DEFAULT_TLE.to_string()),
            tle_file: None,
            norad_id: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval")]
    pub interval: String,
    pub time_of_day: Option<String>,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            time_of_day: None,
            prefix: default_prefix(),
        }
    }
}

/// Antenna controller on a serial line, configured beforehand (e.g. `stty`).
#[derive(Debug, Clone, Deserialize)]
pub struct PointingConfig {
    pub device: PathBuf,
}

fn default_interval() -> String {
    humantime::format_duration(DEFAULT_INTERVAL).to_string()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // an empty document means "all defaults"
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn ground_station(&self) -> Result<GroundStation, ConfigError> {
        Ok(GroundStation::from_coordinates(
            &self.station.coordinates,
            self.station.altitude_m,
        )?)
    }

    pub fn orbital_elements(&self) -> Result<OrbitalElements, ConfigError> {
        let sat = &self.satellite;
        match (&sat.tle, &sat.tle_file) {
            (Some(_), Some(_)) => Err(ConfigError::Invalid {
                field: "satellite",
                message: "set either tle or tle_file, not both".into(),
            }),
            (Some(tle), None) => Ok(OrbitalElements::from_tle_text(tle)?),
            (None, Some(file)) => Ok(load_tle_file(&self.resolve(file), sat.norad_id)?),
            (None, None) => Ok(OrbitalElements::from_tle_text(DEFAULT_TLE)?),
        }
    }

    pub fn sun_ephemeris(&self) -> Result<SunEphemeris, ConfigError> {
        match &self.ephemeris {
            Some(path) => Ok(SunEphemeris::from_file(&self.resolve(path))?),
            None => Ok(SunEphemeris::embedded()?),
        }
    }

    /// Serial device for the antenna controller, if one is configured.
    pub fn pointing_device(&self) -> Option<PathBuf> {
        self.pointing.as_ref().map(|p| self.resolve(&p.device))
    }

    pub fn tracking_setup(&self) -> Result<TrackingSetup, ConfigError> {
        Ok(TrackingSetup::new(
            self.ground_station()?,
            self.orbital_elements()?,
            self.sun_ephemeris()?,
        ))
    }

    pub fn interval(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(self.poll.interval.trim()).map_err(|e| ConfigError::Invalid {
            field: "poll.interval",
            message: e.to_string(),
        })
    }

    pub fn evaluation_time(&self) -> Result<EvaluationTime, ConfigError> {
        match &self.poll.time_of_day {
            None => Ok(EvaluationTime::Now),
            Some(s) => parse_time_of_day(s)
                .map(EvaluationTime::TimeOfDay)
                .map_err(|message| ConfigError::Invalid {
                    field: "poll.time_of_day",
                    message,
                }),
        }
    }

    /// Label from config, else the TLE name line, else the catalog number.
    pub fn label(&self, elements: &OrbitalElements) -> String {
        self.satellite
            .label
            .clone()
            .or_else(|| elements.name().map(String::from))
            .unwrap_or_else(|| format!("NORAD {}", elements.norad_id()))
    }

    pub fn poll_settings(&self, setup: &TrackingSetup) -> Result<PollSettings, ConfigError> {
        Ok(PollSettings {
            interval: self.interval()?,
            time: self.evaluation_time()?,
            format: ReportFormat::new(self.poll.prefix.clone(), self.label(&setup.elements)),
            max_iterations: None,
        })
    }
}

pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M:%S").map_err(|e| format!("{:?}: {}", s, e))
}
