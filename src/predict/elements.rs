use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use sgp4::{Constants, Elements, Prediction};

use crate::predict::PredictError;

/// A parsed element set together with its SGP4 propagation constants.
pub struct OrbitalElements {
    elements: Elements,
    constants: Constants,
}

impl OrbitalElements {
    pub fn from_lines(name: Option<String>, line1: &str, line2: &str) -> Result<Self, PredictError> {
        let elements = Elements::from_tle(name, line1.trim().as_bytes(), line2.trim().as_bytes())?;
        let constants = Constants::from_elements(&elements)?;
        Ok(Self {
            elements,
            constants,
        })
    }

    /// Accepts a 2-line set or a 3-line set with a leading name line.
    pub fn from_tle_text(tle: &str) -> Result<Self, PredictError> {
        let (name, line1, line2) = parse_tle_lines(tle)?;
        Self::from_lines(name, &line1, &line2)
    }

    pub fn name(&self) -> Option<&str> {
        self.elements.object_name.as_deref()
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    pub fn epoch(&self) -> NaiveDateTime {
        self.elements.datetime
    }

    pub fn age_days(&self, at: DateTime<Utc>) -> f64 {
        (at.naive_utc() - self.epoch()).num_seconds() as f64 / 86_400.0
    }

    pub(crate) fn propagate(&self, at: DateTime<Utc>) -> Result<Prediction, PredictError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&at.naive_utc())
            .map_err(|e| PredictError::Propagation(e.to_string()))?;
        Ok(self.constants.propagate(minutes)?)
    }
}

impl fmt::Debug for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrbitalElements")
            .field("name", &self.name())
            .field("norad_id", &self.norad_id())
            .field("epoch", &self.epoch())
            .finish()
    }
}

pub fn parse_tle_lines(tle: &str) -> Result<(Option<String>, String, String), PredictError> {
    let lines: Vec<String> = tle
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    match lines.len() {
        2 => Ok((None, lines[0].clone(), lines[1].clone())),
        3 => Ok((Some(lines[0].clone()), lines[1].clone(), lines[2].clone())),
        n => Err(PredictError::InvalidTleFormat(n)),
    }
}
