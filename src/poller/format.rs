use crate::predict::Observation;

pub const DEFAULT_PREFIX: &str = "10 min";

/// Renders observations as report lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFormat {
    pub prefix: String,
    pub label: String,
}

impl ReportFormat {
    pub fn new(prefix: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            label: label.into(),
        }
    }

    pub fn line(&self, observation: &Observation) -> String {
        if observation.eclipsed {
            self.eclipsed_line()
        } else {
            self.position_line(observation.altitude_deg, observation.azimuth_deg)
        }
    }

    pub fn eclipsed_line(&self) -> String {
        self.join(format!("{} is currently eclipsed", self.label.to_uppercase()))
    }

    pub fn position_line(&self, altitude_deg: f64, azimuth_deg: f64) -> String {
        self.join(format!(
            "{}: altitude {:4.1} deg, azimuth {:5.1} deg",
            self.label.to_lowercase(),
            altitude_deg,
            azimuth_deg
        ))
    }

    fn join(&self, body: String) -> String {
        if self.prefix.is_empty() {
            body
        } else {
            format!("{} {}", self.prefix, body)
        }
    }
}
