use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid tle format: expected 2 or 3 lines, got {0}")]
    InvalidTleFormat(usize),
    #[error("invalid tle: {0}")]
    InvalidTle(#[from] sgp4::TleError),
    #[error("elements error: {0}")]
    Elements(#[from] sgp4::ElementsError),
    #[error("invalid ground station: {0}")]
    InvalidStation(String),
    #[error("propagation error: {0}")]
    Propagation(String),
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("satellite {norad_id} not found in {file}")]
    SatelliteNotFound { file: String, norad_id: u64 },
    #[error("no satellites in {0}")]
    NoSatellites(String),
    #[error("ephemeris error: {0}")]
    Ephemeris(#[from] anise::errors::AlmanacError),
}

impl From<sgp4::Error> for PredictError {
    fn from(err: sgp4::Error) -> Self {
        PredictError::Propagation(err.to_string())
    }
}

impl From<anise::ephemerides::EphemerisError> for PredictError {
    fn from(err: anise::ephemerides::EphemerisError) -> Self {
        PredictError::Ephemeris(anise::errors::AlmanacError::Ephemeris {
            action: "computing Sun position",
            source: Box::new(err),
        })
    }
}
