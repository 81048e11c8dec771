//! Sun position from a JPL ephemeris loaded through `anise`.

use std::fmt;
use std::path::Path;

use anise::almanac::Almanac;
use anise::constants::frames::{EARTH_J2000, SUN_J2000};
use chrono::{DateTime, Utc};
use hifitime::Epoch;

use crate::predict::PredictError;

pub const SUN_RADIUS_KM: f64 = 696_000.0;

pub struct SunEphemeris {
    almanac: Almanac,
}

impl SunEphemeris {
    /// DE440s and the planetary constants compiled into the binary.
    pub fn embedded() -> Result<Self, PredictError> {
        let almanac = Almanac::until_2035()?;
        Ok(Self { almanac })
    }

    /// Loads an SPK/BSP kernel, e.g. `de440s.bsp`.
    pub fn from_file(path: &Path) -> Result<Self, PredictError> {
        let path = path.to_string_lossy();
        log::info!("Loading ephemeris from {}", path);
        let almanac = Almanac::new(&path)?;
        Ok(Self { almanac })
    }

    /// Geocentric position of the Sun in km, EME2000 axes.
    ///
    /// SGP4 positions are TEME; the two frames differ by precession
    /// since J2000 (about 0.2 degree in the 2010s), which moves shadow
    /// entry and exit by a few seconds.
    pub fn sun_position_km(&self, timestamp: DateTime<Utc>) -> Result<[f64; 3], PredictError> {
        let state = self
            .almanac
            .translate_geometric(SUN_J2000, EARTH_J2000, to_epoch(timestamp))?;
        let r = state.radius_km;
        Ok([r.x, r.y, r.z])
    }
}

impl fmt::Debug for SunEphemeris {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SunEphemeris").finish_non_exhaustive()
    }
}

fn to_epoch(timestamp: DateTime<Utc>) -> Epoch {
    let seconds = timestamp.timestamp() as f64 + timestamp.timestamp_subsec_nanos() as f64 * 1e-9;
    Epoch::from_unix_seconds(seconds)
}
