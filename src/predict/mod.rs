mod elements;
mod error;
mod frames;
mod ground_station;
mod observation;
mod shadow;
mod sun;
mod tle_loader;

pub use elements::OrbitalElements;
pub use error::PredictError;
pub use ground_station::GroundStation;
pub use observation::{Observation, TrackingSetup};
pub use shadow::Shadow;
pub use sun::SunEphemeris;
pub use tle_loader::load_tle_file;

#[cfg(test)]
pub(crate) mod testing {
    pub use super::elements::tests::{ISS_LINE1, ISS_LINE2};
    pub use super::observation::tests::{iss_eclipsed_at, iss_epoch, iss_from_home, iss_sunlit_at};
}
