use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::predict::frames::{ecef_to_enu, gmst, norm, sub, teme_to_ecef_position};
use crate::predict::shadow::{shadow_geometry, Shadow};
use crate::predict::sun::SunEphemeris;
use crate::predict::{GroundStation, OrbitalElements, PredictError};

/// Where the satellite appears from the station at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub eclipsed: bool,
    pub altitude_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
    pub shadow: Shadow,
}

pub fn observe(
    station: &GroundStation,
    elements: &OrbitalElements,
    sun: &SunEphemeris,
    timestamp: DateTime<Utc>,
) -> Result<Observation, PredictError> {
    let prediction = elements.propagate(timestamp)?;

    let sat_ecef = teme_to_ecef_position(prediction.position, gmst(timestamp));
    let dr = sub(sat_ecef, station.position_ecef_km());
    let range_km = norm(dr);

    let (east, north, up) = ecef_to_enu(dr, station.lat_rad(), station.lon_rad());
    let azimuth_deg = east.atan2(north).to_degrees().rem_euclid(360.0);
    let altitude_deg = if range_km > 0.0 {
        (up / range_km).asin().to_degrees()
    } else {
        0.0
    };

    let geometry = shadow_geometry(prediction.position, sun.sun_position_km(timestamp)?);

    Ok(Observation {
        timestamp,
        eclipsed: geometry.eclipsed,
        altitude_deg,
        azimuth_deg,
        range_km,
        shadow: geometry.shadow,
    })
}

/// The station, element set and ephemeris, fixed for the life of the process.
#[derive(Debug)]
pub struct TrackingSetup {
    pub station: GroundStation,
    pub elements: OrbitalElements,
    pub sun: SunEphemeris,
}

impl TrackingSetup {
    pub fn new(station: GroundStation, elements: OrbitalElements, sun: SunEphemeris) -> Self {
        Self {
            station,
            elements,
            sun,
        }
    }

    pub fn observe(&self, timestamp: DateTime<Utc>) -> Result<Observation, PredictError> {
        observe(&self.station, &self.elements, &self.sun, timestamp)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::predict::elements::tests::iss;
    use crate::predict::sun::tests::sun;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, TimeZone};

    pub fn home() -> GroundStation {
        GroundStation::new(40.972975, -76.886064, 134.0).unwrap()
    }

    pub fn iss_epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 4, 14, 20, 42, 33).unwrap()
    }

    /// Built-in ISS elements from the built-in station.
    pub fn iss_from_home() -> TrackingSetup {
        TrackingSetup::new(home(), iss(), sun())
    }

    /// 18 minutes after epoch, mid-way through the first night pass.
    pub fn iss_eclipsed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 4, 14, 21, 0, 33).unwrap()
    }

    /// 65 minutes after epoch, mid-way through the first day pass.
    pub fn iss_sunlit_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 4, 14, 21, 47, 33).unwrap()
    }

    /// One observation per minute across the first orbit after epoch.
    fn first_orbit(setup: &TrackingSetup) -> Vec<Observation> {
        (0..95)
            .map(|m| setup.observe(iss_epoch() + Duration::minutes(m)).unwrap())
            .collect()
    }

    /// Geocentric latitude and longitude, degrees, under the satellite.
    fn sub_satellite_point(elements: &OrbitalElements, at: DateTime<Utc>) -> (f64, f64) {
        let teme = elements.propagate(at).unwrap().position;
        let ecef = teme_to_ecef_position(teme, gmst(at));
        let lat = (ecef[2] / norm(ecef)).asin().to_degrees();
        let lon = ecef[1].atan2(ecef[0]).to_degrees();
        (lat, lon)
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let setup = iss_from_home();
        let at = Utc.with_ymd_and_hms(2013, 4, 14, 22, 1, 29).unwrap();
        let a = setup.observe(at).unwrap();
        let b = setup.observe(at).unwrap();
        assert_eq!(a.altitude_deg.to_bits(), b.altitude_deg.to_bits());
        assert_eq!(a.azimuth_deg.to_bits(), b.azimuth_deg.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn angles_stay_in_range_and_dip_below_horizon() {
        let setup = iss_from_home();
        let samples: Vec<_> = (0..24 * 60)
            .step_by(5)
            .map(|m| setup.observe(iss_epoch() + Duration::minutes(m)).unwrap())
            .collect();

        for s in &samples {
            assert!((-90.0..=90.0).contains(&s.altitude_deg), "{:?}", s);
            assert!((0.0..360.0).contains(&s.azimuth_deg), "{:?}", s);
            // ISS orbits a few hundred km up; the far side is under 13,000 km away
            assert!(s.range_km > 300.0 && s.range_km < 13_500.0, "{:?}", s);
        }
        let below = samples.iter().filter(|s| s.altitude_deg < 0.0).count();
        assert!(below > samples.len() / 2);
        assert!(samples.iter().any(|s| s.altitude_deg < -45.0));
    }

    #[test]
    fn one_orbit_crosses_both_day_and_night() {
        let setup = iss_from_home();
        let samples = first_orbit(&setup);
        let eclipsed = samples.iter().filter(|s| s.eclipsed).count();
        assert!(eclipsed >= 15, "eclipsed minutes: {}", eclipsed);
        assert!(eclipsed <= 45, "eclipsed minutes: {}", eclipsed);
        assert!(samples
            .iter()
            .filter(|s| s.eclipsed)
            .all(|s| s.shadow != Shadow::Sunlit));
    }

    #[test]
    fn iss_is_in_umbra_during_the_first_night_pass() {
        let obs = iss_from_home().observe(iss_eclipsed_at()).unwrap();
        assert!(obs.eclipsed, "{:?}", obs);
        assert_eq!(obs.shadow, Shadow::Umbra);
    }

    #[test]
    fn iss_is_sunlit_during_the_first_day_pass() {
        let obs = iss_from_home().observe(iss_sunlit_at()).unwrap();
        assert!(!obs.eclipsed, "{:?}", obs);
        assert_eq!(obs.shadow, Shadow::Sunlit);
    }

    #[test]
    fn station_overhead_sees_positive_altitude() {
        let elements = iss();
        let at = iss_epoch();
        let (lat, lon) = sub_satellite_point(&elements, at);
        let station = GroundStation::new(lat, lon, 0.0).unwrap();
        let obs = observe(&station, &elements, &sun(), at).unwrap();
        assert!(obs.altitude_deg > 80.0, "{:?}", obs);
    }

    #[test]
    fn station_north_of_the_ground_track_looks_south() {
        let elements = iss();
        let at = iss_epoch();
        let (lat, lon) = sub_satellite_point(&elements, at);
        let station = GroundStation::new(lat + 5.0, lon, 0.0).unwrap();
        let obs = observe(&station, &elements, &sun(), at).unwrap();
        assert_abs_diff_eq!(obs.azimuth_deg, 180.0, epsilon = 0.5);
        assert!(obs.altitude_deg > 10.0, "{:?}", obs);
    }

    #[test]
    fn station_east_of_the_ground_track_looks_west() {
        let elements = iss();
        let at = iss_epoch();
        let (lat, lon) = sub_satellite_point(&elements, at);
        let station = GroundStation::new(lat, lon + 5.0, 0.0).unwrap();
        let obs = observe(&station, &elements, &sun(), at).unwrap();
        // great circle bearing bends poleward by about half the longitude gap times sin(lat)
        assert_abs_diff_eq!(obs.azimuth_deg, 270.0, epsilon = 5.0);
        assert!(obs.altitude_deg > 10.0, "{:?}", obs);
    }
}
