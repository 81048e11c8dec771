use serde::Serialize;

use crate::predict::frames::{dot, norm, sub};
use crate::predict::ground_station::EARTH_EQUATORIAL_RADIUS_KM;
use crate::predict::sun::SUN_RADIUS_KM;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shadow {
    Sunlit,
    Penumbra,
    Umbra,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowGeometry {
    pub shadow: Shadow,
    /// True when the centre of the solar disk is behind the Earth's limb.
    pub eclipsed: bool,
}

/// Compares the apparent disks of the Earth and the Sun as seen from the
/// satellite. Both positions are geocentric, same frame, in km.
pub fn shadow_geometry(sat_km: [f64; 3], sun_km: [f64; 3]) -> ShadowGeometry {
    let sat_r = norm(sat_km);
    let to_sun = sub(sun_km, sat_km);
    let to_sun_r = norm(to_sun);

    if sat_r <= EARTH_EQUATORIAL_RADIUS_KM {
        return ShadowGeometry {
            shadow: Shadow::Umbra,
            eclipsed: true,
        };
    }

    let earth_semi = (EARTH_EQUATORIAL_RADIUS_KM / sat_r).asin();
    let sun_semi = (SUN_RADIUS_KM / to_sun_r).asin();
    // earth centre direction is -sat
    let cos_sep = (-dot(sat_km, to_sun) / (sat_r * to_sun_r)).clamp(-1.0, 1.0);
    let separation = cos_sep.acos();

    let shadow = if earth_semi > sun_semi && separation <= earth_semi - sun_semi {
        Shadow::Umbra
    } else if separation < earth_semi + sun_semi {
        Shadow::Penumbra
    } else {
        Shadow::Sunlit
    };

    ShadowGeometry {
        shadow,
        eclipsed: separation < earth_semi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUN: [f64; 3] = [149_597_870.7, 0.0, 0.0];

    #[test]
    fn anti_sunward_leo_is_umbra() {
        let g = shadow_geometry([-6800.0, 0.0, 0.0], SUN);
        assert_eq!(g.shadow, Shadow::Umbra);
        assert!(g.eclipsed);
    }

    #[test]
    fn sunward_leo_is_sunlit() {
        let g = shadow_geometry([6800.0, 0.0, 0.0], SUN);
        assert_eq!(g.shadow, Shadow::Sunlit);
        assert!(!g.eclipsed);
    }

    #[test]
    fn over_the_terminator_is_sunlit() {
        let g = shadow_geometry([0.0, 6800.0, 0.0], SUN);
        assert_eq!(g.shadow, Shadow::Sunlit);
    }

    #[test]
    fn grazing_the_limb_is_penumbra() {
        // Place the satellite behind the Earth so the Sun's centre sits
        // right on the limb.
        let r: f64 = 6800.0;
        let earth_semi = (EARTH_EQUATORIAL_RADIUS_KM / r).asin();
        let sat = [-r * earth_semi.cos(), r * earth_semi.sin(), 0.0];
        let g = shadow_geometry(sat, SUN);
        assert_eq!(g.shadow, Shadow::Penumbra);
    }

    #[test]
    fn far_beyond_the_umbra_cone_is_penumbra_not_umbra() {
        // Past the tip of the umbra cone the Earth's disk is smaller than the Sun's.
        let g = shadow_geometry([-3_000_000.0, 0.0, 0.0], SUN);
        assert_eq!(g.shadow, Shadow::Penumbra);
        assert!(g.eclipsed);
    }
}
