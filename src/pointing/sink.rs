use std::io::{self, Write};

use super::packet::Packet;
use crate::predict::Observation;

/// Turns observations into SET_ORIENTATION packets on a byte stream,
/// usually the controller's serial device.
pub struct PointingSink<W> {
    out: W,
    sent: usize,
}

impl<W: Write> PointingSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, sent: 0 }
    }

    /// Writes one packet unless the satellite is eclipsed. Returns whether
    /// a packet went out.
    pub fn point(&mut self, observation: &Observation) -> io::Result<bool> {
        if observation.eclipsed {
            return Ok(false);
        }
        let packet = Packet::SetOrientation {
            azimuth_deg: observation.azimuth_deg,
            elevation_deg: observation.altitude_deg,
        };
        self.out.write_all(&packet.to_bytes())?;
        self.out.flush()?;
        self.sent += 1;
        log::debug!(
            "Pointing to az {:.1} el {:.1}",
            observation.azimuth_deg,
            observation.altitude_deg
        );
        Ok(true)
    }

    pub fn sent(&self) -> usize {
        self.sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointing::packet::HEADER;
    use crate::predict::testing::{iss_eclipsed_at, iss_from_home, iss_sunlit_at};

    #[test]
    fn sunlit_observation_is_sent_as_set_orientation() {
        let obs = iss_from_home().observe(iss_sunlit_at()).unwrap();
        let mut bytes = Vec::new();
        let mut sink = PointingSink::new(&mut bytes);

        assert!(sink.point(&obs).unwrap());
        assert_eq!(sink.sent(), 1);
        assert_eq!(bytes[0], HEADER);
        assert_eq!(
            Packet::parse(&bytes).unwrap(),
            Packet::SetOrientation {
                azimuth_deg: obs.azimuth_deg,
                elevation_deg: obs.altitude_deg,
            }
        );
    }

    #[test]
    fn eclipsed_observation_is_skipped() {
        let obs = iss_from_home().observe(iss_eclipsed_at()).unwrap();
        let mut bytes = Vec::new();
        let mut sink = PointingSink::new(&mut bytes);

        assert!(!sink.point(&obs).unwrap());
        assert_eq!(sink.sent(), 0);
        assert!(bytes.is_empty());
    }
}
