//! Serial packets understood by the SatTrak antenna controller.
//!
//! Every packet is a `0xAA` header, one command byte, then the command's
//! arguments. Arguments are big-endian IEEE-754 doubles, back to back.
//! There is no checksum.

use thiserror::Error;

pub const HEADER: u8 = 0xAA;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    Ack = 0x01,
    Nack = 0x02,
    SetOrientation = 0x03,
    ReadOrientation = 0x04,
    OrientationResponse = 0x05,
    ReadEnvironment = 0x06,
    EnvironmentResponse = 0x07,
    ReadGps = 0x08,
    GpsResponse = 0x09,
    EstablishConnection = 0x0A,
}

impl Command {
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0x01 => Command::Ack,
            0x02 => Command::Nack,
            0x03 => Command::SetOrientation,
            0x04 => Command::ReadOrientation,
            0x05 => Command::OrientationResponse,
            0x06 => Command::ReadEnvironment,
            0x07 => Command::EnvironmentResponse,
            0x08 => Command::ReadGps,
            0x09 => Command::GpsResponse,
            0x0A => Command::EstablishConnection,
            _ => return None,
        })
    }

    /// What the controller answers with, if anything.
    pub fn response(self) -> Option<Self> {
        match self {
            Command::SetOrientation => Some(Command::Ack),
            Command::ReadOrientation => Some(Command::OrientationResponse),
            Command::ReadEnvironment => Some(Command::EnvironmentResponse),
            Command::ReadGps => Some(Command::GpsResponse),
            Command::OrientationResponse
            | Command::EnvironmentResponse
            | Command::GpsResponse
            | Command::EstablishConnection => Some(Command::Ack),
            Command::Ack | Command::Nack => None,
        }
    }

    fn args_len(self) -> usize {
        match self {
            Command::Ack | Command::Nack => 1,
            Command::SetOrientation
            | Command::OrientationResponse
            | Command::EnvironmentResponse
            | Command::GpsResponse => 16,
            Command::ReadOrientation
            | Command::ReadEnvironment
            | Command::ReadGps
            | Command::EstablishConnection => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Ack(Command),
    Nack(Command),
    SetOrientation { azimuth_deg: f64, elevation_deg: f64 },
    ReadOrientation,
    OrientationResponse { azimuth_deg: f64, elevation_deg: f64 },
    ReadEnvironment,
    EnvironmentResponse { temperature_c: f64, humidity_pct: f64 },
    ReadGps,
    GpsResponse { latitude_deg: f64, longitude_deg: f64 },
    EstablishConnection,
}

#[derive(Debug, Error, PartialEq)]
pub enum PacketError {
    #[error("packet too short: {0} bytes")]
    TooShort(usize),
    #[error("bad header byte {0:#04x}")]
    BadHeader(u8),
    #[error("unknown command {0:#04x}")]
    UnknownCommand(u8),
    #[error("{command:?} takes {expected} argument bytes, got {actual}")]
    BadLength {
        command: Command,
        expected: usize,
        actual: usize,
    },
}

impl Packet {
    pub fn command(&self) -> Command {
        match self {
            Packet::Ack(_) => Command::Ack,
            Packet::Nack(_) => Command::Nack,
            Packet::SetOrientation { .. } => Command::SetOrientation,
            Packet::ReadOrientation => Command::ReadOrientation,
            Packet::OrientationResponse { .. } => Command::OrientationResponse,
            Packet::ReadEnvironment => Command::ReadEnvironment,
            Packet::EnvironmentResponse { .. } => Command::EnvironmentResponse,
            Packet::ReadGps => Command::ReadGps,
            Packet::GpsResponse { .. } => Command::GpsResponse,
            Packet::EstablishConnection => Command::EstablishConnection,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let command = self.command();
        let mut v = Vec::with_capacity(2 + command.args_len());
        v.push(HEADER);
        v.push(command as u8);
        match *self {
            Packet::Ack(c) | Packet::Nack(c) => v.push(c as u8),
            Packet::SetOrientation {
                azimuth_deg: a,
                elevation_deg: b,
            }
            | Packet::OrientationResponse {
                azimuth_deg: a,
                elevation_deg: b,
            }
            | Packet::EnvironmentResponse {
                temperature_c: a,
                humidity_pct: b,
            }
            | Packet::GpsResponse {
                latitude_deg: a,
                longitude_deg: b,
            } => {
                v.extend(a.to_be_bytes());
                v.extend(b.to_be_bytes());
            }
            Packet::ReadOrientation
            | Packet::ReadEnvironment
            | Packet::ReadGps
            | Packet::EstablishConnection => {}
        }
        v
    }

    pub fn parse(raw: &[u8]) -> Result<Self, PacketError> {
        if raw.len() < 2 {
            return Err(PacketError::TooShort(raw.len()));
        }
        if raw[0] != HEADER {
            return Err(PacketError::BadHeader(raw[0]));
        }
        let command = Command::from_byte(raw[1]).ok_or(PacketError::UnknownCommand(raw[1]))?;
        let args = &raw[2..];
        if args.len() != command.args_len() {
            return Err(PacketError::BadLength {
                command,
                expected: command.args_len(),
                actual: args.len(),
            });
        }

        let pair = || (f64_at(args, 0), f64_at(args, 8));
        Ok(match command {
            Command::Ack | Command::Nack => {
                let target =
                    Command::from_byte(args[0]).ok_or(PacketError::UnknownCommand(args[0]))?;
                if command == Command::Ack {
                    Packet::Ack(target)
                } else {
                    Packet::Nack(target)
                }
            }
            Command::SetOrientation => {
                let (azimuth_deg, elevation_deg) = pair();
                Packet::SetOrientation {
                    azimuth_deg,
                    elevation_deg,
                }
            }
            Command::OrientationResponse => {
                let (azimuth_deg, elevation_deg) = pair();
                Packet::OrientationResponse {
                    azimuth_deg,
                    elevation_deg,
                }
            }
            Command::GpsResponse => {
                let (latitude_deg, longitude_deg) = pair();
                Packet::GpsResponse {
                    latitude_deg,
                    longitude_deg,
                }
            }
            Command::EnvironmentResponse => {
                let (temperature_c, humidity_pct) = pair();
                Packet::EnvironmentResponse {
                    temperature_c,
                    humidity_pct,
                }
            }
            Command::ReadOrientation => Packet::ReadOrientation,
            Command::ReadEnvironment => Packet::ReadEnvironment,
            Command::ReadGps => Packet::ReadGps,
            Command::EstablishConnection => Packet::EstablishConnection,
        })
    }
}

// callers check the length first
fn f64_at(bytes: &[u8], offset: usize) -> f64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[offset..offset + 8]);
    f64::from_be_bytes(buf)
}
