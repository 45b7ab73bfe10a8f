//! Park-distance-control payload layout.

use embedded_can::Frame;

use crate::frame::FrameError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of the PDC data frame
pub const PDC_FRAME_ID: u16 = 0x54B;

/// Payload length of the PDC data frame
pub const PDC_FRAME_LEN: usize = 8;

/// Distance value meaning "no object in range"
pub const NO_OBJECT: u8 = 255;

/// Sensor positions, in payload byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Sensor {
    FrontLeft = 0,
    FrontRight = 1,
    RearLeft = 2,
    RearRight = 3,
    FrontMidLeft = 4,
    FrontMidRight = 5,
    RearMidLeft = 6,
    RearMidRight = 7,
}

impl Sensor {
    /// All sensors in payload order
    pub const ALL: [Sensor; PDC_FRAME_LEN] = [
        Sensor::FrontLeft,
        Sensor::FrontRight,
        Sensor::RearLeft,
        Sensor::RearRight,
        Sensor::FrontMidLeft,
        Sensor::FrontMidRight,
        Sensor::RearMidLeft,
        Sensor::RearMidRight,
    ];

    /// Payload byte offset of this sensor
    pub const fn offset(self) -> usize {
        self as usize
    }
}

/// Decoded PDC payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PdcMessage {
    distances: [u8; PDC_FRAME_LEN],
}

impl PdcMessage {
    /// Decode the payload of a PDC data frame
    ///
    /// The identifier is not checked here; callers match it against their
    /// configured identifier first.
    pub fn parse(frame: &impl Frame) -> Result<Self, FrameError> {
        if frame.is_remote_frame() {
            return Err(FrameError::RemoteFrame);
        }
        Self::from_payload(frame.data())
    }

    /// Decode a raw payload
    ///
    /// Bytes beyond the eighth are ignored.
    pub fn from_payload(data: &[u8]) -> Result<Self, FrameError> {
        let bytes = data.get(..PDC_FRAME_LEN).ok_or(FrameError::TooShort {
            expected: PDC_FRAME_LEN,
            actual: data.len(),
        })?;

        let mut distances = [NO_OBJECT; PDC_FRAME_LEN];
        distances.copy_from_slice(bytes);
        Ok(Self { distances })
    }

    /// Distance reported by one sensor
    pub fn distance(&self, sensor: Sensor) -> u8 {
        self.distances[sensor.offset()]
    }

    /// Nearest distance reported by two sensors covering overlapping zones
    pub fn nearest(&self, a: Sensor, b: Sensor) -> u8 {
        self.distance(a).min(self.distance(b))
    }
}
