//! Bus message handling
//!
//! Turns a received frame into side readings. Frames that do not carry the
//! configured identifier, remote requests and short payloads are dropped
//! without any error reported.

use pdc_protocol::{CanFrame, Frame, Id, PdcMessage};

use crate::config::SideConfig;
use crate::readings::DistanceReadings;

/// What happened to a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameOutcome {
    /// Identifier differs from the configured one
    Ignored,
    /// Remote request with the configured identifier
    Remote,
    /// Data frame with the configured identifier but a short payload
    Malformed,
    /// Readings were updated
    Updated,
}

/// Apply one frame to the readings
pub fn apply_frame(
    frame: &CanFrame,
    id: Id,
    sides: &[SideConfig],
    readings: &mut DistanceReadings,
) -> FrameOutcome {
    if frame.id() != id {
        return FrameOutcome::Ignored;
    }
    if frame.is_remote_frame() {
        return FrameOutcome::Remote;
    }

    let msg = match PdcMessage::parse(frame) {
        Ok(msg) => msg,
        Err(_) => return FrameOutcome::Malformed,
    };

    for (index, side) in sides.iter().enumerate() {
        readings.set(index, side.distance(&msg));
    }
    FrameOutcome::Updated
}
