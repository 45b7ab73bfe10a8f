//! CAN frame model.
//!
//! Identifiers come from `embedded-can`. A frame carries an 11-bit
//! (standard) or 29-bit (extended) identifier, a remote-request flag and up
//! to 8 data bytes. Remote frames carry a length code but no data.

use embedded_can::{ExtendedId, Frame, Id, StandardId};
use heapless::Vec;

/// Maximum number of data bytes in a classic CAN frame
pub const MAX_DATA_LEN: usize = 8;

/// Errors that can occur while interpreting a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Identifier does not fit the identifier kind
    InvalidId,
    /// Payload shorter than the message layout requires
    TooShort {
        /// Bytes required by the layout
        expected: usize,
        /// Bytes actually present
        actual: usize,
    },
    /// A remote frame was given where a data frame is required
    RemoteFrame,
}

/// Build an identifier from a raw value and its kind
pub fn id_from_raw(raw: u32, extended: bool) -> Result<Id, FrameError> {
    if extended {
        ExtendedId::new(raw)
            .map(Id::Extended)
            .ok_or(FrameError::InvalidId)
    } else {
        u16::try_from(raw)
            .ok()
            .and_then(StandardId::new)
            .map(Id::Standard)
            .ok_or(FrameError::InvalidId)
    }
}

/// Raw identifier value, without the kind
pub fn raw_id(id: Id) -> u32 {
    match id {
        Id::Standard(id) => id.as_raw() as u32,
        Id::Extended(id) => id.as_raw(),
    }
}

/// A received or constructed CAN frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanFrame {
    id: Id,
    remote: bool,
    /// Length code; equals `data.len()` for data frames
    dlc: u8,
    data: Vec<u8, MAX_DATA_LEN>,
}

impl Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        let data = Vec::from_slice(data).ok()?;
        Some(Self {
            id: id.into(),
            remote: false,
            dlc: data.len() as u8,
            data,
        })
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > MAX_DATA_LEN {
            return None;
        }
        Some(Self {
            id: id.into(),
            remote: true,
            dlc: dlc as u8,
            data: Vec::new(),
        })
    }

    fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    fn is_remote_frame(&self) -> bool {
        self.remote
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        self.dlc as usize
    }

    /// Payload bytes, empty for remote frames
    fn data(&self) -> &[u8] {
        &self.data
    }
}
