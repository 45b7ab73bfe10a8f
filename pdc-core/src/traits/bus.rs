//! Vehicle bus link trait

use pdc_protocol::{CanFrame, Id};

/// Acceptance filter: a frame passes when `(frame_id & mask) == (id & mask)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdFilter {
    /// Identifier to accept
    pub id: Id,
    /// Bits of the identifier that must match
    pub mask: u32,
}

/// Trait for the bus transceiver collaborator
///
/// Implementations wrap a CAN controller. Reception is polled.
pub trait BusLink {
    /// Driver error type
    type Error;

    /// Reset and configure the controller for reception
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Program the hardware acceptance filter
    fn configure_filters(&mut self, filter: &IdFilter) -> Result<(), Self::Error>;

    /// Take one received frame if one is pending
    ///
    /// Frames the controller could not decode are dropped and reported as
    /// `None`.
    fn try_receive(&mut self) -> Option<CanFrame>;

    /// Put the controller to sleep with bus wake-up enabled
    fn sleep(&mut self) -> Result<(), Self::Error>;

    /// Bring the controller back to its operating mode
    fn wake(&mut self) -> Result<(), Self::Error>;
}
