//! Vehicle bus protocol for the PDC viewer
//!
//! This crate models the CAN frames the viewer receives and the layout of
//! the park-distance-control (PDC) payload carried in them.
//!
//! # PDC Frame
//!
//! The PDC control unit broadcasts one data frame with eight payload bytes,
//! one byte per ultrasonic sensor:
//! ```text
//! ┌────┬────┬────┬────┬────┬────┬────┬────┐
//! │ FL │ FR │ RL │ RR │ FML│ FMR│ RML│ RMR│
//! │ 0  │ 1  │ 2  │ 3  │ 4  │ 5  │ 6  │ 7  │
//! └────┴────┴────┴────┴────┴────┴────┴────┘
//! ```
//!
//! Each byte is the distance to the nearest object in centimeters (0-254),
//! or 255 when nothing is in range.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod frame;
pub mod pdc;

pub use embedded_can::{self, ExtendedId, Frame, Id, StandardId};
pub use frame::{id_from_raw, raw_id, CanFrame, FrameError, MAX_DATA_LEN};
pub use pdc::{PdcMessage, Sensor, NO_OBJECT, PDC_FRAME_ID, PDC_FRAME_LEN};
