//! Configuration types
//!
//! Board-agnostic configuration, resolved at build time by the firmware.

pub mod types;

pub use types::*;
