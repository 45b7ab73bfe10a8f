//! Board-agnostic core logic for the PDC viewer firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (bus link, timers, bar display, indicator)
//! - Control state machine and the interrupt handoff cells around it
//! - Bus message handling and the distance value store
//! - Display multiplexing
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod activity;
pub mod config;
pub mod controller;
pub mod message;
pub mod multiplex;
pub mod readings;
pub mod state;
pub mod traits;

pub use controller::{Controller, Peripherals, SetupError};
pub use state::{Event, SharedState, SystemState};
