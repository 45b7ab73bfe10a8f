//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in pdc-core over `embedded-hal` 1.0:
//!
//! - CAN controller (MCP2515 over SPI)
//! - Multiplexed bar-graph display (GPIO rows and columns)
//! - Status LED

#![no_std]
#![deny(unsafe_code)]

pub mod can;
pub mod display;
pub mod led;
