//! CAN controller drivers

pub mod mcp2515;

pub use mcp2515::{BitTiming, Mcp2515, Mcp2515Config, Mcp2515Error};
