//! Configuration type definitions
//!
//! The firmware deserializes these from `pdc.toml` at build time (with the
//! `serde` feature) and validates them with the same [`PdcConfig::validate`]
//! the control loop runs at Init.

use heapless::Vec;
use pdc_protocol::{id_from_raw, Id, PdcMessage, Sensor, PDC_FRAME_ID};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::IdFilter;

/// Maximum number of display sides
pub const MAX_SIDES: usize = 8;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No display sides configured
    NoSides,
    /// Identifier does not fit the identifier kind
    IdentifierOutOfRange,
    /// Mask has bits outside the identifier kind
    MaskOutOfRange,
    /// A timer period is zero
    ZeroPeriod,
    /// Bitrate or oscillator frequency is zero
    ZeroClock,
}

/// How the control loop uses the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BusMode {
    /// Poll the bus link for frames
    #[default]
    Normal,
    /// Bench mode: the bus link is never touched and the idle timer is
    /// held off on every loop iteration
    Bypass,
}

/// One display side: the nearer of two overlapping sensors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SideConfig {
    pub primary: Sensor,
    pub secondary: Sensor,
}

impl SideConfig {
    pub const fn new(primary: Sensor, secondary: Sensor) -> Self {
        Self { primary, secondary }
    }

    /// Distance shown for this side
    pub fn distance(&self, msg: &PdcMessage) -> u8 {
        msg.nearest(self.primary, self.secondary)
    }
}

/// Bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BusConfig {
    /// PDC frame identifier
    pub identifier: u32,
    /// Identifier is 29-bit
    pub extended: bool,
    /// Acceptance mask programmed into the controller
    pub mask: u32,
    /// Bus bitrate in bit/s
    pub bitrate: u32,
    /// Controller oscillator frequency in Hz
    pub oscillator_hz: u32,
    /// Receive without acknowledging frames
    pub listen_only: bool,
    /// Normal or bypass operation
    pub mode: BusMode,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            identifier: PDC_FRAME_ID as u32,
            extended: false,
            mask: 0x7FF,
            bitrate: 100_000,
            oscillator_hz: 16_000_000,
            listen_only: true,
            mode: BusMode::Normal,
        }
    }
}

impl BusConfig {
    /// Largest identifier for the configured kind
    pub fn max_identifier(&self) -> u32 {
        if self.extended {
            0x1FFF_FFFF
        } else {
            0x7FF
        }
    }

    /// Typed identifier
    pub fn id(&self) -> Result<Id, ConfigError> {
        id_from_raw(self.identifier, self.extended)
            .map_err(|_| ConfigError::IdentifierOutOfRange)
    }

    /// Acceptance filter for the controller
    pub fn filter(&self) -> Result<IdFilter, ConfigError> {
        if self.mask > self.max_identifier() {
            return Err(ConfigError::MaskOutOfRange);
        }
        Ok(IdFilter {
            id: self.id()?,
            mask: self.mask,
        })
    }
}

/// Timer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Bus silence before sleeping (ms)
    pub idle_timeout_ms: u32,
    /// Display multiplex period (ms)
    pub refresh_period_ms: u32,
    /// Indicator half-period in the error state (ms)
    pub error_blink_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 15_000,
            refresh_period_ms: 5,
            error_blink_ms: 500,
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PdcConfig {
    pub bus: BusConfig,
    pub timing: TimingConfig,
    /// Display sides, in column order
    pub sides: Vec<SideConfig, MAX_SIDES>,
}

impl Default for PdcConfig {
    fn default() -> Self {
        let mut sides = Vec::new();
        let _ = sides.push(SideConfig::new(Sensor::RearLeft, Sensor::RearMidLeft));
        let _ = sides.push(SideConfig::new(Sensor::RearRight, Sensor::RearMidRight));

        Self {
            bus: BusConfig::default(),
            timing: TimingConfig::default(),
            sides,
        }
    }
}

impl PdcConfig {
    /// Check the configuration for values the control loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sides.is_empty() {
            return Err(ConfigError::NoSides);
        }
        self.bus.filter()?;

        if self.bus.bitrate == 0 || self.bus.oscillator_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }

        let t = &self.timing;
        if t.idle_timeout_ms == 0 || t.refresh_period_ms == 0 || t.error_blink_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }

        Ok(())
    }

    /// Number of display sides
    pub fn side_count(&self) -> usize {
        self.sides.len()
    }

    /// Check if the bus link is used at all
    pub fn uses_bus(&self) -> bool {
        self.bus.mode == BusMode::Normal
    }
}
