//! Build-time configuration
//!
//! `pdc_config()` is generated from pdc.toml by build.rs, which has already
//! validated it.

use pdc_core::config::{BusConfig, BusMode, PdcConfig, SideConfig, TimingConfig};
use pdc_protocol::Sensor;

include!(concat!(env!("OUT_DIR"), "/config.rs"));

/// Configuration for this build
///
/// The `no-bus` feature forces bypass mode regardless of pdc.toml.
pub fn load() -> PdcConfig {
    let mut config = pdc_config();
    if cfg!(feature = "no-bus") {
        config.bus.mode = BusMode::Bypass;
    }
    config
}
