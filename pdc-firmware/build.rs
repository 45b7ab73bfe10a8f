//! Build script for pdc-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Parses and validates pdc.toml at compile time
//! - Generates the configuration constructor included by `src/config.rs`

use std::env;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use pdc_core::config::PdcConfig;

fn main() {
    setup_linker();
    let config = load_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var("CARGO_FEATURE_DEFMT").is_ok() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read, parse and validate pdc.toml
fn load_config() -> PdcConfig {
    println!("cargo:rerun-if-changed=pdc.toml");

    let config_path = Path::new("pdc.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: pdc.toml not found!                                      ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a pdc.toml configuration file.            ║\n\
            ║  Please create one in the pdc-firmware directory.                ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read pdc.toml                                  ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: PdcConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid pdc.toml                                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    if let Err(e) = config.validate() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: pdc.toml rejected                                        ║\n\
            ║                                                                  ║\n\
            ║  {:<64} ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            describe(&e)
        );
    }

    println!(
        "cargo:warning=pdc.toml validated: id 0x{:X}, {} side(s), {:?} mode",
        config.bus.identifier,
        config.side_count(),
        config.bus.mode
    );
    config
}

fn describe(e: &pdc_core::config::ConfigError) -> &'static str {
    use pdc_core::config::ConfigError::*;
    match e {
        NoSides => "At least one [[sides]] entry is required",
        IdentifierOutOfRange => "bus.identifier does not fit the identifier kind",
        MaskOutOfRange => "bus.mask has bits outside the identifier kind",
        ZeroPeriod => "timing periods must be greater than zero",
        ZeroClock => "bus.bitrate and bus.oscillator_hz must be non-zero",
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Emit `pdc_config()` into OUT_DIR/config.rs
fn generate_config(config: &PdcConfig) {
    let bus = &config.bus;
    let timing = &config.timing;

    let mut sides = String::new();
    for side in &config.sides {
        writeln!(
            sides,
            "    let _ = sides.push(SideConfig::new(Sensor::{:?}, Sensor::{:?}));",
            side.primary, side.secondary
        )
        .unwrap();
    }

    let code = format!(
        "// Generated from pdc.toml by build.rs\n\
         \n\
         pub fn pdc_config() -> PdcConfig {{\n\
         \x20   let mut sides = heapless::Vec::new();\n\
         {sides}\
         \x20   PdcConfig {{\n\
         \x20       bus: BusConfig {{\n\
         \x20           identifier: 0x{id:X},\n\
         \x20           extended: {extended},\n\
         \x20           mask: 0x{mask:X},\n\
         \x20           bitrate: {bitrate},\n\
         \x20           oscillator_hz: {osc},\n\
         \x20           listen_only: {listen_only},\n\
         \x20           mode: BusMode::{mode:?},\n\
         \x20       }},\n\
         \x20       timing: TimingConfig {{\n\
         \x20           idle_timeout_ms: {idle},\n\
         \x20           refresh_period_ms: {refresh},\n\
         \x20           error_blink_ms: {blink},\n\
         \x20       }},\n\
         \x20       sides,\n\
         \x20   }}\n\
         }}\n",
        sides = sides,
        id = bus.identifier,
        extended = bus.extended,
        mask = bus.mask,
        bitrate = bus.bitrate,
        osc = bus.oscillator_hz,
        listen_only = bus.listen_only,
        mode = bus.mode,
        idle = timing.idle_timeout_ms,
        refresh = timing.refresh_period_ms,
        blink = timing.error_blink_ms,
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("config.rs"), code).unwrap();
}
