//! PDC Viewer - Park Distance Control Display Firmware
//!
//! Main firmware binary for RP2040 boards with an MCP2515 CAN controller
//! and a multiplexed LED bar-graph. Shows the nearest obstacle per vehicle
//! side while the bus is active and sleeps with the vehicle.
//!
//! The control loop runs in thread mode and never awaits. The timer and
//! wake tasks run on an interrupt executor so they preempt it the way
//! hardware timer interrupts would.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::*;
use embassy_executor::InterruptExecutor;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::spi::{self, Spi};
use embassy_time::{Delay, Duration};
use {defmt_rtt as _, panic_probe as _};

use pdc_core::{Controller, Peripherals, SystemState};
use pdc_drivers::can::{Mcp2515, Mcp2515Config};
use pdc_drivers::display::{BarConfig, MatrixBar};
use pdc_drivers::led::StatusLed;

mod board;
mod channels;
mod config;
mod tasks;

use board::{CortexPower, EmbassyTimers, PinWake};
use channels::SHARED;

/// SPI clock for the MCP2515 (max 10 MHz)
const CAN_SPI_HZ: u32 = 8_000_000;

/// Executor for the timer and wake tasks
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[entry]
fn main() -> ! {
    info!("PDC viewer starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();
    info!(
        "Config: id=0x{:X} ext={} {} bit/s, {} side(s), mode={}",
        config.bus.identifier,
        config.bus.extended,
        config.bus.bitrate,
        config.side_count(),
        config.bus.mode
    );

    // Timer and wake notifications preempt the control loop
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);

    let idle = Duration::from_millis(config.timing.idle_timeout_ms as u64);
    let refresh = Duration::from_millis(config.timing.refresh_period_ms as u64);
    spawner.spawn(tasks::idle_timer_task(idle)).unwrap();
    spawner.spawn(tasks::refresh_timer_task(refresh)).unwrap();

    // MCP2515 INT (open drain, low on wake)
    let can_int = Input::new(p.PIN_20, Pull::Up);
    spawner.spawn(tasks::wake_task(can_int)).unwrap();

    // CAN controller on SPI0 (SCK=GPIO2, MOSI=GPIO3, MISO=GPIO4, CS=GPIO5)
    let mut spi_config = spi::Config::default();
    spi_config.frequency = CAN_SPI_HZ;
    let spi = Spi::new_blocking(p.SPI0, p.PIN_2, p.PIN_3, p.PIN_4, spi_config);
    let cs = Output::new(p.PIN_5, Level::High);
    let bus = Mcp2515::new(spi, cs, Mcp2515Config::from(&config.bus));

    // Bar-graph: 10 segment rows (GPIO6-15), 2 column enables (GPIO16-17)
    let rows = [
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_7, Level::Low),
        Output::new(p.PIN_8, Level::Low),
        Output::new(p.PIN_9, Level::Low),
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_12, Level::Low),
        Output::new(p.PIN_13, Level::Low),
        Output::new(p.PIN_14, Level::Low),
        Output::new(p.PIN_15, Level::Low),
    ];
    let cols = [
        Output::new(p.PIN_16, Level::Low),
        Output::new(p.PIN_17, Level::Low),
    ];
    let display = MatrixBar::new(rows, cols, BarConfig::default());

    // Status LED (Pico on-board LED)
    let indicator = StatusLed::new_active_high(Output::new(p.PIN_25, Level::Low));

    let hw = Peripherals {
        bus,
        timers: EmbassyTimers,
        display,
        indicator,
        wake: PinWake,
        power: CortexPower,
        delay: Delay,
    };
    let mut controller = Controller::new(&SHARED, config, hw);

    info!("Entering control loop");
    let mut last = controller.state();

    loop {
        let state = controller.dispatch();
        if state == last {
            continue;
        }

        info!("State: {} -> {}", last, state);
        if state.is_error() {
            if let Some(e) = controller.setup_error() {
                error!("Setup failed: {}", Debug2Format(e));
            }
        }
        if matches!(last, SystemState::SleepDetected | SystemState::WakeUp) {
            if let Some(e) = controller.bus_fault() {
                warn!("Bus link fault: {}", Debug2Format(e));
            }
        }
        if last == SystemState::SleepDetected || state == SystemState::Running {
            debug!("Frames seen: {}", controller.frames_seen());
        }
        last = state;
    }
}
