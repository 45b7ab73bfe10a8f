//! Shared statics between interrupt-priority tasks and the control loop
//!
//! The control loop runs in thread mode; the timer and wake tasks run on an
//! interrupt executor and preempt it. Everything here is safe to touch from
//! either side.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::AtomicBool;

use pdc_core::traits::TimerCommand;
use pdc_core::SharedState;

/// System state and refresh trigger
pub static SHARED: SharedState = SharedState::new();

/// Commands for the idle countdown
pub static IDLE_CMD: Signal<CriticalSectionRawMutex, TimerCommand> = Signal::new();

/// Commands for the refresh ticker
pub static REFRESH_CMD: Signal<CriticalSectionRawMutex, TimerCommand> = Signal::new();

/// Wake task should start watching the wake pin
pub static WAKE_ARM: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Wake pin edges count only while armed
pub static WAKE_ARMED: AtomicBool = AtomicBool::new(false);

/// Set by the wake task, consumed by the low-power wait
pub static WOKEN: AtomicBool = AtomicBool::new(false);
