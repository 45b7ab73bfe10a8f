//! RP2040 implementations of the core's timer, wake and power traits

use defmt::*;
use portable_atomic::Ordering;

use pdc_core::traits::{PowerControl, TimerCommand, TimerId, TimingSource, WakeSource};

use crate::channels::{IDLE_CMD, REFRESH_CMD, WAKE_ARM, WAKE_ARMED, WOKEN};

/// Timers backed by the idle and refresh tasks
pub struct EmbassyTimers;

impl EmbassyTimers {
    fn send(&self, timer: TimerId, cmd: TimerCommand) {
        match timer {
            TimerId::Idle => IDLE_CMD.signal(cmd),
            TimerId::Refresh => REFRESH_CMD.signal(cmd),
        }
    }
}

impl TimingSource for EmbassyTimers {
    fn start(&mut self, timer: TimerId) {
        self.send(timer, TimerCommand::Start);
    }

    fn stop(&mut self, timer: TimerId) {
        self.send(timer, TimerCommand::Stop);
    }

    fn reset(&mut self, timer: TimerId) {
        self.send(timer, TimerCommand::Reset);
    }

    fn restart(&mut self, timer: TimerId) {
        // Start already counts from zero
        self.send(timer, TimerCommand::Start);
    }
}

/// Wake source backed by the wake task
pub struct PinWake;

impl WakeSource for PinWake {
    fn configure_trigger(&mut self) {
        // Level-low on the controller's INT line, pull-up set at pin creation
        WAKE_ARMED.store(false, Ordering::Release);
        debug!("Wake trigger: INT low");
    }

    fn arm(&mut self) {
        WOKEN.store(false, Ordering::Release);
        WAKE_ARMED.store(true, Ordering::Release);
        WAKE_ARM.signal(());
    }

    fn disarm(&mut self) {
        WAKE_ARMED.store(false, Ordering::Release);
    }
}

/// Cortex-M0+ interrupt masking and sleep
pub struct CortexPower;

impl PowerControl for CortexPower {
    fn disable_interrupts(&mut self) {
        cortex_m::interrupt::disable();
    }

    fn enable_interrupts(&mut self) {
        // SAFETY: not called from inside a critical section
        unsafe { cortex_m::interrupt::enable() };
    }

    fn enter_low_power(&mut self) {
        // WFI wakes on a pending interrupt even while PRIMASK is set. The
        // window with interrupts enabled lets the executor run the tasks.
        while !WOKEN.swap(false, Ordering::AcqRel) {
            cortex_m::asm::wfi();
            self.enable_interrupts();
            cortex_m::asm::nop();
            self.disable_interrupts();
        }
    }
}
