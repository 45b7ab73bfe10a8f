//! State machine definition
//!
//! Every handler of the control loop is a function of the current state.
//! The transition table below is the only place the next state is decided.

use super::events::Event;

/// System states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SystemState {
    /// Power-on configuration of all collaborators
    Init = 0,
    /// Normal operation: bus polling and display multiplexing
    Running = 1,
    /// Idle timeout seen; shutting peripherals down
    SleepDetected = 2,
    /// Low-power wait for bus activity
    Sleeping = 3,
    /// Bus activity seen; bringing peripherals back
    WakeUp = 4,
    /// Unrecoverable setup failure; indicator blinks until reset
    Error = 5,
}

impl SystemState {
    /// Decode a raw state value
    ///
    /// Values outside the enumeration decode to `Error`.
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => SystemState::Init,
            1 => SystemState::Running,
            2 => SystemState::SleepDetected,
            3 => SystemState::Sleeping,
            4 => SystemState::WakeUp,
            _ => SystemState::Error,
        }
    }

    /// Raw state value
    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// Check if this is the error sink
    pub fn is_error(&self) -> bool {
        matches!(self, SystemState::Error)
    }

    /// Process an event and return the next state
    ///
    /// Pairs not listed keep the current state.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use SystemState::*;

        match (self, event) {
            // Init transitions
            (Init, SetupSucceeded) => Running,
            (Init, SetupFailed) => Error,

            // Running transitions
            (Running, IdleTimeout) => SleepDetected,

            // Sleep cycle
            (SleepDetected, ShutdownComplete) => Sleeping,
            (Sleeping, WakeSignal) => WakeUp,
            (WakeUp, ResumeComplete) => Running,

            // Error is a sink
            (Error, _) => Error,

            // Default: stay in current state
            _ => self,
        }
    }
}
