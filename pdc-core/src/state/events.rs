//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Lifecycle events
    /// All collaborators configured
    SetupSucceeded,
    /// Bus or configuration setup failed
    SetupFailed,

    // Power events
    /// No bus traffic for the idle period (raised from interrupt context)
    IdleTimeout,
    /// Timers stopped, display blank, transceiver asleep
    ShutdownComplete,
    /// Low-power wait ended by the wake source
    WakeSignal,
    /// Transceiver and timers running again
    ResumeComplete,
}
