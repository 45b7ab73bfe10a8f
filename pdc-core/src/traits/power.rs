//! Indicator, wake source and power control traits

/// Trait for the status indicator
pub trait Indicator {
    fn on(&mut self);
    fn off(&mut self);
    fn toggle(&mut self);
}

/// Trait for the external wake interrupt
///
/// The interrupt handler only calls
/// [`SharedState::on_wake_signal`](crate::state::SharedState::on_wake_signal).
pub trait WakeSource {
    /// Configure the trigger condition without enabling it
    fn configure_trigger(&mut self);

    /// Enable the wake interrupt
    fn arm(&mut self);

    /// Disable the wake interrupt
    fn disarm(&mut self);
}

/// Trait for global interrupt masking and low-power entry
pub trait PowerControl {
    fn disable_interrupts(&mut self);

    fn enable_interrupts(&mut self);

    /// Sleep until the wake source fires
    ///
    /// Called with interrupts disabled. Returns after a wake event with
    /// interrupts still disabled.
    fn enter_low_power(&mut self);
}
