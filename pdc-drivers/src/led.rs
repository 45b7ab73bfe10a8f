//! Status LED
//!
//! Drives the indicator through a GPIO pin. The pin can be wired
//! active-high (default) or active-low.

use embedded_hal::digital::OutputPin;
use pdc_core::traits::Indicator;

/// Status LED on a GPIO pin
pub struct StatusLed<P> {
    pin: P,
    /// If true, LED on = pin low
    active_low: bool,
    /// Current logical state
    on: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Create a new LED, initially off
    pub fn new(pin: P, active_low: bool) -> Self {
        let mut led = Self {
            pin,
            active_low,
            on: false,
        };
        led.set(false);
        led
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Set the logical state
    pub fn set(&mut self, on: bool) {
        self.on = on;
        if on != self.active_low {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl<P: OutputPin> Indicator for StatusLed<P> {
    fn on(&mut self) {
        self.set(true);
    }

    fn off(&mut self) {
        self.set(false);
    }

    fn toggle(&mut self) {
        self.set(!self.on);
    }
}
