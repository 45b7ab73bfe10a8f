//! Control loop coordinating the state machine and its collaborators
//!
//! The controller:
//! - Configures all collaborators at Init
//! - Polls the bus and feeds the value store while Running
//! - Drives the display multiplexer on refresh triggers
//! - Sequences sleep entry, low-power wait and wake-up
//! - Blinks the indicator forever once in Error
//!
//! `dispatch` never blocks except inside the Sleeping handler (low-power
//! wait) and the Error handler (blink delay).

use embedded_hal::delay::DelayNs;
use pdc_protocol::Id;

use crate::activity::ActivityMonitor;
use crate::config::{ConfigError, PdcConfig};
use crate::message::{apply_frame, FrameOutcome};
use crate::multiplex::Multiplexer;
use crate::readings::DistanceReadings;
use crate::state::{Event, SharedState, SystemState};
use crate::traits::{
    BarDisplay, BusLink, Indicator, PowerControl, TimerId, TimingSource, WakeSource,
};

/// Reasons the Init handler routes to Error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError<E> {
    /// Configuration rejected by validation
    Config(ConfigError),
    /// Configured sides do not match the display columns
    ColumnMismatch { sides: usize, columns: usize },
    /// Bus link failed to initialize or accept its filter
    Bus(E),
}

impl<E> From<ConfigError> for SetupError<E> {
    fn from(e: ConfigError) -> Self {
        SetupError::Config(e)
    }
}

/// Collaborators the controller drives
pub struct Peripherals<B, T, D, L, W, P, Y> {
    pub bus: B,
    pub timers: T,
    pub display: D,
    pub indicator: L,
    pub wake: W,
    pub power: P,
    /// Blocking delay for the error blink
    pub delay: Y,
}

/// The control loop
pub struct Controller<'a, B: BusLink, T, D, L, W, P, Y> {
    shared: &'a SharedState,
    config: PdcConfig,
    hw: Peripherals<B, T, D, L, W, P, Y>,
    readings: DistanceReadings,
    mux: Multiplexer,
    activity: ActivityMonitor,
    /// Identifier resolved at Init
    pdc_id: Option<Id>,
    setup_error: Option<SetupError<B::Error>>,
    /// Last transceiver sleep/wake failure, cleared by the next success
    bus_fault: Option<B::Error>,
    last_outcome: Option<FrameOutcome>,
}

impl<'a, B, T, D, L, W, P, Y> Controller<'a, B, T, D, L, W, P, Y>
where
    B: BusLink,
    T: TimingSource,
    D: BarDisplay,
    L: Indicator,
    W: WakeSource,
    P: PowerControl,
    Y: DelayNs,
{
    /// Create a controller; nothing is touched until the first dispatch
    pub fn new(
        shared: &'a SharedState,
        config: PdcConfig,
        hw: Peripherals<B, T, D, L, W, P, Y>,
    ) -> Self {
        let sides = config.side_count();
        let columns = hw.display.column_count();
        Self {
            shared,
            config,
            hw,
            readings: DistanceReadings::new(sides),
            mux: Multiplexer::new(columns),
            activity: ActivityMonitor::new(),
            pdc_id: None,
            setup_error: None,
            bus_fault: None,
            last_outcome: None,
        }
    }

    /// Run the handler for the current state once
    ///
    /// Returns the state after the handler's request was applied. If an
    /// interrupt changed the state while the handler ran, the interrupt's
    /// state is kept.
    pub fn dispatch(&mut self) -> SystemState {
        let current = self.shared.state();

        let request = match current {
            SystemState::Init => Some(self.init()),
            SystemState::Running => {
                self.run();
                None
            }
            SystemState::SleepDetected => Some(self.shutdown()),
            SystemState::Sleeping => Some(self.sleep()),
            SystemState::WakeUp => Some(self.resume()),
            SystemState::Error => {
                self.blink();
                None
            }
        };

        match request {
            Some(event) => self.shared.state.advance(current, event),
            None => self.shared.state(),
        }
    }

    /// Current state
    pub fn state(&self) -> SystemState {
        self.shared.state()
    }

    /// Why Init failed, if it did
    pub fn setup_error(&self) -> Option<&SetupError<B::Error>> {
        self.setup_error.as_ref()
    }

    /// Transceiver error from the most recent sleep or wake
    ///
    /// The power cycle carries on regardless.
    pub fn bus_fault(&self) -> Option<&B::Error> {
        self.bus_fault.as_ref()
    }

    /// Outcome of the most recent frame handled
    pub fn last_outcome(&self) -> Option<FrameOutcome> {
        self.last_outcome
    }

    pub fn readings(&self) -> &DistanceReadings {
        &self.readings
    }

    pub fn cursor(&self) -> usize {
        self.mux.cursor()
    }

    /// Frames received since boot
    pub fn frames_seen(&self) -> u32 {
        self.activity.frames()
    }

    pub fn config(&self) -> &PdcConfig {
        &self.config
    }

    pub fn peripherals(&self) -> &Peripherals<B, T, D, L, W, P, Y> {
        &self.hw
    }

    pub fn peripherals_mut(&mut self) -> &mut Peripherals<B, T, D, L, W, P, Y> {
        &mut self.hw
    }

    fn init(&mut self) -> Event {
        self.hw.timers.start(TimerId::Idle);
        self.hw.timers.start(TimerId::Refresh);
        self.hw.display.clear();
        self.hw.indicator.on();
        self.hw.wake.configure_trigger();

        match self.setup() {
            Ok(()) => Event::SetupSucceeded,
            Err(e) => {
                self.setup_error = Some(e);
                Event::SetupFailed
            }
        }
    }

    fn setup(&mut self) -> Result<(), SetupError<B::Error>> {
        self.config.validate()?;

        let sides = self.config.side_count();
        let columns = self.hw.display.column_count();
        if sides != columns {
            return Err(SetupError::ColumnMismatch { sides, columns });
        }

        let filter = self.config.bus.filter()?;
        self.pdc_id = Some(filter.id);

        if self.config.uses_bus() {
            self.hw.bus.init().map_err(SetupError::Bus)?;
            self.hw.bus.configure_filters(&filter).map_err(SetupError::Bus)?;
        }
        Ok(())
    }

    fn run(&mut self) {
        if self.config.uses_bus() {
            if let Some(frame) = self.hw.bus.try_receive() {
                self.activity.record_frame(&mut self.hw.timers);
                if let Some(id) = self.pdc_id {
                    let sides = &self.config.sides;
                    self.last_outcome =
                        Some(apply_frame(&frame, id, sides, &mut self.readings));
                }
            }
        } else {
            self.activity.hold_off(&mut self.hw.timers);
        }

        if self.shared.take_refresh() {
            self.mux.step(&mut self.hw.display, &self.readings);
        }
    }

    fn shutdown(&mut self) -> Event {
        self.hw.timers.stop(TimerId::Idle);
        self.hw.timers.stop(TimerId::Refresh);
        self.hw.display.clear();
        self.hw.indicator.off();
        self.readings.reset();
        if self.config.uses_bus() {
            self.bus_fault = self.hw.bus.sleep().err();
        }
        Event::ShutdownComplete
    }

    fn sleep(&mut self) -> Event {
        self.hw.power.disable_interrupts();
        self.shared.refresh.clear();
        self.hw.wake.arm();
        self.hw.power.enter_low_power();
        self.hw.wake.disarm();
        self.hw.power.enable_interrupts();
        Event::WakeSignal
    }

    fn resume(&mut self) -> Event {
        if self.config.uses_bus() {
            self.bus_fault = self.hw.bus.wake().err();
        }
        self.hw.timers.restart(TimerId::Idle);
        self.hw.timers.restart(TimerId::Refresh);
        self.hw.indicator.on();
        Event::ResumeComplete
    }

    fn blink(&mut self) {
        self.hw.indicator.toggle();
        self.hw.delay.delay_ms(self.config.timing.error_blink_ms);
    }
}
