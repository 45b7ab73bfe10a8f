//! Recording mock collaborators shared by the integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use pdc_core::config::PdcConfig;
use pdc_core::traits::{
    BarDisplay, BusLink, IdFilter, Indicator, PowerControl, TimerId, TimingSource, WakeSource,
};
use pdc_core::{Controller, Peripherals, SharedState};
use pdc_protocol::{CanFrame, Frame, StandardId};

/// One collaborator call, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    TimerStart(TimerId),
    TimerStop(TimerId),
    TimerReset(TimerId),
    BusInit,
    BusFilter(IdFilter),
    BusSleep,
    BusWake,
    DisplayClear,
    ClearColumn(usize),
    SetValue(usize, u8),
    SelectColumn(usize),
    LedOn,
    LedOff,
    LedToggle,
    WakeConfigure,
    WakeArm,
    WakeDisarm,
    IrqDisable,
    IrqEnable,
    LowPower,
    DelayMs(u32),
}

pub type Log = Rc<RefCell<Vec<Call>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

pub struct MockBus {
    log: Log,
    pub frames: VecDeque<CanFrame>,
    pub fail_init: bool,
    pub fail_filter: bool,
    pub fail_sleep: bool,
    pub fail_wake: bool,
    /// Fire the idle timeout from inside `try_receive`, as an interrupt would
    pub timeout_during_receive: Option<&'static SharedState>,
}

fn outcome(fail: bool) -> Result<(), BusFault> {
    if fail {
        Err(BusFault)
    } else {
        Ok(())
    }
}

impl BusLink for MockBus {
    type Error = BusFault;

    fn init(&mut self) -> Result<(), BusFault> {
        self.log.borrow_mut().push(Call::BusInit);
        outcome(self.fail_init)
    }

    fn configure_filters(&mut self, filter: &IdFilter) -> Result<(), BusFault> {
        self.log.borrow_mut().push(Call::BusFilter(*filter));
        outcome(self.fail_filter)
    }

    fn try_receive(&mut self) -> Option<CanFrame> {
        if let Some(shared) = self.timeout_during_receive.take() {
            shared.on_idle_timeout();
        }
        self.frames.pop_front()
    }

    fn sleep(&mut self) -> Result<(), BusFault> {
        self.log.borrow_mut().push(Call::BusSleep);
        outcome(self.fail_sleep)
    }

    fn wake(&mut self) -> Result<(), BusFault> {
        self.log.borrow_mut().push(Call::BusWake);
        outcome(self.fail_wake)
    }
}

pub struct MockTimers {
    log: Log,
}

impl TimingSource for MockTimers {
    fn start(&mut self, timer: TimerId) {
        self.log.borrow_mut().push(Call::TimerStart(timer));
    }

    fn stop(&mut self, timer: TimerId) {
        self.log.borrow_mut().push(Call::TimerStop(timer));
    }

    fn reset(&mut self, timer: TimerId) {
        self.log.borrow_mut().push(Call::TimerReset(timer));
    }
}

pub struct MockDisplay {
    log: Log,
    pub columns: usize,
}

impl BarDisplay for MockDisplay {
    fn column_count(&self) -> usize {
        self.columns
    }

    fn clear(&mut self) {
        self.log.borrow_mut().push(Call::DisplayClear);
    }

    fn clear_column(&mut self, column: usize) {
        self.log.borrow_mut().push(Call::ClearColumn(column));
    }

    fn set_value(&mut self, column: usize, value: u8) {
        self.log.borrow_mut().push(Call::SetValue(column, value));
    }

    fn select_column(&mut self, column: usize) {
        self.log.borrow_mut().push(Call::SelectColumn(column));
    }
}

pub struct MockLed {
    log: Log,
}

impl Indicator for MockLed {
    fn on(&mut self) {
        self.log.borrow_mut().push(Call::LedOn);
    }

    fn off(&mut self) {
        self.log.borrow_mut().push(Call::LedOff);
    }

    fn toggle(&mut self) {
        self.log.borrow_mut().push(Call::LedToggle);
    }
}

pub struct MockWake {
    log: Log,
}

impl WakeSource for MockWake {
    fn configure_trigger(&mut self) {
        self.log.borrow_mut().push(Call::WakeConfigure);
    }

    fn arm(&mut self) {
        self.log.borrow_mut().push(Call::WakeArm);
    }

    fn disarm(&mut self) {
        self.log.borrow_mut().push(Call::WakeDisarm);
    }
}

pub struct MockPower {
    log: Log,
    shared: &'static SharedState,
}

impl PowerControl for MockPower {
    fn disable_interrupts(&mut self) {
        self.log.borrow_mut().push(Call::IrqDisable);
    }

    fn enable_interrupts(&mut self) {
        self.log.borrow_mut().push(Call::IrqEnable);
    }

    fn enter_low_power(&mut self) {
        self.log.borrow_mut().push(Call::LowPower);
        self.shared.on_wake_signal();
    }
}

pub struct MockDelay {
    log: Log,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Call::DelayMs(ms));
    }
}

pub type TestController = Controller<
    'static,
    MockBus,
    MockTimers,
    MockDisplay,
    MockLed,
    MockWake,
    MockPower,
    MockDelay,
>;

pub struct Harness {
    pub controller: TestController,
    pub shared: &'static SharedState,
    pub log: Log,
}

impl Harness {
    pub fn new(config: PdcConfig) -> Self {
        Self::with_columns(config, 2)
    }

    pub fn with_columns(config: PdcConfig, columns: usize) -> Self {
        let shared: &'static SharedState = Box::leak(Box::new(SharedState::new()));
        let log: Log = Rc::new(RefCell::new(Vec::new()));

        let hw = Peripherals {
            bus: MockBus {
                log: log.clone(),
                frames: VecDeque::new(),
                fail_init: false,
                fail_filter: false,
                fail_sleep: false,
                fail_wake: false,
                timeout_during_receive: None,
            },
            timers: MockTimers { log: log.clone() },
            display: MockDisplay {
                log: log.clone(),
                columns,
            },
            indicator: MockLed { log: log.clone() },
            wake: MockWake { log: log.clone() },
            power: MockPower {
                log: log.clone(),
                shared,
            },
            delay: MockDelay { log: log.clone() },
        };

        Self {
            controller: Controller::new(shared, config, hw),
            shared,
            log,
        }
    }

    /// Harness already past Init
    pub fn running() -> Self {
        let mut h = Self::new(PdcConfig::default());
        h.controller.dispatch();
        h.clear_log();
        h
    }

    pub fn bus(&mut self) -> &mut MockBus {
        &mut self.controller.peripherals_mut().bus
    }

    pub fn push_frame(&mut self, frame: CanFrame) {
        self.bus().frames.push_back(frame);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    pub fn count(&self, call: &Call) -> usize {
        self.log.borrow().iter().filter(|c| *c == call).count()
    }
}

pub fn pdc_frame(data: &[u8]) -> CanFrame {
    CanFrame::new(StandardId::new(0x54B).unwrap(), data).unwrap()
}

pub fn other_frame(raw: u16, data: &[u8]) -> CanFrame {
    CanFrame::new(StandardId::new(raw).unwrap(), data).unwrap()
}
