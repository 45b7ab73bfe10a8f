//! Interrupt handoff cells
//!
//! These are the only values touched by both interrupt handlers and the
//! main loop. Everything else (readings, cursor, frames) stays owned by the
//! main loop.

use portable_atomic::{AtomicBool, AtomicU8, Ordering};

use super::events::Event;
use super::machine::SystemState;

/// Atomically replaceable system state
pub struct StateCell(AtomicU8);

impl StateCell {
    /// Create a cell holding `state`
    pub const fn new(state: SystemState) -> Self {
        Self(AtomicU8::new(state.as_raw()))
    }

    /// Current state
    pub fn load(&self) -> SystemState {
        SystemState::from_raw(self.0.load(Ordering::Acquire))
    }

    /// Apply `event` to whatever state is current
    ///
    /// Returns the state after the transition.
    pub fn apply(&self, event: Event) -> SystemState {
        let prev = match self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                Some(SystemState::from_raw(raw).transition(event).as_raw())
            }) {
            Ok(raw) | Err(raw) => raw,
        };
        SystemState::from_raw(prev).transition(event)
    }

    /// Apply `event` only if the state is still `from`
    ///
    /// If an interrupt moved the state since the caller read it, the
    /// interrupt's state is kept and returned.
    pub fn advance(&self, from: SystemState, event: Event) -> SystemState {
        let to = from.transition(event);
        match self.0.compare_exchange(
            from.as_raw(),
            to.as_raw(),
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => to,
            Err(current) => SystemState::from_raw(current),
        }
    }
}

/// Single-slot trigger
///
/// Raising an already raised flag is a no-op, so ticks that arrive before
/// the consumer runs collapse into one.
pub struct PendingFlag(AtomicBool);

impl PendingFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Test and clear
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for PendingFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// State shared between interrupt handlers and the control loop
///
/// Meant to live in a `static`. Interrupt handlers call the `on_*` methods
/// and nothing else.
pub struct SharedState {
    /// System state
    pub state: StateCell,
    /// Display refresh trigger
    pub refresh: PendingFlag,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            state: StateCell::new(SystemState::Init),
            refresh: PendingFlag::new(),
        }
    }

    /// Idle timer expired
    pub fn on_idle_timeout(&self) -> SystemState {
        self.state.apply(Event::IdleTimeout)
    }

    /// Refresh timer ticked
    pub fn on_refresh_tick(&self) {
        self.refresh.raise();
    }

    /// Wake source fired
    ///
    /// Nothing to record; the interrupt itself ends the low-power wait.
    pub fn on_wake_signal(&self) {}

    /// Current state
    pub fn state(&self) -> SystemState {
        self.state.load()
    }

    /// Consume a pending refresh trigger
    pub fn take_refresh(&self) -> bool {
        self.refresh.take()
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
