//! Countdown timer trait

/// The two countdowns the control loop relies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerId {
    /// Long countdown restarted by bus traffic; expiry means the bus is idle
    Idle,
    /// Short periodic tick driving display multiplexing
    Refresh,
}

/// Trait for the timer collaborator
///
/// Expiry is reported asynchronously through
/// [`SharedState`](crate::state::SharedState), not through this trait.
pub trait TimingSource {
    /// Start (or resume) counting
    fn start(&mut self, timer: TimerId);

    /// Stop counting; no notifications until started again
    fn stop(&mut self, timer: TimerId);

    /// Restart the countdown from zero without changing whether it runs
    fn reset(&mut self, timer: TimerId);

    /// Reset and start
    fn restart(&mut self, timer: TimerId) {
        self.reset(timer);
        self.start(timer);
    }
}

/// Command sent to a countdown driven by a separate task
///
/// Lets a [`TimingSource`] be implemented as message passing: the task
/// tracks whether it runs by folding every command it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerCommand {
    /// Run, counting from zero
    Start,
    /// Stop counting
    Stop,
    /// Count from zero, keep the run state
    Reset,
}

impl TimerCommand {
    /// Run state after this command
    pub fn apply(self, running: bool) -> bool {
        match self {
            TimerCommand::Start => true,
            TimerCommand::Stop => false,
            TimerCommand::Reset => running,
        }
    }
}
