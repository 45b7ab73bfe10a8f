//! Embassy async tasks
//!
//! These run on the interrupt executor. They stand in for the hardware
//! timer and external interrupt handlers: each reports only through
//! [`SHARED`](crate::channels::SHARED) and the wake flags.

pub mod idle;
pub mod refresh;
pub mod wake;

pub use idle::idle_timer_task;
pub use refresh::refresh_timer_task;
pub use wake::wake_task;
