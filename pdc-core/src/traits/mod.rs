//! Hardware abstraction traits
//!
//! These traits define the interface between the control logic and the
//! board-specific collaborators.

pub mod bus;
pub mod display;
pub mod power;
pub mod timer;

pub use bus::{BusLink, IdFilter};
pub use display::BarDisplay;
pub use power::{Indicator, PowerControl, WakeSource};
pub use timer::{TimerCommand, TimerId, TimingSource};
