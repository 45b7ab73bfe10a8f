//! Control state machine
//!
//! The system state is a single process-wide value. The main loop moves it
//! forward; the idle timer notification moves it asynchronously from
//! interrupt context. Both go through the same transition table.

pub mod cell;
pub mod events;
pub mod machine;

pub use cell::{PendingFlag, SharedState, StateCell};
pub use events::Event;
pub use machine::SystemState;
