//! Display multiplexer
//!
//! Each refresh trigger moves the display to the next column and latches
//! that side's reading. Cycling fast enough makes all sides appear lit at
//! once.

use crate::readings::DistanceReadings;
use crate::traits::BarDisplay;

/// Round-robin column driver
#[derive(Debug)]
pub struct Multiplexer {
    cursor: usize,
    columns: usize,
}

impl Multiplexer {
    /// Create a multiplexer over `columns` columns, cursor at 0
    pub const fn new(columns: usize) -> Self {
        Self { cursor: 0, columns }
    }

    /// Currently active column
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Perform one multiplex step
    pub fn step<D: BarDisplay>(&mut self, display: &mut D, readings: &DistanceReadings) {
        if self.columns == 0 {
            return;
        }

        display.clear_column(self.cursor);
        self.cursor = (self.cursor + 1) % self.columns;
        display.set_value(self.cursor, readings.get(self.cursor));
        display.select_column(self.cursor);
    }
}
