//! Multiplexed bar-graph over GPIO
//!
//! `ROWS` segment lines are shared by `COLS` column enables. A value is
//! shown as a bar: `0..=max_value` maps linearly onto `0..=ROWS` lit
//! segments starting at row 0. Values above `max_value` (the "no object"
//! sentinel included) saturate.
//!
//! With `reverse` set, near objects light more segments, the usual choice
//! for park-distance warnings.

use embedded_hal::digital::OutputPin;
use pdc_core::traits::BarDisplay;

/// Bar-graph encoding and wiring options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BarConfig {
    /// Value that lights every segment (before reversal)
    pub max_value: u8,
    /// Light more segments for smaller values
    pub reverse: bool,
    /// Invert the segment pattern
    pub inverted: bool,
    /// Column enables are active-low
    pub column_active_low: bool,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            max_value: 254,
            reverse: true,
            inverted: false,
            column_active_low: false,
        }
    }
}

/// Bar-graph display with `ROWS` segments and `COLS` columns
pub struct MatrixBar<P, const ROWS: usize, const COLS: usize> {
    rows: [P; ROWS],
    cols: [P; COLS],
    config: BarConfig,
    /// Segment pattern currently driven on the rows
    pattern: u32,
}

impl<P: OutputPin, const ROWS: usize, const COLS: usize> MatrixBar<P, ROWS, COLS> {
    /// Create a display; all segments and columns start off
    pub fn new(rows: [P; ROWS], cols: [P; COLS], config: BarConfig) -> Self {
        let mut bar = Self {
            rows,
            cols,
            config,
            pattern: 0,
        };
        bar.clear();
        bar
    }

    /// Segment pattern for a value, bit `n` = row `n` lit
    pub fn encode(&self, value: u8) -> u32 {
        let rows = ROWS.min(31) as u32;
        let max = self.config.max_value.max(1) as u32;
        let mut lit = (value as u32).min(max) * rows / max;
        if self.config.reverse {
            lit = rows - lit;
        }

        let full = (1u32 << rows) - 1;
        let pattern = (1u32 << lit) - 1;
        if self.config.inverted {
            !pattern & full
        } else {
            pattern
        }
    }

    /// Pattern currently on the rows
    pub fn pattern(&self) -> u32 {
        self.pattern
    }

    fn drive_rows(&mut self, pattern: u32) {
        self.pattern = pattern;
        for (i, pin) in self.rows.iter_mut().enumerate() {
            if pattern & (1 << i) != 0 {
                pin.set_high().ok();
            } else {
                pin.set_low().ok();
            }
        }
    }

    fn drive_column(&mut self, column: usize, active: bool) {
        let active_low = self.config.column_active_low;
        if let Some(pin) = self.cols.get_mut(column) {
            if active != active_low {
                pin.set_high().ok();
            } else {
                pin.set_low().ok();
            }
        }
    }
}

impl<P: OutputPin, const ROWS: usize, const COLS: usize> BarDisplay for MatrixBar<P, ROWS, COLS> {
    fn column_count(&self) -> usize {
        COLS
    }

    fn clear(&mut self) {
        for column in 0..COLS {
            self.drive_column(column, false);
        }
        self.drive_rows(0);
    }

    fn clear_column(&mut self, column: usize) {
        self.drive_column(column, false);
    }

    fn set_value(&mut self, _column: usize, value: u8) {
        let pattern = self.encode(value);
        self.drive_rows(pattern);
    }

    fn select_column(&mut self, column: usize) {
        self.drive_column(column, true);
    }
}
