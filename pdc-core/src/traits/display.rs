//! Multiplexed bar-graph display trait

/// Trait for the display collaborator
///
/// The display has one bar per column. Only one column is driven at a
/// time; the multiplexer cycles through them. How a value becomes lit
/// segments is up to the implementation.
pub trait BarDisplay {
    /// Number of columns
    fn column_count(&self) -> usize;

    /// Blank all segments and deselect all columns
    fn clear(&mut self);

    /// Deselect a column
    fn clear_column(&mut self, column: usize);

    /// Load a value into the segment outputs for a column
    fn set_value(&mut self, column: usize, value: u8);

    /// Enable a column's output
    fn select_column(&mut self, column: usize);
}
