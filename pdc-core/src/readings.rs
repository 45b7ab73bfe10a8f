//! Distance value store
//!
//! One reading per display side. Written by bus message handling, read by
//! the display multiplexer. Main-loop only.

use heapless::Vec;
use pdc_protocol::NO_OBJECT;

use crate::config::MAX_SIDES;

/// Latest distance per side, `NO_OBJECT` when nothing is known
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DistanceReadings {
    values: Vec<u8, MAX_SIDES>,
}

impl DistanceReadings {
    /// Create a store for `sides` sides, all at the sentinel
    ///
    /// `sides` is capped at [`MAX_SIDES`].
    pub fn new(sides: usize) -> Self {
        let mut values = Vec::new();
        for _ in 0..sides.min(MAX_SIDES) {
            let _ = values.push(NO_OBJECT);
        }
        Self { values }
    }

    /// Reading for a side, `NO_OBJECT` if the side does not exist
    pub fn get(&self, side: usize) -> u8 {
        self.values.get(side).copied().unwrap_or(NO_OBJECT)
    }

    /// Store a reading; out-of-range sides are ignored
    pub fn set(&mut self, side: usize, value: u8) {
        if let Some(slot) = self.values.get_mut(side) {
            *slot = value;
        }
    }

    /// Forget all readings
    pub fn reset(&mut self) {
        self.values.iter_mut().for_each(|v| *v = NO_OBJECT);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }
}
