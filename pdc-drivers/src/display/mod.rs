//! Display drivers

pub mod matrixbar;

pub use matrixbar::{BarConfig, MatrixBar};
