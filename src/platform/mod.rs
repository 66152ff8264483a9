//! Platform abstraction layer
//!
//! Maps screen positions to the logical canvas for pointer input

pub mod viewport;

pub use viewport::{Align, FitMode, Viewport};
