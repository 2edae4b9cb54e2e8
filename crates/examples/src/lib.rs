//! Example screens used by tinyui demos.

/// The sample screen.
pub mod sample;
