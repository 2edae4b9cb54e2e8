//! Geometry primitives used across tinyui.

/// Error types for geometry operations.
mod error;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;

pub use error::{Error, Result};
pub use point::Point;
pub use rect::Rect;
