//! Coordinate and size types shared by the raster and GPU paths.
//!
//! Canonical CPU space:
//! - Output (device) pixels
//! - Origin top-left
//! - +X right, +Y down

mod target;
mod vec2;

pub use target::{Orientation, OutputTarget};
pub use vec2::Vec2;
