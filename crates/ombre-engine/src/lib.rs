//! Ombre engine crate.
//!
//! Renders multi-stop color gradients as background images. Two paths share
//! one color model and descriptor:
//!
//! - `raster`: deterministic CPU compositing (linear, radial, blotchy) with
//!   film grain and PNG export
//! - `render`: an animated two-pass wgpu pipeline (procedural gradient, then
//!   grain) driven once per frame by `window`/`core`

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod paint;
pub mod raster;
pub mod render;

pub use error::{Error, Result};
