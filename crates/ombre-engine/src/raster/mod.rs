//! CPU raster path: immediate-mode canvas, gradient fills, blotchy blobs,
//! film grain and PNG export.
//!
//! Everything here is synchronous and single-threaded. Randomness comes from
//! an explicit RNG passed to each compositor call.

mod blob;
mod canvas;
mod engine;
mod export;
mod grain;

pub use blob::BlobCompositor;
pub use canvas::Canvas;
pub use engine::{RasterConfig, RasterEngine};
pub use export::{encode_png, export_file_name, random_suffix};
pub use grain::{GrainCompositor, DEFAULT_GRAIN_INTENSITY};

use rand::Rng;

/// Uniform sample in `[lo, hi)`; returns `lo` for an empty or inverted range.
#[inline]
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo).max(0.0)
}
