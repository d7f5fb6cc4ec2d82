use crate::error::{Error, Result};

use super::Vec2;

/// Output orientation derived from the target's aspect.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// Output size in device pixels.
///
/// For the preview path this is the surface's backing buffer (CSS size times
/// device pixel ratio). For export it is whatever the caller asks for.
/// A zero dimension is representable; renderers treat it as a no-op.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct OutputTarget {
    pub width: u32,
    pub height: u32,
}

impl OutputTarget {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Sizes a backing buffer from a logical (CSS) size and a device pixel ratio.
    ///
    /// Rounds to the nearest pixel so a 0.5px logical edge does not blur on
    /// high-density displays.
    pub fn from_logical(width: f32, height: f32, device_pixel_ratio: f32) -> Result<Self> {
        if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "device_pixel_ratio",
                reason: format!("must be a positive finite number, got {device_pixel_ratio}"),
            });
        }
        for (name, v) in [("width", width), ("height", height)] {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidParameter {
                    name,
                    reason: format!("must be a non-negative finite number, got {v}"),
                });
            }
        }
        Ok(Self::new(
            (width * device_pixel_ratio).round() as u32,
            (height * device_pixel_ratio).round() as u32,
        ))
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    #[inline]
    pub fn min_side(self) -> f32 {
        self.width.min(self.height) as f32
    }

    #[inline]
    pub fn max_side(self) -> f32 {
        self.width.max(self.height) as f32
    }

    #[inline]
    pub fn swapped(self) -> Self {
        Self::new(self.height, self.width)
    }

    pub fn orientation(self) -> Orientation {
        if self.width >= self.height { Orientation::Landscape } else { Orientation::Portrait }
    }

    /// Returns the target with its sides swapped if needed to match `orientation`.
    pub fn with_orientation(self, orientation: Orientation) -> Self {
        if self.orientation() == orientation || self.width == self.height {
            self
        } else {
            self.swapped()
        }
    }
}
