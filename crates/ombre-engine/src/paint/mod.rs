//! Color model and paint sources.
//!
//! Scope:
//! - hex parsing/normalization and 8-bit <-> unit conversions
//! - premultiplied color for compositing
//! - gradient paints (linear, radial) and stop sampling
//! - the editable palette of color stops

pub mod color;
pub mod gradient;
pub mod palette;

pub use color::{hex_to_rgba, normalize_hex, Color, Rgb};
pub use gradient::{
    sample_stops, stop_offsets, EllipticalGradient, GradientStop, LinearGradient, RadialGradient,
};
pub use palette::{ColorStop, Palette, MAX_COLORS, MIN_COLORS};

/// Paint source for filling the whole target.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Paint {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Paint::Solid(color)
    }

    #[inline]
    pub fn color_at(&self, p: crate::coords::Vec2) -> Color {
        match self {
            Paint::Solid(c) => *c,
            Paint::Linear(g) => g.color_at(p),
            Paint::Radial(g) => g.color_at(p),
        }
    }
}
