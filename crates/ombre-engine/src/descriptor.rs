//! Typed input consumed by both render paths.
//!
//! The UI layer owns and edits these values; the engine only reads them.

use crate::coords::OutputTarget;
use crate::error::{Error, Result};
use crate::paint::{Palette, Rgb};

/// Radial falloff shape.
///
/// `Ellipse` is approximated by a circle sized to the longer axis; it does not
/// produce a true elliptical falloff.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum RadialShape {
    #[default]
    Circle,
    Ellipse,
}

/// The active gradient variant with the parameters it needs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GradientStyle {
    Linear { angle_degrees: f32 },
    Radial { shape: RadialShape },
    Blotchy { angle_degrees: f32, blotchiness: f32 },
}

/// Variant selector without parameters.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
    Blotchy,
}

/// Remembers the parameters of every variant so that switching kinds never
/// loses an edit (the angle survives Linear <-> Blotchy round trips).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StyleSettings {
    pub kind: GradientKind,
    pub angle_degrees: f32,
    pub radial_shape: RadialShape,
    pub blotchiness: f32,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            kind: GradientKind::Linear,
            angle_degrees: 90.0,
            radial_shape: RadialShape::Circle,
            blotchiness: 0.5,
        }
    }
}

impl StyleSettings {
    pub fn set_kind(&mut self, kind: GradientKind) {
        self.kind = kind;
    }

    pub fn style(&self) -> GradientStyle {
        match self.kind {
            GradientKind::Linear => GradientStyle::Linear { angle_degrees: self.angle_degrees },
            GradientKind::Radial => GradientStyle::Radial { shape: self.radial_shape },
            GradientKind::Blotchy => GradientStyle::Blotchy {
                angle_degrees: self.angle_degrees,
                blotchiness: self.blotchiness,
            },
        }
    }
}

/// Film grain overlay settings. Disabled or zero opacity is a no-op.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct GrainSettings {
    pub enabled: bool,
    pub opacity: f32,
}

impl GrainSettings {
    pub const OFF: GrainSettings = GrainSettings { enabled: false, opacity: 0.0 };

    #[inline]
    pub fn new(opacity: f32) -> Self {
        Self { enabled: true, opacity }
    }

    #[inline]
    pub fn is_active(self) -> bool {
        self.enabled && self.opacity > 0.0
    }
}

/// Everything one raster render needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDescriptor {
    pub target: OutputTarget,
    pub colors: Vec<Rgb>,
    pub style: GradientStyle,
    pub grain: GrainSettings,
}

impl RenderDescriptor {
    pub fn new(target: OutputTarget, colors: Vec<Rgb>, style: GradientStyle) -> Self {
        Self { target, colors, style, grain: GrainSettings::OFF }
    }

    /// Convenience constructor from an edited palette.
    pub fn from_palette(target: OutputTarget, palette: &Palette, style: GradientStyle) -> Self {
        Self::new(target, palette.colors(), style)
    }

    pub fn with_grain(mut self, grain: GrainSettings) -> Self {
        self.grain = grain;
        self
    }

    /// Fails closed on NaN, infinities and out-of-range numbers.
    ///
    /// Angles may be any finite value (they wrap); blotchiness and grain
    /// opacity must lie in `[0, 1]`. Stop count and target size are not
    /// checked here: degenerate values render as no-ops.
    pub fn validate(&self) -> Result<()> {
        match self.style {
            GradientStyle::Linear { angle_degrees } => finite("angle_degrees", angle_degrees)?,
            GradientStyle::Radial { .. } => {}
            GradientStyle::Blotchy { angle_degrees, blotchiness } => {
                finite("angle_degrees", angle_degrees)?;
                unit_range("blotchiness", blotchiness)?;
            }
        }
        unit_range("grain_opacity", self.grain.opacity)
    }
}

fn finite(name: &'static str, v: f32) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, reason: format!("must be finite, got {v}") })
    }
}

fn unit_range(name: &'static str, v: f32) -> Result<()> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, reason: format!("must lie in [0, 1], got {v}") })
    }
}
