use crate::coords::Vec2;

use super::Color;

/// A color bound to a position along the gradient parameter.
///
/// Renderers assume stops are sorted by `t` (non-decreasing), which
/// [`stop_offsets`] guarantees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GradientStop {
    pub t: f32,
    pub color: Color,
}

impl GradientStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Evenly spaced stop positions: stop `i` of `n` sits at `min(i / (n - 1), 1)`.
///
/// `n == 1` yields `[0.0]` (uniform fill); `n == 0` yields nothing.
pub fn stop_offsets(n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = 1.0 / (n - 1) as f32;
            (0..n).map(|i| (i as f32 * step).min(1.0)).collect()
        }
    }
}

/// Samples sorted stops at `t`, clamping outside the covered range (pad spread).
pub fn sample_stops(stops: &[GradientStop], t: f32) -> Color {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Color::transparent();
    };

    if t <= first.t {
        return first.color;
    }
    if t >= last.t {
        return last.color;
    }

    for pair in stops.windows(2) {
        let (s0, s1) = (pair[0], pair[1]);
        if t <= s1.t {
            let span = s1.t - s0.t;
            if span <= f32::EPSILON {
                return s1.color;
            }
            return s0.color.lerp(s1.color, (t - s0.t) / span);
        }
    }

    last.color
}

/// Linear gradient along the segment `start -> end` in output pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, stops: Vec<GradientStop>) -> Self {
        Self { start, end, stops }
    }

    /// Gradient parameter of `p`: its projection onto the axis, in `[0, 1]`.
    #[inline]
    pub fn param_at(&self, p: Vec2) -> f32 {
        let axis = self.end - self.start;
        let len_sq = axis.dot(axis);
        if len_sq <= f32::EPSILON {
            return 0.0;
        }
        ((p - self.start).dot(axis) / len_sq).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn color_at(&self, p: Vec2) -> Color {
        sample_stops(&self.stops, self.param_at(p))
    }
}

/// Concentric radial gradient between radii `r0` and `r1`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub r0: f32,
    pub r1: f32,
    pub stops: Vec<GradientStop>,
}

impl RadialGradient {
    pub fn new(center: Vec2, r0: f32, r1: f32, stops: Vec<GradientStop>) -> Self {
        Self { center, r0, r1, stops }
    }

    #[inline]
    pub fn param_at(&self, p: Vec2) -> f32 {
        let span = self.r1 - self.r0;
        if span <= f32::EPSILON {
            return 1.0;
        }
        (((p - self.center).length() - self.r0) / span).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn color_at(&self, p: Vec2) -> Color {
        sample_stops(&self.stops, self.param_at(p))
    }
}

/// Radial gradient stretched over a rotated ellipse, used for blotchy blobs.
///
/// The parameter is the normalized elliptical distance from the center; points
/// outside the ellipse (`t > 1`) are not painted at all.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipticalGradient {
    pub center: Vec2,
    pub rx: f32,
    pub ry: f32,
    /// Rotation of the `rx` axis in radians.
    pub rotation: f32,
    pub stops: Vec<GradientStop>,
}

impl EllipticalGradient {
    #[inline]
    pub fn param_at(&self, p: Vec2) -> f32 {
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return f32::INFINITY;
        }
        let local = (p - self.center).rotated(-self.rotation);
        Vec2::new(local.x / self.rx, local.y / self.ry).length()
    }

    /// Color at `p`, or `None` outside the ellipse.
    #[inline]
    pub fn color_at(&self, p: Vec2) -> Option<Color> {
        let t = self.param_at(p);
        (t <= 1.0).then(|| sample_stops(&self.stops, t))
    }

    /// Axis-aligned half extents of the rotated ellipse.
    pub fn half_extents(&self) -> Vec2 {
        let (s, c) = self.rotation.sin_cos();
        Vec2::new(
            ((self.rx * c).powi(2) + (self.ry * s).powi(2)).sqrt(),
            ((self.rx * s).powi(2) + (self.ry * c).powi(2)).sqrt(),
        )
    }
}
