//! Gradient geometry: turns style parameters and a target size into paint
//! coordinates.
//!
//! Angles follow CSS-style semantics shifted by 90°: the direction vector is
//! `(cos θ, sin θ)` with `θ = (angle - 90)°` in screen space (+Y down), so
//! 90° sweeps left to right and 180° sweeps top to bottom.

use std::f32::consts::PI;

use crate::coords::{OutputTarget, Vec2};
use crate::descriptor::{GradientStyle, RadialShape};
use crate::paint::{
    stop_offsets, Color, GradientStop, LinearGradient, Paint, RadialGradient, Rgb,
};

/// Direction angle in radians for a gradient angle in degrees.
#[inline]
pub fn angle_radians(angle_degrees: f32) -> f32 {
    (angle_degrees - 90.0) * (PI / 180.0)
}

/// Unit direction of the gradient axis.
#[inline]
pub fn direction(angle_degrees: f32) -> Vec2 {
    Vec2::from_angle(angle_radians(angle_degrees))
}

/// Endpoints of a linear gradient axis centered on the target.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearGeometry {
    pub start: Vec2,
    pub end: Vec2,
    /// Axis length `|end - start|`.
    pub span: f32,
}

/// Computes the linear axis for `angle_degrees`.
///
/// The span is the length of the target rectangle projected onto the axis, so
/// the first and last stops land exactly on the extreme corners for every
/// angle and no corner falls outside the gradient.
pub fn linear(target: OutputTarget, angle_degrees: f32) -> LinearGeometry {
    let dir = direction(angle_degrees);
    let (w, h) = (target.width as f32, target.height as f32);
    let span = (w * dir.x).abs() + (h * dir.y).abs();
    let center = target.center();
    let half = dir * (span / 2.0);
    LinearGeometry { start: center - half, end: center + half, span }
}

/// Center and radii of a radial gradient.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RadialGeometry {
    pub center: Vec2,
    pub r0: f32,
    pub r1: f32,
}

/// Circle: outer radius is half the shorter side. Ellipse: half the longer side
/// (a circular approximation, not a true elliptical falloff).
pub fn radial(target: OutputTarget, shape: RadialShape) -> RadialGeometry {
    let r1 = match shape {
        RadialShape::Circle => target.min_side() / 2.0,
        RadialShape::Ellipse => target.max_side() / 2.0,
    };
    RadialGeometry { center: target.center(), r0: 0.0, r1 }
}

/// Opaque stops evenly placed along the gradient parameter.
pub fn gradient_stops(colors: &[Rgb]) -> Vec<GradientStop> {
    colors
        .iter()
        .zip(stop_offsets(colors.len()))
        .map(|(c, t)| GradientStop::new(t, Color::opaque(*c)))
        .collect()
}

/// Builds the base paint for `style`.
///
/// Returns `None` when there is nothing to draw (no colors). A single color is
/// a uniform fill; no gradient is constructed. Blotchy styles get a solid fill
/// of the first color, which is the base layer the blob compositor draws over.
pub fn base_paint(target: OutputTarget, colors: &[Rgb], style: GradientStyle) -> Option<Paint> {
    let first = colors.first()?;
    if colors.len() == 1 {
        return Some(Paint::solid(Color::opaque(*first)));
    }

    let stops = gradient_stops(colors);
    let paint = match style {
        GradientStyle::Linear { angle_degrees } => {
            let g = linear(target, angle_degrees);
            Paint::Linear(LinearGradient::new(g.start, g.end, stops))
        }
        GradientStyle::Radial { shape } => {
            let g = radial(target, shape);
            Paint::Radial(RadialGradient::new(g.center, g.r0, g.r1, stops))
        }
        GradientStyle::Blotchy { .. } => Paint::solid(Color::opaque(*first)),
    };
    Some(paint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn corners(t: OutputTarget) -> [Vec2; 4] {
        let (w, h) = (t.width as f32, t.height as f32);
        [Vec2::new(0.0, 0.0), Vec2::new(w, 0.0), Vec2::new(0.0, h), Vec2::new(w, h)]
    }

    // ── linear ────────────────────────────────────────────────────────────

    #[test]
    fn angle_90_sweeps_left_to_right() {
        let g = linear(OutputTarget::new(4, 4), 90.0);
        assert!(approx(g.start.x, 0.0) && approx(g.start.y, 2.0));
        assert!(approx(g.end.x, 4.0) && approx(g.end.y, 2.0));
        assert!(approx(g.span, 4.0));
    }

    #[test]
    fn angle_180_sweeps_top_to_bottom() {
        let g = linear(OutputTarget::new(300, 100), 180.0);
        assert!(approx(g.start.y, 0.0) && approx(g.end.y, 100.0));
        assert!(approx(g.start.x, 150.0) && approx(g.end.x, 150.0));
    }

    #[test]
    fn axis_covers_every_corner_for_all_angles() {
        let sizes = [(1, 1), (4, 4), (1920, 1080), (1080, 1920), (7, 300)];
        for (w, h) in sizes {
            let target = OutputTarget::new(w, h);
            for deg in 0..360 {
                let g = linear(target, deg as f32);
                let axis = g.end - g.start;
                let len_sq = axis.dot(axis);
                for c in corners(target) {
                    let t = (c - g.start).dot(axis) / len_sq;
                    assert!(
                        (-1e-4..=1.0 + 1e-4).contains(&t),
                        "{w}x{h} @ {deg}°: corner {c:?} projects to {t}"
                    );
                }
            }
        }
    }

    #[test]
    fn square_span_never_shorter_than_side() {
        // Only squares here: for non-square targets `L >= max(w, h)` does not
        // hold along the short side, and full coverage is checked by
        // `axis_covers_every_corner_for_all_angles` instead.
        for side in [1u32, 4, 100, 1024] {
            let target = OutputTarget::new(side, side);
            for deg in 0..360 {
                assert!(linear(target, deg as f32).span >= side as f32 - 1e-3);
            }
        }
    }

    #[test]
    fn span_follows_the_side_the_axis_runs_along() {
        let target = OutputTarget::new(1920, 1080);
        assert!(approx(linear(target, 0.0).span, 1080.0));
        assert!(approx(linear(target, 90.0).span, 1920.0));
        assert!(approx(linear(target, 180.0).span, 1080.0));
    }

    #[test]
    fn diagonal_span_matches_projection() {
        // 45° off-axis on a square: span = side * sqrt(2)
        let g = linear(OutputTarget::new(100, 100), 135.0);
        assert!(approx(g.span, 100.0 * 2f32.sqrt()));
    }

    // ── radial ────────────────────────────────────────────────────────────

    #[test]
    fn circle_uses_shorter_side() {
        let g = radial(OutputTarget::new(200, 100), RadialShape::Circle);
        assert_eq!(g.center, Vec2::new(100.0, 50.0));
        assert_eq!(g.r0, 0.0);
        assert_eq!(g.r1, 50.0);
    }

    #[test]
    fn ellipse_uses_longer_side() {
        let g = radial(OutputTarget::new(200, 100), RadialShape::Ellipse);
        assert_eq!(g.r1, 100.0);
    }

    // ── base_paint ────────────────────────────────────────────────────────

    #[test]
    fn single_color_is_a_solid_fill() {
        let red = Rgb::new(255, 0, 0);
        let paint = base_paint(
            OutputTarget::new(8, 8),
            &[red],
            GradientStyle::Linear { angle_degrees: 45.0 },
        );
        assert_eq!(paint, Some(Paint::solid(Color::opaque(red))));
    }

    #[test]
    fn no_colors_is_nothing() {
        let style = GradientStyle::Radial { shape: RadialShape::Circle };
        assert_eq!(base_paint(OutputTarget::new(8, 8), &[], style), None);
    }
}
