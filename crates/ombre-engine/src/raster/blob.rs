use std::f32::consts::PI;

use rand::Rng;

use crate::coords::Vec2;
use crate::geometry::direction;
use crate::paint::{Color, EllipticalGradient, GradientStop, Paint, Rgb};

use super::{uniform, Canvas};

/// Layered radial-blob blending ("blotchy" mode).
///
/// Stop 0 is laid down as an opaque base; every later stop contributes a
/// cloud of soft elliptical blobs biased toward its band along the gradient
/// axis. `blotchiness` trades diffuse, wide blobs (0) for fewer, tighter,
/// more distinct ones (1).
///
/// Output is a pure function of the inputs and the RNG stream.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BlobCompositor {
    pub angle_degrees: f32,
    pub blotchiness: f32,
}

/// Per-stop parameters that only depend on blotchiness and target size.
#[derive(Debug, Copy, Clone, PartialEq)]
struct BlobBand {
    max_radius: f32,
    min_radius: f32,
    center_alpha: f32,
    mid_alpha: f32,
    jitter: f32,
}

impl BlobBand {
    fn new(blotchiness: f32, max_side: f32) -> Self {
        let soft = 1.0 - blotchiness;
        let max_radius = 0.6 * max_side * (0.8 + soft * 0.7);
        let center_alpha = 0.15 + soft * 0.25;
        Self {
            max_radius,
            min_radius: max_radius * (0.3 + blotchiness * 0.2),
            center_alpha,
            mid_alpha: center_alpha * 0.5 * (soft + 0.5),
            jitter: 0.4 * max_side * (1.0 + soft * 0.8),
        }
    }
}

impl BlobCompositor {
    pub fn new(angle_degrees: f32, blotchiness: f32) -> Self {
        Self { angle_degrees, blotchiness: blotchiness.clamp(0.0, 1.0) }
    }

    /// Number of blobs drawn for one stop.
    #[inline]
    fn blob_count<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let soft = 1.0 - self.blotchiness;
        5 + (soft * 10.0 + rng.random::<f32>() * 5.0).floor() as usize
    }

    /// Paints `colors` onto `canvas`. An empty color list leaves it untouched.
    pub fn composite<R: Rng + ?Sized>(&self, canvas: &mut Canvas, colors: &[Rgb], rng: &mut R) {
        let Some(&base) = colors.first() else { return };
        canvas.fill(&Paint::solid(Color::opaque(base)));

        let target = canvas.target();
        if colors.len() < 2 || target.is_empty() {
            return;
        }

        let max_side = target.max_side();
        let band = BlobBand::new(self.blotchiness, max_side);
        let center = target.center();
        let dir = direction(self.angle_degrees);
        let bands = (colors.len() - 1) as f32;

        for (i, &rgb) in colors.iter().enumerate().skip(1) {
            let count = self.blob_count(rng);
            log::trace!("blotchy: stop {i} {} -> {count} blobs", rgb.to_hex());

            for _ in 0..count {
                let progress = (i as f32 - 0.5 + rng.random::<f32>() * 0.5) / bands;
                let along = dir * ((progress - 0.5) * 0.6 * max_side);
                let jitter = Vec2::new(
                    uniform(rng, -band.jitter, band.jitter),
                    uniform(rng, -band.jitter, band.jitter),
                );

                let rx = uniform(rng, band.min_radius, band.max_radius);
                let ry = rx * uniform(rng, 0.7, 1.3);
                let rotation = uniform(rng, 0.0, PI);
                let mid = uniform(rng, 0.3, 0.5);

                canvas.draw_ellipse(&EllipticalGradient {
                    center: center + along + jitter,
                    rx,
                    ry,
                    rotation,
                    stops: vec![
                        GradientStop::new(0.0, rgb.with_alpha(band.center_alpha)),
                        GradientStop::new(mid, rgb.with_alpha(band.mid_alpha)),
                        GradientStop::new(1.0, Color::transparent()),
                    ],
                });
            }
        }
    }
}
