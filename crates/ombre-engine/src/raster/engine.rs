use image::RgbaImage;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::descriptor::{GradientStyle, RenderDescriptor};
use crate::error::Result;
use crate::geometry;

use super::{BlobCompositor, Canvas, GrainCompositor, DEFAULT_GRAIN_INTENSITY};

/// Raster path configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterConfig {
    /// Grain amplitude at opacity 1, in 8-bit channel units.
    pub grain_base_intensity: f32,
    /// Fixed seed for reproducible output. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self { grain_base_intensity: DEFAULT_GRAIN_INTENSITY, seed: None }
    }
}

/// Synchronous raster renderer for previews and exports.
///
/// Holds only its RNG between calls; every `render` starts from a cleared
/// canvas. Not reentrant: one render at a time per engine.
#[derive(Debug)]
pub struct RasterEngine {
    grain: GrainCompositor,
    rng: StdRng,
}

impl RasterEngine {
    pub fn new(cfg: RasterConfig) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { grain: GrainCompositor::new(cfg.grain_base_intensity), rng }
    }

    /// Renders `desc` into a new image of exactly `target` pixels.
    ///
    /// Invalid numbers fail before anything is drawn. A zero-area target
    /// yields an empty image; an empty color list yields a transparent one.
    pub fn render(&mut self, desc: &RenderDescriptor) -> Result<RgbaImage> {
        let mut canvas = Canvas::new(desc.target);
        self.render_into(&mut canvas, desc)?;
        Ok(canvas.into_image())
    }

    /// Renders into an existing canvas, resizing nothing.
    ///
    /// The canvas keeps its own size; `desc.target` is ignored in favor of it,
    /// which is what a preview surface sized by device pixels wants.
    pub fn render_into(&mut self, canvas: &mut Canvas, desc: &RenderDescriptor) -> Result<()> {
        desc.validate()?;

        canvas.clear();
        let target = canvas.target();
        if target.is_empty() {
            log::debug!("raster: empty target {}x{}, nothing to draw", target.width, target.height);
            return Ok(());
        }

        match desc.style {
            GradientStyle::Blotchy { angle_degrees, blotchiness } => {
                BlobCompositor::new(angle_degrees, blotchiness).composite(
                    canvas,
                    &desc.colors,
                    &mut self.rng,
                );
            }
            style => {
                if let Some(paint) = geometry::base_paint(target, &desc.colors, style) {
                    canvas.fill(&paint);
                }
            }
        }

        self.grain.apply(canvas.pixels_mut(), desc.grain, &mut self.rng);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::OutputTarget;
    use crate::descriptor::{GrainSettings, RadialShape};
    use crate::paint::Rgb;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    fn engine() -> RasterEngine {
        RasterEngine::new(RasterConfig { seed: Some(11), ..Default::default() })
    }

    // ── scenarios ─────────────────────────────────────────────────────────

    #[test]
    fn linear_90_sweeps_columns_red_to_blue() {
        let desc = RenderDescriptor::new(
            OutputTarget::new(4, 4),
            vec![RED, BLUE],
            GradientStyle::Linear { angle_degrees: 90.0 },
        );
        let img = engine().render(&desc).unwrap();
        assert_eq!(img.dimensions(), (4, 4));

        for y in 1..4 {
            for x in 0..4 {
                assert_eq!(img.get_pixel(x, y), img.get_pixel(x, 0), "row {y} differs at x={x}");
            }
        }
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);

        let reds: Vec<u8> = (0..4).map(|x| img.get_pixel(x, 0).0[0]).collect();
        let blues: Vec<u8> = (0..4).map(|x| img.get_pixel(x, 0).0[2]).collect();
        assert!(reds.windows(2).all(|w| w[0] > w[1]), "{reds:?}");
        assert!(blues.windows(2).all(|w| w[0] < w[1]), "{blues:?}");
        assert!(blues[3] > reds[3]);
    }

    #[test]
    fn radial_circle_hits_stops_exactly() {
        let desc = RenderDescriptor::new(
            OutputTarget::new(100, 100),
            vec![RED, BLUE],
            GradientStyle::Radial { shape: RadialShape::Circle },
        );
        let img = engine().render(&desc).unwrap();
        assert_eq!(img.get_pixel(50, 50).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(50, 0).0, [0, 0, 255, 255]);
        assert_eq!(img.get_pixel(0, 50).0, [0, 0, 255, 255]);
    }

    // ── degenerate input ──────────────────────────────────────────────────

    #[test]
    fn zero_area_target_is_an_empty_image() {
        let desc = RenderDescriptor::new(
            OutputTarget::new(0, 10),
            vec![RED, BLUE],
            GradientStyle::Linear { angle_degrees: 0.0 },
        )
        .with_grain(GrainSettings::new(1.0));
        let img = engine().render(&desc).unwrap();
        assert_eq!(img.dimensions(), (0, 10));
        assert!(img.is_empty());
    }

    #[test]
    fn no_colors_is_transparent() {
        let desc = RenderDescriptor::new(
            OutputTarget::new(3, 3),
            Vec::new(),
            GradientStyle::Radial { shape: RadialShape::Ellipse },
        );
        let img = engine().render(&desc).unwrap();
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn invalid_parameters_fail_closed() {
        let desc = RenderDescriptor::new(
            OutputTarget::new(3, 3),
            vec![RED, BLUE],
            GradientStyle::Blotchy { angle_degrees: 0.0, blotchiness: f32::NAN },
        );
        assert!(engine().render(&desc).is_err());
    }

    // ── variants ──────────────────────────────────────────────────────────

    #[test]
    fn blotchy_is_reproducible_with_a_seed() {
        let desc = RenderDescriptor::new(
            OutputTarget::new(40, 30),
            vec![RED, Rgb::new(0, 255, 0), BLUE],
            GradientStyle::Blotchy { angle_degrees: 120.0, blotchiness: 0.4 },
        )
        .with_grain(GrainSettings::new(0.5));
        assert_eq!(engine().render(&desc).unwrap(), engine().render(&desc).unwrap());
    }

    #[test]
    fn grain_perturbs_a_flat_fill() {
        let desc = RenderDescriptor::new(
            OutputTarget::new(16, 16),
            vec![Rgb::new(128, 128, 128)],
            GradientStyle::Linear { angle_degrees: 0.0 },
        );
        let clean = engine().render(&desc).unwrap();
        let grainy = engine().render(&desc.clone().with_grain(GrainSettings::new(1.0))).unwrap();
        assert_ne!(clean, grainy);
        assert!(grainy.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn render_into_keeps_canvas_size() {
        let desc = RenderDescriptor::new(
            OutputTarget::new(1920, 1080),
            vec![RED, BLUE],
            GradientStyle::Linear { angle_degrees: 90.0 },
        );
        let mut canvas = Canvas::new(OutputTarget::new(8, 6));
        engine().render_into(&mut canvas, &desc).unwrap();
        assert_eq!(canvas.target(), OutputTarget::new(8, 6));
        assert_eq!(canvas.pixel(0, 0), [255, 0, 0, 255]);
    }
}
