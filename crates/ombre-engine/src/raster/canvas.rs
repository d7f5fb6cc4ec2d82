use image::{Rgba, RgbaImage};

use crate::coords::{OutputTarget, Vec2};
use crate::paint::{Color, EllipticalGradient, Paint};

/// Immediate-mode RGBA8 drawing surface (straight alpha).
///
/// Pixels are sampled at their integer lattice point `(x, y)`, so pixel
/// `(0, 0)` sits exactly on the gradient origin and a pixel `r` away from a
/// radial center evaluates exactly at radius `r`.
///
/// Not synchronized: callers serialize access to a canvas.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Creates a transparent canvas. Zero-sized targets are allowed.
    pub fn new(target: OutputTarget) -> Self {
        Self { image: RgbaImage::new(target.width, target.height) }
    }

    #[inline]
    pub fn target(&self) -> OutputTarget {
        OutputTarget::new(self.image.width(), self.image.height())
    }

    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    #[inline]
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Resets every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixels_mut().fill(0);
    }

    /// Fills the whole canvas with `paint`, source-over.
    pub fn fill(&mut self, paint: &Paint) {
        if let Paint::Solid(c) = paint
            && c.a >= 1.0
        {
            let px = Rgba(c.to_rgba8());
            self.image.pixels_mut().for_each(|p| *p = px);
            return;
        }

        for (x, y, px) in self.image.enumerate_pixels_mut() {
            let src = paint.color_at(Vec2::new(x as f32, y as f32));
            *px = Rgba(src.over(Color::from_rgba8(px.0)).to_rgba8());
        }
    }

    /// Composites an elliptical gradient over the pixels it covers, source-over.
    pub fn draw_ellipse(&mut self, blob: &EllipticalGradient) {
        let Some((x0, y0, x1, y1)) = self.bounds_of(blob) else { return };

        for y in y0..=y1 {
            for x in x0..=x1 {
                let Some(src) = blob.color_at(Vec2::new(x as f32, y as f32)) else { continue };
                if src.a <= 0.0 {
                    continue;
                }
                let px = self.image.get_pixel_mut(x, y);
                *px = Rgba(src.over(Color::from_rgba8(px.0)).to_rgba8());
            }
        }
    }

    /// Inclusive pixel bounds of the blob clipped to the canvas.
    fn bounds_of(&self, blob: &EllipticalGradient) -> Option<(u32, u32, u32, u32)> {
        let target = self.target();
        if target.is_empty() || !blob.center.is_finite() {
            return None;
        }
        let ext = blob.half_extents();
        let (max_x, max_y) = ((target.width - 1) as f32, (target.height - 1) as f32);

        let x0 = (blob.center.x - ext.x).ceil().max(0.0);
        let y0 = (blob.center.y - ext.y).ceil().max(0.0);
        let x1 = (blob.center.x + ext.x).floor().min(max_x);
        let y1 = (blob.center.y + ext.y).floor().min(max_y);

        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}
