use rand::Rng;

use crate::descriptor::GrainSettings;

/// Default peak-to-peak noise amplitude, in 8-bit channel units, at opacity 1.
pub const DEFAULT_GRAIN_INTENSITY: f32 = 50.0;

/// Film-grain post-process over an RGBA8 buffer.
///
/// Every RGB channel of every pixel draws its own noise sample, so the grain
/// is colored rather than monochrome. Alpha is never touched.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GrainCompositor {
    pub base_intensity: f32,
}

impl Default for GrainCompositor {
    fn default() -> Self {
        Self { base_intensity: DEFAULT_GRAIN_INTENSITY }
    }
}

impl GrainCompositor {
    pub fn new(base_intensity: f32) -> Self {
        Self { base_intensity }
    }

    /// Adds grain to `rgba` in place.
    ///
    /// Inactive settings or an empty buffer leave the bytes unchanged and
    /// consume nothing from `rng`.
    pub fn apply<R: Rng + ?Sized>(&self, rgba: &mut [u8], settings: GrainSettings, rng: &mut R) {
        if !settings.is_active() || rgba.is_empty() {
            return;
        }
        let intensity = self.base_intensity * settings.opacity.clamp(0.0, 1.0);

        for px in rgba.chunks_exact_mut(4) {
            for ch in &mut px[..3] {
                let noise = (rng.random::<f32>() - 0.5) * intensity;
                *ch = (*ch as f32 + noise).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn buffer(px: [u8; 4], n: usize) -> Vec<u8> {
        px.iter().copied().cycle().take(n * 4).collect()
    }

    #[test]
    fn disabled_or_zero_opacity_is_byte_identical() {
        let mut rng = StdRng::seed_from_u64(1);
        let original = buffer([10, 128, 250, 200], 64);

        for settings in [
            GrainSettings { enabled: false, opacity: 1.0 },
            GrainSettings { enabled: true, opacity: 0.0 },
        ] {
            let mut buf = original.clone();
            GrainCompositor::default().apply(&mut buf, settings, &mut rng);
            assert_eq!(buf, original);
        }
    }

    #[test]
    fn channels_stay_in_range_at_the_extremes() {
        let mut rng = StdRng::seed_from_u64(2);
        for px in [[0, 0, 0, 255], [255, 255, 255, 255], [1, 254, 128, 0]] {
            let mut buf = buffer(px, 256);
            GrainCompositor::new(400.0).apply(&mut buf, GrainSettings::new(1.0), &mut rng);
            // u8 cannot leave [0, 255]; saturation must not wrap around.
            for (i, chunk) in buf.chunks_exact(4).enumerate() {
                if px[0] == 0 {
                    assert!(chunk[0] < 201, "pixel {i} wrapped: {chunk:?}");
                }
                if px[0] == 255 {
                    assert!(chunk[0] > 54, "pixel {i} wrapped: {chunk:?}");
                }
            }
        }
    }

    #[test]
    fn noise_is_bounded_by_intensity() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut buf = buffer([128, 128, 128, 255], 512);
        GrainCompositor::default().apply(&mut buf, GrainSettings::new(0.5), &mut rng);
        // amplitude 25 -> at most ±12.5, rounded
        assert!(buf.chunks_exact(4).all(|p| p[..3].iter().all(|&c| (115..=141).contains(&c))));
    }

    #[test]
    fn alpha_is_untouched() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut buf = buffer([90, 90, 90, 77], 128);
        GrainCompositor::default().apply(&mut buf, GrainSettings::new(1.0), &mut rng);
        assert!(buf.chunks_exact(4).all(|p| p[3] == 77));
    }

    #[test]
    fn channels_draw_independent_samples() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut buf = buffer([128, 128, 128, 255], 256);
        GrainCompositor::default().apply(&mut buf, GrainSettings::new(1.0), &mut rng);
        let colored = buf.chunks_exact(4).filter(|p| p[0] != p[1] || p[1] != p[2]).count();
        assert!(colored > 128, "only {colored} of 256 pixels have per-channel noise");
    }
}
