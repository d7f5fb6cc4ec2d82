use crate::error::{Error, Result};

/// Most colors the gradient shader can blend.
pub const MAX_GPU_COLORS: usize = 10;
/// Fewest colors the animation keeps (one color renders as a solid fill).
pub const MIN_GPU_COLORS: usize = 1;

/// Named look for the animated gradient. Catalogs are static data.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub colors: &'static [[f32; 3]],
    pub grain_intensity: f32,
    pub blob_smoothness: f32,
    pub noise_scale: f32,
}

/// Mutable state of the animated GPU path.
///
/// Edits are applied between frames; the frame loop only reads a
/// [`FrameParams`] snapshot taken once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    /// Seconds fed to the shaders this frame.
    pub time: f32,
    colors: Vec<[f32; 3]>,
    pub blob_smoothness: f32,
    pub noise_scale: f32,
    pub grain_intensity: f32,
    pub paused: bool,
    /// Time shown while paused.
    pub manual_time: f32,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            time: 0.0,
            colors: vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]],
            blob_smoothness: 1.0,
            noise_scale: 1.5,
            grain_intensity: 0.1,
            paused: false,
            manual_time: 0.0,
        }
    }
}

impl AnimationState {
    pub fn from_preset(preset: &Preset) -> Self {
        let mut state = Self::default();
        state.apply_preset(preset);
        state
    }

    /// Replaces colors and look parameters; time and pause state are kept.
    pub fn apply_preset(&mut self, preset: &Preset) {
        log::info!("preset `{}`", preset.name);
        if self.set_colors(preset.colors.to_vec()).is_err() {
            log::warn!("preset `{}` has no colors; palette kept", preset.name);
        }
        self.grain_intensity = preset.grain_intensity;
        self.blob_smoothness = preset.blob_smoothness;
        self.noise_scale = preset.noise_scale;
    }

    /// Advances to wall-clock `now_secs`, or pins to `manual_time` when paused.
    pub fn advance(&mut self, now_secs: f32) {
        self.time = if self.paused { self.manual_time } else { now_secs };
    }

    /// Pausing freezes the picture at the current time.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if self.paused {
            self.manual_time = self.time;
        }
        log::debug!("animation {}", if self.paused { "paused" } else { "resumed" });
    }

    /// Jumps to `t` seconds and pauses there.
    pub fn scrub(&mut self, t: f32) -> Result<()> {
        if !t.is_finite() {
            return Err(Error::InvalidParameter {
                name: "manual_time",
                reason: format!("must be finite, got {t}"),
            });
        }
        self.manual_time = t;
        self.paused = true;
        self.time = t;
        Ok(())
    }

    #[inline]
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Replaces every color. Colors past [`MAX_GPU_COLORS`] are dropped.
    pub fn set_colors(&mut self, mut colors: Vec<[f32; 3]>) -> Result<()> {
        if colors.len() < MIN_GPU_COLORS {
            return Err(Error::ColorLimit {
                min: MIN_GPU_COLORS,
                max: MAX_GPU_COLORS,
                attempted: colors.len(),
            });
        }
        if colors.len() > MAX_GPU_COLORS {
            log::warn!(
                "{} colors exceed the shader limit of {MAX_GPU_COLORS}; extra colors ignored",
                colors.len()
            );
            colors.truncate(MAX_GPU_COLORS);
        }
        self.colors = colors.into_iter().map(sanitize).collect();
        Ok(())
    }

    /// Appends a color. Returns `false` (and changes nothing) at the limit.
    pub fn push_color(&mut self, rgb: [f32; 3]) -> bool {
        if self.colors.len() >= MAX_GPU_COLORS {
            log::warn!("color limit of {MAX_GPU_COLORS} reached; color ignored");
            return false;
        }
        self.colors.push(sanitize(rgb));
        true
    }

    pub fn set_color(&mut self, index: usize, rgb: [f32; 3]) -> Result<()> {
        let len = self.colors.len();
        let slot = self.colors.get_mut(index).ok_or_else(|| Error::InvalidParameter {
            name: "color_index",
            reason: format!("{index} is out of range for {len} colors"),
        })?;
        *slot = sanitize(rgb);
        Ok(())
    }

    /// Removes a color, never going below one.
    pub fn remove_color(&mut self, index: usize) -> Result<()> {
        if index >= self.colors.len() {
            return Err(Error::InvalidParameter {
                name: "color_index",
                reason: format!("{index} is out of range for {} colors", self.colors.len()),
            });
        }
        if self.colors.len() <= MIN_GPU_COLORS {
            return Err(Error::ColorLimit {
                min: MIN_GPU_COLORS,
                max: MAX_GPU_COLORS,
                attempted: self.colors.len() - 1,
            });
        }
        self.colors.remove(index);
        Ok(())
    }

    /// Copy of everything one frame needs.
    pub fn frame(&self) -> FrameParams {
        let mut colors = [[0.0; 3]; MAX_GPU_COLORS];
        let count = self.colors.len().min(MAX_GPU_COLORS);
        colors[..count].copy_from_slice(&self.colors[..count]);
        FrameParams {
            time: self.time,
            colors,
            count,
            blob_smoothness: self.blob_smoothness,
            noise_scale: self.noise_scale,
            grain_intensity: self.grain_intensity,
        }
    }
}

fn sanitize(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(|c| if c.is_finite() { c.clamp(0.0, 1.0) } else { 0.0 })
}

/// Immutable per-frame snapshot of [`AnimationState`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameParams {
    pub time: f32,
    colors: [[f32; 3]; MAX_GPU_COLORS],
    count: usize,
    pub blob_smoothness: f32,
    pub noise_scale: f32,
    pub grain_intensity: f32,
}

impl FrameParams {
    #[inline]
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors[..self.count]
    }

    #[inline]
    pub fn color_count(&self) -> usize {
        self.count
    }

    /// Colors as `r, g, b, r, g, b, ...`.
    pub fn flat_colors(&self) -> Vec<f32> {
        self.colors().iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOK: Preset = Preset {
        name: "test",
        colors: &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        grain_intensity: 0.2,
        blob_smoothness: 1.5,
        noise_scale: 3.0,
    };

    // ── time ──────────────────────────────────────────────────────────────

    #[test]
    fn running_time_follows_the_clock() {
        let mut s = AnimationState::default();
        s.advance(1.25);
        assert_eq!(s.time, 1.25);
        s.advance(2.0);
        assert_eq!(s.time, 2.0);
    }

    #[test]
    fn pause_freezes_at_the_current_time() {
        let mut s = AnimationState::default();
        s.advance(7.5);
        s.toggle_pause();
        s.advance(9.0);
        assert_eq!(s.time, 7.5);
        s.toggle_pause();
        s.advance(9.0);
        assert_eq!(s.time, 9.0);
    }

    #[test]
    fn scrub_forces_pause() {
        let mut s = AnimationState::default();
        s.advance(3.0);
        s.scrub(42.0).unwrap();
        assert!(s.paused);
        s.advance(100.0);
        assert_eq!(s.time, 42.0);
        assert!(s.scrub(f32::NAN).is_err());
        assert_eq!(s.manual_time, 42.0);
    }

    // ── colors ────────────────────────────────────────────────────────────

    #[test]
    fn colors_are_capped_for_the_shader() {
        let mut s = AnimationState::default();
        s.set_colors(vec![[0.5; 3]; 14]).unwrap();
        assert_eq!(s.colors().len(), MAX_GPU_COLORS);
        assert!(!s.push_color([1.0; 3]));
        assert_eq!(s.frame().color_count(), MAX_GPU_COLORS);
    }

    #[test]
    fn never_drops_below_one_color() {
        let mut s = AnimationState::default();
        s.remove_color(0).unwrap();
        assert_eq!(s.colors().len(), 1);
        assert!(matches!(s.remove_color(0), Err(Error::ColorLimit { .. })));
        assert!(matches!(s.set_colors(Vec::new()), Err(Error::ColorLimit { .. })));
        assert_eq!(s.colors().len(), 1);
    }

    #[test]
    fn out_of_range_channels_are_clamped() {
        let mut s = AnimationState::default();
        s.set_color(0, [2.0, -1.0, f32::NAN]).unwrap();
        assert_eq!(s.colors()[0], [1.0, 0.0, 0.0]);
        assert!(s.set_color(5, [0.0; 3]).is_err());
    }

    // ── presets & snapshots ───────────────────────────────────────────────

    #[test]
    fn preset_replaces_look_but_keeps_time() {
        let mut s = AnimationState::default();
        s.scrub(12.0).unwrap();
        s.apply_preset(&LOOK);
        assert_eq!(s.colors(), LOOK.colors);
        assert_eq!(s.noise_scale, 3.0);
        assert!(s.paused);
        assert_eq!(s.time, 12.0);
    }

    #[test]
    fn snapshot_is_detached_from_later_edits() {
        let mut s = AnimationState::from_preset(&LOOK);
        s.advance(1.0);
        let frame = s.frame();
        s.push_color([1.0, 1.0, 1.0]);
        s.advance(2.0);
        assert_eq!(frame.time, 1.0);
        assert_eq!(frame.color_count(), 3);
        assert_eq!(
            frame.flat_colors(),
            vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
        );
    }
}
