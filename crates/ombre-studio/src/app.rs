use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use ombre_engine::core::{App, AppControl, FrameCtx};
use ombre_engine::raster::{encode_png, export_file_name, random_suffix};
use ombre_engine::render::ShaderPipeline;
use ombre_engine::time::{AnimationState, FrameParams};

use crate::presets::PRESETS;

/// Seconds moved per arrow-key press.
const SCRUB_STEP: f32 = 0.5;
const GRAIN_STEP: f32 = 0.05;

/// Animated preview window.
///
/// Keys: Space pauses, Left/Right scrub, Up/Down change grain, P cycles
/// presets, A adds a random color, Backspace removes the last one, S saves a
/// PNG snapshot, Escape quits.
pub struct StudioApp {
    state: AnimationState,
    preset: usize,
    pipeline: Option<ShaderPipeline>,
    snapshot_requested: bool,
    title_dirty: bool,
    out_dir: PathBuf,
    rng: StdRng,
}

impl StudioApp {
    pub fn new(preset: usize, out_dir: PathBuf) -> Self {
        let preset = preset % PRESETS.len();
        Self {
            state: AnimationState::from_preset(&PRESETS[preset]),
            preset,
            pipeline: None,
            snapshot_requested: false,
            title_dirty: true,
            out_dir,
            rng: StdRng::from_os_rng(),
        }
    }

    fn handle_key(&mut self, code: KeyCode, repeat: bool) -> AppControl {
        match code {
            KeyCode::Escape => return AppControl::Exit,
            KeyCode::Space if !repeat => self.state.toggle_pause(),
            KeyCode::ArrowLeft => self.scrub_by(-SCRUB_STEP),
            KeyCode::ArrowRight => self.scrub_by(SCRUB_STEP),
            KeyCode::ArrowUp => self.nudge_grain(GRAIN_STEP),
            KeyCode::ArrowDown => self.nudge_grain(-GRAIN_STEP),
            KeyCode::KeyP if !repeat => {
                self.preset = (self.preset + 1) % PRESETS.len();
                self.state.apply_preset(&PRESETS[self.preset]);
            }
            KeyCode::KeyA if !repeat => {
                let rgb = [self.rng.random(), self.rng.random(), self.rng.random()];
                self.state.push_color(rgb);
            }
            KeyCode::Backspace if !repeat => {
                let last = self.state.colors().len().saturating_sub(1);
                if let Err(e) = self.state.remove_color(last) {
                    log::warn!("{e}");
                }
            }
            KeyCode::KeyS if !repeat => self.snapshot_requested = true,
            _ => return AppControl::Continue,
        }
        self.title_dirty = true;
        AppControl::Continue
    }

    fn scrub_by(&mut self, delta: f32) {
        let t = (self.state.time + delta).max(0.0);
        if let Err(e) = self.state.scrub(t) {
            log::warn!("{e}");
        }
    }

    fn nudge_grain(&mut self, delta: f32) {
        self.state.grain_intensity = (self.state.grain_intensity + delta).clamp(0.0, 1.0);
        log::debug!("grain intensity {:.2}", self.state.grain_intensity);
    }

    fn title(&self) -> String {
        let mut title = format!(
            "ombre · {} · {} colors",
            PRESETS[self.preset].name,
            self.state.colors().len()
        );
        if self.state.paused {
            title.push_str(&format!(" · paused at {:.1}s", self.state.manual_time));
        }
        title
    }

    fn ensure_pipeline(&mut self, ctx: &FrameCtx<'_, '_>) -> ombre_engine::Result<()> {
        if self.pipeline.is_some() {
            return Ok(());
        }
        let device = ctx.gpu.device();
        let mut pipeline = ShaderPipeline::new(device, ctx.output_target());
        pipeline.setup_default_programs(device)?;
        self.pipeline = Some(pipeline);
        Ok(())
    }

    fn save_snapshot(&mut self, ctx: &FrameCtx<'_, '_>, frame: &FrameParams) {
        let Some(pipeline) = self.pipeline.as_mut() else { return };
        let rctx = ctx.render_ctx();

        let png = match pipeline.snapshot(&rctx, frame).and_then(|image| encode_png(&image)) {
            Ok(png) => png,
            Err(e) => {
                log::error!("snapshot failed: {e}");
                return;
            }
        };

        let path = self
            .out_dir
            .join(export_file_name(rctx.size, &random_suffix(&mut self.rng)));
        match std::fs::write(&path, png) {
            Ok(()) => log::info!("saved {}", path.display()),
            Err(e) => log::error!("failed to write {}: {e}", path.display()),
        }
    }
}

impl App for StudioApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };
        if event.state != ElementState::Pressed {
            return AppControl::Continue;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return AppControl::Continue;
        };
        self.handle_key(code, event.repeat)
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if let Err(e) = self.ensure_pipeline(ctx) {
            log::error!("{e}");
            return AppControl::Exit;
        }

        self.state.advance(ctx.time.elapsed);
        let frame = self.state.frame();

        if self.title_dirty {
            ctx.window.set_title(&self.title());
            self.title_dirty = false;
        }

        if std::mem::take(&mut self.snapshot_requested) {
            self.save_snapshot(ctx, &frame);
        }

        let Some(pipeline) = self.pipeline.as_mut() else {
            return AppControl::Exit;
        };

        let mut result = Ok(());
        let control = ctx.render(|rctx, target| {
            result = pipeline.render(rctx, target, &frame);
        });

        match result {
            Ok(()) => control,
            Err(e) => {
                log::error!("frame failed: {e}");
                AppControl::Exit
            }
        }
    }

    fn on_close(&mut self, _window_id: WindowId) {
        if let Some(mut pipeline) = self.pipeline.take() {
            pipeline.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> StudioApp {
        StudioApp::new(0, PathBuf::from("."))
    }

    #[test]
    fn space_pauses_and_arrows_scrub() {
        let mut app = app();
        app.state.advance(10.0);
        app.handle_key(KeyCode::Space, false);
        assert!(app.state.paused);
        assert_eq!(app.state.manual_time, 10.0);

        app.handle_key(KeyCode::ArrowRight, false);
        app.handle_key(KeyCode::ArrowRight, true);
        assert_eq!(app.state.manual_time, 11.0);

        app.state.scrub(0.2).unwrap();
        app.handle_key(KeyCode::ArrowLeft, false);
        assert_eq!(app.state.manual_time, 0.0);
    }

    #[test]
    fn presets_cycle() {
        let mut app = StudioApp::new(PRESETS.len() - 1, PathBuf::from("."));
        app.handle_key(KeyCode::KeyP, false);
        assert_eq!(app.preset, 0);
        assert_eq!(app.state.colors(), PRESETS[0].colors);
        assert!(app.title().contains(PRESETS[0].name));
    }

    #[test]
    fn color_edits_respect_limits() {
        let mut app = app();
        for _ in 0..20 {
            app.handle_key(KeyCode::KeyA, false);
        }
        assert_eq!(app.state.colors().len(), 10);
        for _ in 0..20 {
            app.handle_key(KeyCode::Backspace, false);
        }
        assert_eq!(app.state.colors().len(), 1);
    }

    #[test]
    fn grain_stays_in_range() {
        let mut app = app();
        for _ in 0..40 {
            app.handle_key(KeyCode::ArrowUp, false);
        }
        assert_eq!(app.state.grain_intensity, 1.0);
    }

    #[test]
    fn escape_exits_and_unknown_keys_are_ignored() {
        let mut app = app();
        assert_eq!(app.handle_key(KeyCode::Escape, false), AppControl::Exit);
        assert_eq!(app.handle_key(KeyCode::KeyZ, false), AppControl::Continue);
        app.handle_key(KeyCode::KeyS, false);
        assert!(app.snapshot_requested);
    }
}
