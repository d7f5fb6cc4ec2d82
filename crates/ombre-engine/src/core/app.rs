use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application driven by the runtime.
///
/// Edits made in `on_window_event` land between frames; `on_frame` is the
/// only place that draws.
pub trait App {
    /// Called for every window event before the runtime handles it.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once per presented frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called right before a window and its GPU context are destroyed.
    ///
    /// GPU resources created against that window's device must be dropped here.
    fn on_close(&mut self, window_id: WindowId) {
        let _ = window_id;
    }
}
