//! Contract between the window runtime and the application.
//!
//! The runtime owns the event loop, window and GPU; the application sees one
//! [`FrameCtx`] per presented frame and the raw window events in between.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
