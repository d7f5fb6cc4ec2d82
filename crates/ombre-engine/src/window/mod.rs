//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the preview window, and wires them to the
//! GPU layer. The GPU context borrows its window, so both live in one
//! self-referencing entry.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
