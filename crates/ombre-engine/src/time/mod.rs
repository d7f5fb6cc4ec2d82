//! Time subsystem.
//!
//! - `FrameClock`: one per render loop; `tick()` once per presented frame
//! - `AnimationState`: the animated path's time/pause/color state, read by
//!   the frame loop as a `FrameParams` snapshot

mod animation;
mod frame_clock;

pub use animation::{
    AnimationState, FrameParams, Preset, MAX_GPU_COLORS, MIN_GPU_COLORS,
};
pub use frame_clock::{FrameClock, FrameTime};
