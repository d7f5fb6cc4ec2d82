//! GPU rendering subsystem.
//!
//! The animated path draws the gradient in two full-screen passes (see
//! [`ShaderPipeline`]). Shader compilation, linking and uniform marshalling
//! run on the CPU through `naga` and are usable without a device.
//!
//! Convention:
//! - Sizes are device pixels ([`OutputTarget`](crate::coords::OutputTarget)).
//! - The quad's `v_uv` runs bottom-up; texture rows run top-down.

mod ctx;
mod pipeline;
pub mod shader;
mod target;
pub mod uniforms;

pub use ctx::{RenderCtx, RenderTarget};
pub use pipeline::{GpuTexture, PipelineState, ShaderPipeline, FRAMEBUFFER_FORMAT, FRAMEBUFFER_UNIT};
pub use shader::{CompiledStage, ShaderProgram, Stage};
pub use target::{OffscreenTarget, TextureAllocator};
pub use uniforms::{set_uniforms, UniformBlock, UniformKind, UniformSink, UniformValue};
