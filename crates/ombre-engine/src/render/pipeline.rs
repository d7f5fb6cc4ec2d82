//! Two-pass animated gradient pipeline.
//!
//! Pass 1 draws the gradient program into an off-screen texture sized to the
//! output. Pass 2 samples that texture through the grain program into the
//! caller's target. Both passes draw the same full-screen quad.

use image::RgbaImage;
use wgpu::util::DeviceExt;

use crate::coords::OutputTarget;
use crate::error::{Error, Result};
use crate::time::FrameParams;

use super::shader::{gradient_source, ShaderProgram, GRAIN_WGSL, VERTEX_WGSL};
use super::target::{OffscreenTarget, TextureAllocator};
use super::uniforms::{
    gradient_uniforms, grain_uniforms, set_uniforms, unit_bindings, UniformBlock, UniformValue,
    U_IMAGE,
};
use super::{RenderCtx, RenderTarget};

/// Format of the gradient target and of snapshots.
pub const FRAMEBUFFER_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Texture unit the grain pass reads the gradient from.
pub const FRAMEBUFFER_UNIT: u32 = 0;

/// Two triangles covering clip space.
const QUAD: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [-1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [1.0, 1.0],
];

const QUAD_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

fn quad_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &QUAD_ATTRS,
    }
}

/// Lifecycle of a [`ShaderPipeline`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PipelineState {
    Uninitialized,
    ProgramsReady,
    Rendering,
}

impl PipelineState {
    #[inline]
    pub fn can_render(self) -> bool {
        !matches!(self, PipelineState::Uninitialized)
    }
}

// ── textures ──────────────────────────────────────────────────────────────

/// A 2D color texture with its default view. Destroyed on drop.
#[derive(Debug)]
pub struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl GpuTexture {
    fn new(
        device: &wgpu::Device,
        label: &str,
        size: OutputTarget,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FRAMEBUFFER_FORMAT,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

impl Drop for GpuTexture {
    fn drop(&mut self) {
        self.texture.destroy();
    }
}

struct FramebufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl TextureAllocator for FramebufferAllocator<'_> {
    type Texture = GpuTexture;

    fn allocate(&mut self, size: OutputTarget) -> GpuTexture {
        GpuTexture::new(
            self.device,
            "ombre gradient target",
            size,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        )
    }
}

fn extent(size: OutputTarget) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    }
}

// ── passes ────────────────────────────────────────────────────────────────

/// One linked program with its uniform buffer and per-format pipelines.
struct Pass {
    label: String,
    vs_module: wgpu::ShaderModule,
    fs_module: wgpu::ShaderModule,
    layout: wgpu::PipelineLayout,
    pipelines: Vec<(wgpu::TextureFormat, wgpu::RenderPipeline)>,
    uniforms: UniformBlock,
    ubo: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
}

impl Pass {
    fn new(
        device: &wgpu::Device,
        program: &ShaderProgram,
        uniforms: UniformBlock,
        texture_layout: Option<&wgpu::BindGroupLayout>,
    ) -> Self {
        let label = program.label.clone();

        let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("ombre {label} vs")),
            source: wgpu::ShaderSource::Wgsl(program.vertex.source.as_str().into()),
        });
        let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("ombre {label} fs")),
            source: wgpu::ShaderSource::Wgsl(program.fragment.source.as_str().into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("ombre {label} uniform bgl")),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(uniforms.bytes().len() as u64),
                },
                count: None,
            }],
        });

        let ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("ombre {label} ubo")),
            contents: uniforms.bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("ombre {label} uniform bind group")),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        let mut bind_group_layouts = vec![&uniform_layout];
        bind_group_layouts.extend(texture_layout);
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("ombre {label} pipeline layout")),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        Self {
            label,
            vs_module,
            fs_module,
            layout,
            pipelines: Vec::new(),
            uniforms,
            ubo,
            uniform_bind_group,
        }
    }

    fn ensure_pipeline(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        if self.pipelines.iter().any(|(f, _)| *f == format) {
            return;
        }

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("ombre {} pipeline", self.label)),
            layout: Some(&self.layout),
            vertex: wgpu::VertexState {
                module: &self.vs_module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[quad_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.fs_module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("{} pipeline created for {format:?}", self.label);
        self.pipelines.push((format, pipeline));
    }

    fn pipeline(&self, format: wgpu::TextureFormat) -> Option<&wgpu::RenderPipeline> {
        self.pipelines
            .iter()
            .find(|(f, _)| *f == format)
            .map(|(_, p)| p)
    }

    fn write_uniforms(&mut self, queue: &wgpu::Queue, values: &[(&str, UniformValue)]) -> Result<()> {
        set_uniforms(&mut self.uniforms, values)?;
        queue.write_buffer(&self.ubo, 0, self.uniforms.bytes());
        Ok(())
    }
}

/// Grain-pass texture bind group and what it was built against.
struct TextureBinding {
    generation: u64,
    unit: u32,
    bind_group: wgpu::BindGroup,
}

struct Programs {
    gradient: Pass,
    grain: Pass,
    texture_layout: wgpu::BindGroupLayout,
    texture_binding: u32,
    texture: Option<TextureBinding>,
}

impl Programs {
    fn ensure_texture_bind_group(
        &mut self,
        device: &wgpu::Device,
        sampler: &wgpu::Sampler,
        framebuffer: &GpuTexture,
        generation: u64,
        unit: u32,
    ) {
        if self
            .texture
            .as_ref()
            .is_some_and(|t| t.generation == generation && t.unit == unit)
        {
            return;
        }

        let (texture_binding, sampler_binding) = unit_bindings(unit);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ombre grain texture bind group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: texture_binding,
                    resource: wgpu::BindingResource::TextureView(framebuffer.view()),
                },
                wgpu::BindGroupEntry {
                    binding: sampler_binding,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        self.texture = Some(TextureBinding { generation, unit, bind_group });
    }
}

fn texture_layout(device: &wgpu::Device, unit: u32) -> wgpu::BindGroupLayout {
    let (texture_binding, sampler_binding) = unit_bindings(unit);
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("ombre grain texture bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: texture_binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: sampler_binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Texture unit a shader binding belongs to, if it is a texture slot.
fn unit_for_binding(binding: u32) -> Option<u32> {
    (binding % 2 == 0).then_some(binding / 2)
}

fn full_screen_pass(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    view: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bind_groups: &[&wgpu::BindGroup],
    quad: &wgpu::Buffer,
) {
    let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });

    rpass.set_pipeline(pipeline);
    for (index, group) in bind_groups.iter().enumerate() {
        rpass.set_bind_group(index as u32, *group, &[]);
    }
    rpass.set_vertex_buffer(0, quad.slice(..));
    rpass.draw(0..QUAD.len() as u32, 0..1);
}

// ── pipeline ──────────────────────────────────────────────────────────────

/// Animated gradient renderer: gradient to texture, then grain to screen.
///
/// Owns its quad, sampler, off-screen target and programs; all of them are
/// dropped by [`ShaderPipeline::release`] or when the pipeline is dropped.
pub struct ShaderPipeline {
    state: PipelineState,
    quad_vbo: wgpu::Buffer,
    sampler: wgpu::Sampler,
    framebuffer: OffscreenTarget<GpuTexture>,
    programs: Option<Programs>,
}

impl ShaderPipeline {
    /// Allocates the quad and an off-screen target sized to `size`.
    pub fn new(device: &wgpu::Device, size: OutputTarget) -> Self {
        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ombre quad vbo"),
            contents: bytemuck::cast_slice(&QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ombre gradient sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let mut framebuffer = OffscreenTarget::new();
        framebuffer.ensure(&mut FramebufferAllocator { device }, size);

        Self {
            state: PipelineState::Uninitialized,
            quad_vbo,
            sampler,
            framebuffer,
            programs: None,
        }
    }

    #[inline]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Size the off-screen target is currently allocated at.
    #[inline]
    pub fn framebuffer_size(&self) -> OutputTarget {
        self.framebuffer.size()
    }

    /// Compiles and links both programs and builds their GPU objects.
    ///
    /// On error the previous programs (if any) stay in place.
    pub fn setup_programs(
        &mut self,
        device: &wgpu::Device,
        vertex_src: &str,
        gradient_src: &str,
        grain_src: &str,
    ) -> Result<()> {
        let gradient = ShaderProgram::build("gradient", vertex_src, gradient_src)?;
        let grain = ShaderProgram::build("grain", vertex_src, grain_src)?;
        let gradient_block = UniformBlock::reflect(&gradient)?;
        let grain_block = UniformBlock::reflect(&grain)?;

        let link_err = |diagnostic: String| Error::ShaderLink {
            label: grain.label.clone(),
            diagnostic,
        };
        let binding = grain_block
            .texture_binding(U_IMAGE)
            .ok_or_else(|| link_err(format!("no `{U_IMAGE}` texture to sample the gradient from")))?;
        let unit = unit_for_binding(binding).ok_or_else(|| {
            link_err(format!(
                "`{U_IMAGE}` is at binding {binding}; texture unit k uses bindings 2k and 2k+1"
            ))
        })?;

        let texture_layout = texture_layout(device, unit);
        self.programs = Some(Programs {
            gradient: Pass::new(device, &gradient, gradient_block, None),
            grain: Pass::new(device, &grain, grain_block, Some(&texture_layout)),
            texture_layout,
            texture_binding: binding,
            texture: None,
        });

        self.state = PipelineState::ProgramsReady;
        log::info!("shader programs ready (gradient, grain)");
        Ok(())
    }

    /// [`setup_programs`](Self::setup_programs) with the bundled shaders.
    pub fn setup_default_programs(&mut self, device: &wgpu::Device) -> Result<()> {
        self.setup_programs(device, VERTEX_WGSL, &gradient_source(), GRAIN_WGSL)
    }

    /// Reallocates the off-screen target if `size` changed.
    pub fn resize(&mut self, device: &wgpu::Device, size: OutputTarget) {
        self.framebuffer.ensure(&mut FramebufferAllocator { device }, size);
    }

    /// Draws one frame into `target`.
    ///
    /// A zero-area output is a no-op.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        frame: &FrameParams,
    ) -> Result<()> {
        if !self.state.can_render() {
            return Err(Error::NotReady(self.state));
        }
        if ctx.size.is_empty() {
            return Ok(());
        }

        self.encode(ctx, target.encoder, target.color_view, ctx.surface_format, frame)?;

        if self.state != PipelineState::Rendering {
            log::debug!("pipeline {:?} -> Rendering", self.state);
            self.state = PipelineState::Rendering;
        }
        Ok(())
    }

    /// Renders one frame off-screen at `ctx.size` and reads it back.
    pub fn snapshot(&mut self, ctx: &RenderCtx<'_>, frame: &FrameParams) -> Result<RgbaImage> {
        if !self.state.can_render() {
            return Err(Error::NotReady(self.state));
        }
        let size = ctx.size;
        if size.is_empty() {
            return Err(Error::Encode(format!(
                "cannot snapshot a {}x{} target",
                size.width, size.height
            )));
        }

        let output = GpuTexture::new(
            ctx.device,
            "ombre snapshot target",
            size,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        );

        let unpadded_bytes_per_row = size.width * 4;
        let padded_bytes_per_row =
            align_to(unpadded_bytes_per_row, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
        let readback = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ombre snapshot readback"),
            size: u64::from(padded_bytes_per_row) * u64::from(size.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ombre snapshot encoder"),
            });
        self.encode(ctx, &mut encoder, output.view(), FRAMEBUFFER_FORMAT, frame)?;

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &output.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(size.height),
                },
            },
            extent(size),
        );
        ctx.queue.submit(std::iter::once(encoder.finish()));

        let slice = readback.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        ctx.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| Error::Encode(format!("device poll failed: {e}")))?;

        receiver
            .recv()
            .map_err(|_| Error::Encode("GPU map callback was dropped".into()))?
            .map_err(|e| Error::Encode(format!("GPU buffer mapping failed: {e}")))?;

        let mapped = slice.get_mapped_range();
        let pixels = copy_tight_rows(
            &mapped,
            unpadded_bytes_per_row,
            padded_bytes_per_row,
            size.height,
        )?;
        drop(mapped);
        readback.unmap();

        log::info!("snapshot {}x{}", size.width, size.height);
        RgbaImage::from_raw(size.width, size.height, pixels)
            .ok_or_else(|| Error::Encode("snapshot buffer has the wrong length".into()))
    }

    /// Drops programs and the off-screen target.
    pub fn release(&mut self) {
        self.programs = None;
        self.framebuffer.release();
        self.state = PipelineState::Uninitialized;
        log::debug!("pipeline released");
    }

    fn encode(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        output: &wgpu::TextureView,
        output_format: wgpu::TextureFormat,
        frame: &FrameParams,
    ) -> Result<()> {
        let size = ctx.size;
        self.framebuffer.ensure(&mut FramebufferAllocator { device: ctx.device }, size);
        let generation = self.framebuffer.generation();

        let Some(programs) = self.programs.as_mut() else {
            return Err(Error::NotReady(self.state));
        };

        programs.gradient.ensure_pipeline(ctx.device, FRAMEBUFFER_FORMAT);
        programs.grain.ensure_pipeline(ctx.device, output_format);
        programs
            .gradient
            .write_uniforms(ctx.queue, &gradient_uniforms(frame, size))?;
        programs
            .grain
            .write_uniforms(ctx.queue, &grain_uniforms(frame, FRAMEBUFFER_UNIT))?;

        let unit = programs
            .grain
            .uniforms
            .texture_unit(U_IMAGE)
            .unwrap_or(FRAMEBUFFER_UNIT);
        let (binding, _) = unit_bindings(unit);
        if binding != programs.texture_binding {
            return Err(Error::InvalidParameter {
                name: "u_image",
                reason: format!(
                    "unit {unit} maps to binding {binding} but the grain program samples binding {}",
                    programs.texture_binding
                ),
            });
        }

        let framebuffer = self.framebuffer.texture_for(size)?;
        programs.ensure_texture_bind_group(ctx.device, &self.sampler, framebuffer, generation, unit);

        let (Some(gradient), Some(grain), Some(texture)) = (
            programs.gradient.pipeline(FRAMEBUFFER_FORMAT),
            programs.grain.pipeline(output_format),
            programs.texture.as_ref(),
        ) else {
            return Err(Error::ResourceUnavailable("render pipeline objects".into()));
        };

        full_screen_pass(
            encoder,
            "ombre gradient pass",
            framebuffer.view(),
            gradient,
            &[&programs.gradient.uniform_bind_group],
            &self.quad_vbo,
        );
        full_screen_pass(
            encoder,
            "ombre grain pass",
            output,
            grain,
            &[&programs.grain.uniform_bind_group, &texture.bind_group],
            &self.quad_vbo,
        );
        Ok(())
    }
}

fn align_to(value: u32, alignment: u32) -> u32 {
    let mask = alignment - 1;
    (value + mask) & !mask
}

/// Strips per-row padding from a mapped readback buffer.
fn copy_tight_rows(
    mapped: &[u8],
    unpadded_bytes_per_row: u32,
    padded_bytes_per_row: u32,
    height: u32,
) -> Result<Vec<u8>> {
    let required = padded_bytes_per_row as usize * height as usize;
    if mapped.len() < required {
        return Err(Error::Encode(format!(
            "mapped frame too small: expected at least {required} bytes, got {}",
            mapped.len()
        )));
    }

    let row = unpadded_bytes_per_row as usize;
    let mut out = Vec::with_capacity(row * height as usize);
    for chunk in mapped.chunks(padded_bytes_per_row as usize).take(height as usize) {
        out.extend_from_slice(&chunk[..row]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_uninitialized_refuses_to_render() {
        assert!(!PipelineState::Uninitialized.can_render());
        assert!(PipelineState::ProgramsReady.can_render());
        assert!(PipelineState::Rendering.can_render());
    }

    #[test]
    fn quad_covers_clip_space() {
        let area: f32 = QUAD
            .chunks(3)
            .map(|t| {
                let [a, b, c] = [t[0], t[1], t[2]];
                ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() / 2.0
            })
            .sum();
        assert_eq!(area, 4.0);
        assert!(QUAD.iter().all(|v| v[0].abs() == 1.0 && v[1].abs() == 1.0));
    }

    #[test]
    fn grain_texture_sits_on_the_framebuffer_unit() {
        assert_eq!(unit_for_binding(unit_bindings(FRAMEBUFFER_UNIT).0), Some(FRAMEBUFFER_UNIT));
        assert_eq!(unit_for_binding(4), Some(2));
        assert_eq!(unit_for_binding(1), None);
    }

    #[test]
    fn readback_rows_are_aligned() {
        assert_eq!(align_to(4, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(1920 * 4, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT), 7680);
    }

    #[test]
    fn copy_tight_rows_strips_padding() {
        let mapped = vec![
            1, 2, 3, 4, 99, 99, 99, 99, //
            5, 6, 7, 8, 88, 88, 88, 88,
        ];
        assert_eq!(copy_tight_rows(&mapped, 4, 8, 2).unwrap(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn copy_tight_rows_rejects_short_buffers() {
        assert!(matches!(copy_tight_rows(&[0; 12], 4, 8, 2), Err(Error::Encode(_))));
    }
}
