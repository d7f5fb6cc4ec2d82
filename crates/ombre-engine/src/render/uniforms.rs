//! Uniform marshalling.
//!
//! Values are set by name, the way a GL program would be driven. Routing is
//! fixed: plain numbers go through the float path except the texture-unit
//! selector and the color count, which must take the integer path. The color
//! array always takes the vector-array path. Other 2/3/4-element arrays map to
//! the matching fixed-size vector setter.
//!
//! [`UniformBlock`] is the GPU-side sink: a CPU copy of a shader's uniform
//! struct, reflected from the compiled module, that rejects a value sent down
//! the wrong path instead of silently reinterpreting its bits.

use naga::{AddressSpace, ArraySize, Scalar, TypeInner, VectorSize};

use crate::coords::OutputTarget;
use crate::error::{Error, Result};
use crate::time::FrameParams;

use super::shader::ShaderProgram;

/// Texture-unit selector of the grain program.
pub const U_IMAGE: &str = "u_image";
/// Number of valid entries in [`U_COLORS`].
pub const U_COLOR_COUNT: &str = "u_colorCount";
/// Flattened RGB color array.
pub const U_COLORS: &str = "u_colors";

pub const U_TIME: &str = "u_time";
pub const U_RESOLUTION: &str = "u_resolution";
pub const U_BLOB_SMOOTHNESS: &str = "u_blobSmoothness";
pub const U_NOISE_SCALE: &str = "u_noiseScale";
pub const U_GRAIN_INTENSITY: &str = "u_grainIntensity";

/// A value as handed over by the frame loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Scalar(f32),
    Array(Vec<f32>),
}

/// Anything that accepts typed uniform writes.
pub trait UniformSink {
    type Location: Copy;

    /// Looks up a uniform. `None` means the program does not use it.
    fn location(&self, name: &str) -> Option<Self::Location>;

    fn set_i32(&mut self, loc: Self::Location, v: i32) -> Result<()>;
    fn set_f32(&mut self, loc: Self::Location, v: f32) -> Result<()>;
    fn set_vec2(&mut self, loc: Self::Location, v: [f32; 2]) -> Result<()>;
    fn set_vec3(&mut self, loc: Self::Location, v: [f32; 3]) -> Result<()>;
    fn set_vec4(&mut self, loc: Self::Location, v: [f32; 4]) -> Result<()>;
    /// `v` is a flat list of RGB triples.
    fn set_vec3_array(&mut self, loc: Self::Location, v: &[f32]) -> Result<()>;
}

/// Whether a scalar uniform must be written as an integer.
#[inline]
pub fn is_integer_uniform(name: &str) -> bool {
    name == U_IMAGE || name == U_COLOR_COUNT
}

/// Routes each named value to the matching setter.
///
/// Names the sink does not know are skipped, as are arrays of unsupported
/// length.
pub fn set_uniforms<S: UniformSink>(sink: &mut S, values: &[(&str, UniformValue)]) -> Result<()> {
    for (name, value) in values {
        let Some(loc) = sink.location(name) else {
            log::trace!("uniform `{name}` not used by program; skipped");
            continue;
        };

        match value {
            UniformValue::Scalar(v) if is_integer_uniform(name) => {
                sink.set_i32(loc, v.floor() as i32)?
            }
            UniformValue::Scalar(v) => sink.set_f32(loc, *v)?,
            UniformValue::Array(v) if *name == U_COLORS => sink.set_vec3_array(loc, v)?,
            UniformValue::Array(v) => match v.as_slice() {
                [x, y] => sink.set_vec2(loc, [*x, *y])?,
                [x, y, z] => sink.set_vec3(loc, [*x, *y, *z])?,
                [x, y, z, w] => sink.set_vec4(loc, [*x, *y, *z, *w])?,
                _ => log::trace!("uniform `{name}`: {}-element array has no setter; skipped", v.len()),
            },
        }
    }
    Ok(())
}

/// Uniforms for the gradient pass.
pub fn gradient_uniforms(frame: &FrameParams, size: OutputTarget) -> Vec<(&'static str, UniformValue)> {
    vec![
        (U_TIME, UniformValue::Scalar(frame.time)),
        (U_RESOLUTION, UniformValue::Array(vec![size.width as f32, size.height as f32])),
        (U_COLORS, UniformValue::Array(frame.flat_colors())),
        (U_COLOR_COUNT, UniformValue::Scalar(frame.color_count() as f32)),
        (U_BLOB_SMOOTHNESS, UniformValue::Scalar(frame.blob_smoothness)),
        (U_NOISE_SCALE, UniformValue::Scalar(frame.noise_scale)),
    ]
}

/// Uniforms for the grain pass, sampling texture unit `unit`.
pub fn grain_uniforms(frame: &FrameParams, unit: u32) -> Vec<(&'static str, UniformValue)> {
    vec![
        (U_IMAGE, UniformValue::Scalar(unit as f32)),
        (U_GRAIN_INTENSITY, UniformValue::Scalar(frame.grain_intensity)),
        (U_TIME, UniformValue::Scalar(frame.time)),
    ]
}

/// Texture and sampler bindings of texture unit `unit` in the sampler group.
#[inline]
pub const fn unit_bindings(unit: u32) -> (u32, u32) {
    (unit * 2, unit * 2 + 1)
}

// ── uniform block ─────────────────────────────────────────────────────────

/// Shape of one reflected uniform.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    Float,
    Int,
    Vec2,
    Vec3,
    Vec4,
    Vec3Array { len: u32, stride: u32 },
    /// A sampled texture; its "value" is the unit it is bound to.
    TextureUnit { binding: u32 },
}

impl UniformKind {
    fn type_name(self) -> &'static str {
        match self {
            UniformKind::Float => "f32",
            UniformKind::Int => "i32",
            UniformKind::Vec2 => "vec2<f32>",
            UniformKind::Vec3 => "vec3<f32>",
            UniformKind::Vec4 => "vec4<f32>",
            UniformKind::Vec3Array { .. } => "array<vec3<f32>>",
            UniformKind::TextureUnit { .. } => "texture unit",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct UniformSlot {
    name: String,
    kind: UniformKind,
    offset: u32,
    unit: Option<u32>,
}

/// CPU mirror of a program's uniform buffer (group 0, binding 0) plus its
/// sampled textures.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformBlock {
    label: String,
    slots: Vec<UniformSlot>,
    data: Vec<u8>,
}

impl UniformBlock {
    /// Builds a block from `(name, kind, offset)` entries.
    pub fn with_layout(label: &str, size: u32, entries: &[(&str, UniformKind, u32)]) -> Self {
        let slots = entries
            .iter()
            .map(|(name, kind, offset)| UniformSlot {
                name: (*name).to_string(),
                kind: *kind,
                offset: *offset,
                unit: None,
            })
            .collect();
        Self {
            label: label.to_string(),
            slots,
            data: vec![0; padded_size(size)],
        }
    }

    /// Reflects the fragment stage's uniform struct and textures.
    pub fn reflect(program: &ShaderProgram) -> Result<Self> {
        let module = &program.fragment.module;
        let mut block = Self::with_layout(&program.label, 0, &[]);

        for (_, var) in module.global_variables.iter() {
            let Some(rb) = var.binding.as_ref() else { continue };
            let inner = &module.types[var.ty].inner;

            match (var.space, inner) {
                (AddressSpace::Uniform, TypeInner::Struct { members, span })
                    if rb.group == 0 && rb.binding == 0 =>
                {
                    for m in members {
                        let Some(name) = m.name.as_deref() else { continue };
                        let kind = member_kind(module, &module.types[m.ty].inner).ok_or_else(|| {
                            Error::UniformType {
                                name: name.to_string(),
                                expected: "f32, i32, vecN<f32> or array<vec3<f32>>",
                                found: "unsupported shader type",
                            }
                        })?;
                        block.slots.push(UniformSlot {
                            name: name.to_string(),
                            kind,
                            offset: m.offset,
                            unit: None,
                        });
                    }
                    block.data = vec![0; padded_size(*span)];
                }
                (AddressSpace::Handle, TypeInner::Image { .. }) => {
                    if let Some(name) = var.name.as_deref() {
                        block.slots.push(UniformSlot {
                            name: name.to_string(),
                            kind: UniformKind::TextureUnit { binding: rb.binding },
                            offset: 0,
                            unit: None,
                        });
                    }
                }
                _ => {}
            }
        }

        log::debug!(
            "uniforms `{}`: {} slots, {} bytes",
            block.label,
            block.slots.len(),
            block.data.len()
        );
        Ok(block)
    }

    /// Raw bytes to upload into the uniform buffer.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn kind(&self, name: &str) -> Option<UniformKind> {
        self.slots.iter().find(|s| s.name == name).map(|s| s.kind)
    }

    /// Unit assigned to a texture uniform through the integer path.
    pub fn texture_unit(&self, name: &str) -> Option<u32> {
        self.slots.iter().find(|s| s.name == name).and_then(|s| s.unit)
    }

    /// Binding the shader declares for a texture uniform.
    pub fn texture_binding(&self, name: &str) -> Option<u32> {
        match self.kind(name)? {
            UniformKind::TextureUnit { binding } => Some(binding),
            _ => None,
        }
    }

    fn slot(&mut self, loc: usize, found: UniformKind) -> Result<&mut UniformSlot> {
        let slot = self.slots.get_mut(loc).ok_or_else(|| Error::UniformType {
            name: format!("#{loc}"),
            expected: "a known location",
            found: found.type_name(),
        })?;

        let compatible = match (slot.kind, found) {
            (UniformKind::TextureUnit { .. }, UniformKind::Int) => true,
            (UniformKind::Vec3Array { .. }, UniformKind::Vec3Array { .. }) => true,
            (a, b) => a == b,
        };
        if !compatible {
            return Err(Error::UniformType {
                name: slot.name.clone(),
                expected: slot.kind.type_name(),
                found: found.type_name(),
            });
        }
        Ok(slot)
    }

    fn write(&mut self, offset: u32, values: &[u8]) {
        let start = offset as usize;
        if let Some(dst) = self.data.get_mut(start..start + values.len()) {
            dst.copy_from_slice(values);
        }
    }

    fn write_floats(&mut self, loc: usize, kind: UniformKind, v: &[f32]) -> Result<()> {
        let offset = self.slot(loc, kind)?.offset;
        self.write(offset, bytemuck::cast_slice(v));
        Ok(())
    }
}

impl UniformSink for UniformBlock {
    type Location = usize;

    fn location(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name == name)
    }

    fn set_i32(&mut self, loc: usize, v: i32) -> Result<()> {
        let slot = self.slot(loc, UniformKind::Int)?;
        if let UniformKind::TextureUnit { .. } = slot.kind {
            slot.unit = Some(u32::try_from(v).map_err(|_| Error::InvalidParameter {
                name: "texture unit",
                reason: format!("must be non-negative, got {v}"),
            })?);
            return Ok(());
        }
        let offset = slot.offset;
        self.write(offset, bytemuck::bytes_of(&v));
        Ok(())
    }

    fn set_f32(&mut self, loc: usize, v: f32) -> Result<()> {
        self.write_floats(loc, UniformKind::Float, &[v])
    }

    fn set_vec2(&mut self, loc: usize, v: [f32; 2]) -> Result<()> {
        self.write_floats(loc, UniformKind::Vec2, &v)
    }

    fn set_vec3(&mut self, loc: usize, v: [f32; 3]) -> Result<()> {
        self.write_floats(loc, UniformKind::Vec3, &v)
    }

    fn set_vec4(&mut self, loc: usize, v: [f32; 4]) -> Result<()> {
        self.write_floats(loc, UniformKind::Vec4, &v)
    }

    fn set_vec3_array(&mut self, loc: usize, v: &[f32]) -> Result<()> {
        let slot = self.slot(loc, UniformKind::Vec3Array { len: 0, stride: 0 })?;
        let UniformKind::Vec3Array { len, stride } = slot.kind else {
            return Ok(());
        };
        let (name, offset) = (slot.name.clone(), slot.offset);

        let triples = v.len() / 3;
        if v.len() % 3 != 0 || triples > len as usize {
            log::warn!(
                "uniform `{name}`: {} floats do not fit {len} RGB entries; extra values ignored",
                v.len()
            );
        }

        for i in 0..len as usize {
            let rgb = v.get(i * 3..i * 3 + 3).unwrap_or(&[0.0; 3]);
            self.write(offset + i as u32 * stride, bytemuck::cast_slice(rgb));
        }
        Ok(())
    }
}

/// Uniform buffers are allocated in 16-byte steps.
fn padded_size(span: u32) -> usize {
    (span.max(16) as usize).div_ceil(16) * 16
}

fn member_kind(module: &naga::Module, inner: &TypeInner) -> Option<UniformKind> {
    match inner {
        TypeInner::Scalar(s) if *s == Scalar::F32 => Some(UniformKind::Float),
        TypeInner::Scalar(s) if *s == Scalar::I32 => Some(UniformKind::Int),
        TypeInner::Vector { size, scalar } if *scalar == Scalar::F32 => Some(match size {
            VectorSize::Bi => UniformKind::Vec2,
            VectorSize::Tri => UniformKind::Vec3,
            VectorSize::Quad => UniformKind::Vec4,
        }),
        TypeInner::Array { base, size: ArraySize::Constant(len), stride } => {
            match &module.types[*base].inner {
                TypeInner::Vector { size: VectorSize::Tri, scalar } if *scalar == Scalar::F32 => {
                    Some(UniformKind::Vec3Array { len: len.get(), stride: *stride })
                }
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader::{gradient_source, GRAIN_WGSL, VERTEX_WGSL};

    /// Records which setter each uniform went through.
    #[derive(Default)]
    struct Recorder {
        names: Vec<&'static str>,
        calls: Vec<(String, &'static str)>,
    }

    impl UniformSink for Recorder {
        type Location = usize;

        fn location(&self, name: &str) -> Option<usize> {
            self.names.iter().position(|n| *n == name)
        }
        fn set_i32(&mut self, loc: usize, _: i32) -> Result<()> {
            self.calls.push((self.names[loc].to_string(), "i32"));
            Ok(())
        }
        fn set_f32(&mut self, loc: usize, _: f32) -> Result<()> {
            self.calls.push((self.names[loc].to_string(), "f32"));
            Ok(())
        }
        fn set_vec2(&mut self, loc: usize, _: [f32; 2]) -> Result<()> {
            self.calls.push((self.names[loc].to_string(), "vec2"));
            Ok(())
        }
        fn set_vec3(&mut self, loc: usize, _: [f32; 3]) -> Result<()> {
            self.calls.push((self.names[loc].to_string(), "vec3"));
            Ok(())
        }
        fn set_vec4(&mut self, loc: usize, _: [f32; 4]) -> Result<()> {
            self.calls.push((self.names[loc].to_string(), "vec4"));
            Ok(())
        }
        fn set_vec3_array(&mut self, loc: usize, _: &[f32]) -> Result<()> {
            self.calls.push((self.names[loc].to_string(), "vec3[]"));
            Ok(())
        }
    }

    fn reflected(label: &str, fs: &str) -> UniformBlock {
        UniformBlock::reflect(&ShaderProgram::build(label, VERTEX_WGSL, fs).unwrap()).unwrap()
    }

    fn read_f32(block: &UniformBlock, offset: usize) -> f32 {
        bytemuck::pod_read_unaligned(&block.bytes()[offset..offset + 4])
    }

    fn read_i32(block: &UniformBlock, offset: usize) -> i32 {
        bytemuck::pod_read_unaligned(&block.bytes()[offset..offset + 4])
    }

    // ── routing ───────────────────────────────────────────────────────────

    #[test]
    fn integer_uniforms_take_the_integer_path() {
        let mut sink = Recorder {
            names: vec![U_IMAGE, U_COLOR_COUNT, U_TIME, U_COLORS, U_RESOLUTION, "u_tint", "u_rect"],
            ..Default::default()
        };
        set_uniforms(
            &mut sink,
            &[
                (U_IMAGE, UniformValue::Scalar(0.0)),
                (U_COLOR_COUNT, UniformValue::Scalar(3.0)),
                (U_TIME, UniformValue::Scalar(1.5)),
                (U_COLORS, UniformValue::Array(vec![0.0; 9])),
                (U_RESOLUTION, UniformValue::Array(vec![800.0, 600.0])),
                ("u_tint", UniformValue::Array(vec![1.0, 0.5, 0.25])),
                ("u_rect", UniformValue::Array(vec![0.0, 0.0, 1.0, 1.0])),
                ("u_missing", UniformValue::Scalar(9.0)),
            ],
        )
        .unwrap();

        let got: Vec<(&str, &str)> = sink.calls.iter().map(|(n, k)| (n.as_str(), *k)).collect();
        assert_eq!(
            got,
            vec![
                (U_IMAGE, "i32"),
                (U_COLOR_COUNT, "i32"),
                (U_TIME, "f32"),
                (U_COLORS, "vec3[]"),
                (U_RESOLUTION, "vec2"),
                ("u_tint", "vec3"),
                ("u_rect", "vec4"),
            ]
        );
    }

    #[test]
    fn three_color_array_is_not_mistaken_for_a_vec3() {
        let mut sink = Recorder { names: vec![U_COLORS], ..Default::default() };
        set_uniforms(&mut sink, &[(U_COLORS, UniformValue::Array(vec![1.0, 0.0, 0.0]))]).unwrap();
        assert_eq!(sink.calls, vec![(U_COLORS.to_string(), "vec3[]")]);
    }

    #[test]
    fn odd_length_arrays_are_skipped() {
        let mut sink = Recorder { names: vec!["u_odd"], ..Default::default() };
        set_uniforms(&mut sink, &[("u_odd", UniformValue::Array(vec![1.0; 5]))]).unwrap();
        assert!(sink.calls.is_empty());
    }

    // ── reflection ────────────────────────────────────────────────────────

    #[test]
    fn gradient_layout_matches_std140() {
        let block = reflected("gradient", &gradient_source());
        assert_eq!(block.bytes().len(), 192);
        assert_eq!(block.kind(U_RESOLUTION), Some(UniformKind::Vec2));
        assert_eq!(block.kind(U_TIME), Some(UniformKind::Float));
        assert_eq!(block.kind(U_COLOR_COUNT), Some(UniformKind::Int));
        assert_eq!(block.kind(U_COLORS), Some(UniformKind::Vec3Array { len: 10, stride: 16 }));
    }

    #[test]
    fn grain_exposes_its_texture_unit() {
        let block = reflected("grain", GRAIN_WGSL);
        assert_eq!(block.kind(U_GRAIN_INTENSITY), Some(UniformKind::Float));
        assert_eq!(block.texture_binding(U_IMAGE), Some(unit_bindings(0).0));
        assert_eq!(block.bytes().len(), 16);
    }

    // ── writes ────────────────────────────────────────────────────────────

    #[test]
    fn routed_values_land_at_their_offsets() {
        let mut block = reflected("gradient", &gradient_source());
        set_uniforms(
            &mut block,
            &[
                (U_RESOLUTION, UniformValue::Array(vec![800.0, 600.0])),
                (U_TIME, UniformValue::Scalar(2.5)),
                (U_COLOR_COUNT, UniformValue::Scalar(2.0)),
                (U_COLORS, UniformValue::Array(vec![1.0, 0.5, 0.25, 0.0, 0.0, 1.0])),
            ],
        )
        .unwrap();

        assert_eq!(read_f32(&block, 0), 800.0);
        assert_eq!(read_f32(&block, 4), 600.0);
        assert_eq!(read_f32(&block, 8), 2.5);
        assert_eq!(read_i32(&block, 12), 2);
        assert_eq!(read_f32(&block, 32), 1.0);
        assert_eq!(read_f32(&block, 36), 0.5);
        assert_eq!(read_f32(&block, 40), 0.25);
        assert_eq!(read_f32(&block, 48 + 8), 1.0);
        // unused entries are zeroed
        assert_eq!(read_f32(&block, 64), 0.0);
    }

    #[test]
    fn float_path_into_integer_slot_is_rejected() {
        let mut block = reflected("gradient", &gradient_source());
        let loc = block.location(U_COLOR_COUNT).unwrap();
        let err = block.set_f32(loc, 3.0).unwrap_err();
        assert_eq!(
            err,
            Error::UniformType {
                name: U_COLOR_COUNT.to_string(),
                expected: "i32",
                found: "f32",
            }
        );
    }

    #[test]
    fn texture_unit_only_accepts_integers() {
        let mut block = reflected("grain", GRAIN_WGSL);
        let loc = block.location(U_IMAGE).unwrap();
        assert!(matches!(block.set_f32(loc, 0.0), Err(Error::UniformType { .. })));
        block.set_i32(loc, 0).unwrap();
        assert_eq!(block.texture_unit(U_IMAGE), Some(0));
        assert!(block.set_i32(loc, -1).is_err());
    }

    #[test]
    fn handwritten_layout_behaves_like_reflection() {
        let mut block = UniformBlock::with_layout(
            "manual",
            8,
            &[("u_grainIntensity", UniformKind::Float, 0), ("u_time", UniformKind::Float, 4)],
        );
        set_uniforms(&mut block, &[(U_TIME, UniformValue::Scalar(4.0))]).unwrap();
        assert_eq!(block.bytes().len(), 16);
        assert_eq!(read_f32(&block, 4), 4.0);
    }
}
