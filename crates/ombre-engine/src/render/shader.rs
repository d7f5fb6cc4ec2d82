//! Shader sources, per-stage compilation and program linking.
//!
//! Compilation is a `naga` WGSL parse plus full validation. Linking checks
//! that the vertex stage produces every location the fragment stage reads,
//! with the same type. Both run on the CPU, so a broken shader is reported
//! with its diagnostic before any GPU object is created.

use naga::{Binding, ShaderStage, TypeInner};

use crate::error::{Error, Result};

/// Full-screen quad vertex stage shared by both programs.
pub const VERTEX_WGSL: &str = include_str!("shaders/fullscreen.wgsl");
/// Noise and geometry helpers injected into the gradient stage.
pub const COMMON_WGSL: &str = include_str!("shaders/common.wgsl");
/// Gradient fragment stage (needs [`COMMON_WGSL`] injected).
pub const GRADIENT_WGSL: &str = include_str!("shaders/gradient.wgsl");
/// Grain fragment stage.
pub const GRAIN_WGSL: &str = include_str!("shaders/grain.wgsl");

/// Marker replaced by the shared helpers.
pub const COMMON_PLACEHOLDER: &str = "{{common_wgsl}}";

/// Replaces the first [`COMMON_PLACEHOLDER`] in `fragment` with `common`.
pub fn inject_common(fragment: &str, common: &str) -> String {
    fragment.replacen(COMMON_PLACEHOLDER, common, 1)
}

/// Gradient fragment source with the bundled helpers injected.
pub fn gradient_source() -> String {
    inject_common(GRADIENT_WGSL, COMMON_WGSL)
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    /// Entry point every stage module must export.
    pub const fn entry_point(self) -> &'static str {
        match self {
            Stage::Vertex => "vs_main",
            Stage::Fragment => "fs_main",
        }
    }

    fn naga(self) -> ShaderStage {
        match self {
            Stage::Vertex => ShaderStage::Vertex,
            Stage::Fragment => ShaderStage::Fragment,
        }
    }
}

/// A parsed and validated stage module.
#[derive(Debug)]
pub struct CompiledStage {
    pub label: String,
    pub stage: Stage,
    pub source: String,
    pub module: naga::Module,
}

impl CompiledStage {
    fn entry(&self) -> Option<&naga::EntryPoint> {
        let name = self.stage.entry_point();
        let stage = self.stage.naga();
        self.module
            .entry_points
            .iter()
            .find(|ep| ep.name == name && ep.stage == stage)
    }
}

/// Parses and validates one stage.
pub fn compile_stage(label: &str, stage: Stage, source: &str) -> Result<CompiledStage> {
    let compile_err = |diagnostic: String| Error::ShaderCompile {
        label: label.to_string(),
        diagnostic,
    };

    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| compile_err(e.emit_to_string(source)))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| compile_err(e.emit_to_string(source)))?;

    let compiled = CompiledStage {
        label: label.to_string(),
        stage,
        source: source.to_string(),
        module,
    };
    if compiled.entry().is_none() {
        return Err(compile_err(format!(
            "missing {:?} entry point `{}`",
            stage,
            stage.entry_point()
        )));
    }

    log::debug!("shader `{label}` compiled ({stage:?})");
    Ok(compiled)
}

/// A linked vertex + fragment pair.
#[derive(Debug)]
pub struct ShaderProgram {
    pub label: String,
    pub vertex: CompiledStage,
    pub fragment: CompiledStage,
}

impl ShaderProgram {
    /// Compiles both stages from source and links them.
    pub fn build(label: &str, vertex_src: &str, fragment_src: &str) -> Result<Self> {
        let vertex = compile_stage(&format!("{label}.vs"), Stage::Vertex, vertex_src)?;
        let fragment = compile_stage(&format!("{label}.fs"), Stage::Fragment, fragment_src)?;
        Self::link(label, vertex, fragment)
    }

    /// Checks the stage interface.
    ///
    /// Every fragment input location must be written by the vertex stage with
    /// an identical type. Extra vertex outputs are allowed.
    pub fn link(label: &str, vertex: CompiledStage, fragment: CompiledStage) -> Result<Self> {
        let link_err = |diagnostic: String| Error::ShaderLink {
            label: label.to_string(),
            diagnostic,
        };

        if vertex.stage != Stage::Vertex || fragment.stage != Stage::Fragment {
            return Err(link_err(format!(
                "expected a vertex and a fragment stage, got {:?} and {:?}",
                vertex.stage, fragment.stage
            )));
        }

        let (Some(vs), Some(fs)) = (vertex.entry(), fragment.entry()) else {
            return Err(link_err("missing entry point".to_string()));
        };

        let outputs = vertex_outputs(&vertex.module, vs);
        for (location, ty) in fragment_inputs(&fragment.module, fs) {
            match outputs.iter().find(|(l, _)| *l == location) {
                None => {
                    return Err(link_err(format!(
                        "fragment input @location({location}) is not written by the vertex stage"
                    )));
                }
                Some((_, out_ty)) if *out_ty != ty => {
                    return Err(link_err(format!(
                        "@location({location}) type mismatch: vertex writes {out_ty:?}, fragment reads {ty:?}"
                    )));
                }
                Some(_) => {}
            }
        }

        log::debug!("program `{label}` linked");
        Ok(Self { label: label.to_string(), vertex, fragment })
    }
}

/// `(location, type)` pairs for user-defined varyings, flattening IO structs.
fn locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&Binding>,
    out: &mut Vec<(u32, TypeInner)>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => {
            out.push((*location, module.types[ty].inner.clone()));
        }
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    locations(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

fn vertex_outputs(module: &naga::Module, ep: &naga::EntryPoint) -> Vec<(u32, TypeInner)> {
    let mut out = Vec::new();
    if let Some(result) = &ep.function.result {
        locations(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

fn fragment_inputs(module: &naga::Module, ep: &naga::EntryPoint) -> Vec<(u32, TypeInner)> {
    let mut out = Vec::new();
    for arg in &ep.function.arguments {
        locations(module, arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}
