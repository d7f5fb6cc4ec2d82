use std::fmt;

use crate::render::PipelineState;

/// Errors surfaced by the compositing engine.
///
/// Rendering itself never fails on degenerate input (zero-area targets, too few
/// stops); those cases are silent no-ops. Errors are reserved for rejected
/// edits, invalid descriptors, and GPU bring-up failures.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A color string was not `#RGB` or `#RRGGBB`.
    InvalidFormat(String),
    /// A numeric descriptor field was NaN, infinite, or out of range.
    InvalidParameter { name: &'static str, reason: String },
    /// A palette edit would leave the stop count outside `[min, max]`.
    ColorLimit { min: usize, max: usize, attempted: usize },
    /// No palette entry carries the given id.
    UnknownColor(u32),
    /// A rendering surface or GPU context could not be acquired.
    ResourceUnavailable(String),
    /// A shader stage failed to parse or validate.
    ShaderCompile { label: String, diagnostic: String },
    /// Vertex and fragment stages do not agree on their interface.
    ShaderLink { label: String, diagnostic: String },
    /// A uniform value was routed to a slot of a different type.
    UniformType { name: String, expected: &'static str, found: &'static str },
    /// The pipeline was asked to draw before its programs were ready.
    NotReady(PipelineState),
    /// The off-screen target does not match the requested output size.
    StaleTarget { allocated: (u32, u32), requested: (u32, u32) },
    /// Image encoding or GPU readback failed.
    Encode(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidFormat(input) => {
                write!(f, "invalid hex color {input:?}: expected #RGB or #RRGGBB")
            }
            Error::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter `{name}`: {reason}")
            }
            Error::ColorLimit { min, max, attempted } => write!(
                f,
                "palette must hold between {min} and {max} colors (edit would leave {attempted})"
            ),
            Error::UnknownColor(id) => write!(f, "no color with id {id}"),
            Error::ResourceUnavailable(what) => write!(f, "rendering resource unavailable: {what}"),
            Error::ShaderCompile { label, diagnostic } => {
                write!(f, "failed to compile shader `{label}`:\n{diagnostic}")
            }
            Error::ShaderLink { label, diagnostic } => {
                write!(f, "failed to link program `{label}`: {diagnostic}")
            }
            Error::UniformType { name, expected, found } => {
                write!(f, "uniform `{name}` expects {expected} but was set through the {found} path")
            }
            Error::NotReady(state) => write!(f, "pipeline is not ready to render (state: {state:?})"),
            Error::StaleTarget { allocated, requested } => write!(
                f,
                "off-screen target is {}x{} but {}x{} was requested",
                allocated.0, allocated.1, requested.0, requested.1
            ),
            Error::Encode(msg) => write!(f, "image encoding failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
