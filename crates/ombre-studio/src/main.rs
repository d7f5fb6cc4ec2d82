mod app;
mod presets;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use winit::dpi::LogicalSize;

use ombre_engine::coords::{Orientation, OutputTarget};
use ombre_engine::descriptor::{GradientKind, GrainSettings, RadialShape, RenderDescriptor, StyleSettings};
use ombre_engine::device::GpuInit;
use ombre_engine::logging::{init_logging, LoggingConfig};
use ombre_engine::paint::Palette;
use ombre_engine::raster::{encode_png, export_file_name, random_suffix, RasterConfig, RasterEngine};
use ombre_engine::window::{Runtime, RuntimeConfig};

use crate::app::StudioApp;

#[derive(Debug, Parser)]
#[command(name = "ombre", version, about = "Gradient background generator")]
struct Cli {
    /// More log output (-v debug, -vv trace for ombre crates).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the animated preview window.
    Animate(AnimateArgs),
    /// Render a still gradient to a PNG file.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
struct AnimateArgs {
    /// Starting preset.
    #[arg(long, default_value = "Oceanic Flow")]
    preset: String,

    /// Window width in logical pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Window height in logical pixels.
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Directory snapshots are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Use an sRGB surface.
    #[arg(long)]
    srgb: bool,
}

#[derive(Debug, Args)]
struct ExportArgs {
    #[arg(long, default_value_t = 1920)]
    width: u32,

    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Device pixel ratio; `--scale 2` writes a 2x image of the same layout.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Swap width and height if needed to get this orientation.
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Comma-separated hex stops, e.g. `#f00,#0000ff`.
    #[arg(long, value_delimiter = ',', default_value = "#ff0000,#0000ff")]
    colors: Vec<String>,

    #[arg(long, value_enum, default_value_t = StyleArg::Linear)]
    style: StyleArg,

    /// Linear/blotchy direction in degrees (90 runs left to right).
    #[arg(long, default_value_t = 90.0, allow_negative_numbers = true)]
    angle: f32,

    #[arg(long, value_enum, default_value_t = ShapeArg::Circle)]
    shape: ShapeArg,

    /// Blob softness and count for the blotchy style, in [0, 1].
    #[arg(long, default_value_t = 0.5)]
    blotchiness: f32,

    /// Film grain opacity in [0, 1]. Omit for no grain.
    #[arg(long)]
    grain: Option<f32>,

    /// Seed for reproducible blotches and grain.
    #[arg(long)]
    seed: Option<u64>,

    /// Output path. Defaults to `gradient-background-{w}x{h}-{random}.png`.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum StyleArg {
    Linear,
    Radial,
    Blotchy,
}

impl From<StyleArg> for GradientKind {
    fn from(s: StyleArg) -> Self {
        match s {
            StyleArg::Linear => GradientKind::Linear,
            StyleArg::Radial => GradientKind::Radial,
            StyleArg::Blotchy => GradientKind::Blotchy,
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum ShapeArg {
    Circle,
    Ellipse,
}

impl From<ShapeArg> for RadialShape {
    fn from(s: ShapeArg) -> Self {
        match s {
            ShapeArg::Circle => RadialShape::Circle,
            ShapeArg::Ellipse => RadialShape::Ellipse,
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum OrientationArg {
    Landscape,
    Portrait,
}

impl From<OrientationArg> for Orientation {
    fn from(o: OrientationArg) -> Self {
        match o {
            OrientationArg::Landscape => Orientation::Landscape,
            OrientationArg::Portrait => Orientation::Portrait,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::from_verbosity(cli.verbose));

    match cli.command {
        Command::Animate(args) => animate(args),
        Command::Export(args) => export(args),
    }
}

fn animate(args: AnimateArgs) -> Result<()> {
    let preset = presets::position(&args.preset).with_context(|| {
        format!(
            "unknown preset {:?} (known: {})",
            args.preset,
            presets::names().join(", ")
        )
    })?;

    let config = RuntimeConfig {
        title: "ombre".to_string(),
        initial_size: LogicalSize::new(args.width, args.height),
    };
    let gpu_init = GpuInit {
        prefer_srgb: args.srgb,
        ..GpuInit::default()
    };

    Runtime::run(config, gpu_init, StudioApp::new(preset, args.out_dir))
}

/// Output size in device pixels: the logical size times `--scale`, then
/// turned to the requested orientation.
fn export_target(args: &ExportArgs) -> Result<OutputTarget> {
    let target = OutputTarget::from_logical(args.width as f32, args.height as f32, args.scale)
        .context("invalid --scale")?;
    Ok(match args.orientation {
        Some(orientation) => target.with_orientation(orientation.into()),
        None => target,
    })
}

fn export(args: ExportArgs) -> Result<()> {
    let palette = Palette::new(args.colors.iter().map(String::as_str)).context("invalid --colors")?;

    let settings = StyleSettings {
        kind: args.style.into(),
        angle_degrees: args.angle,
        radial_shape: args.shape.into(),
        blotchiness: args.blotchiness,
    };

    let target = export_target(&args)?;

    let grain = args.grain.map(GrainSettings::new).unwrap_or(GrainSettings::OFF);
    let desc = RenderDescriptor::from_palette(target, &palette, settings.style()).with_grain(grain);

    let mut engine = RasterEngine::new(RasterConfig {
        seed: args.seed,
        ..RasterConfig::default()
    });
    let image = engine.render(&desc).context("render failed")?;
    let png = encode_png(&image).context("PNG encoding failed")?;

    let path = args.out.unwrap_or_else(|| {
        PathBuf::from(export_file_name(target, &random_suffix(&mut rand::rng())))
    });
    std::fs::write(&path, png).with_context(|| format!("failed to write {}", path.display()))?;

    log::info!(
        "wrote {} ({}x{}, {} colors)",
        path.display(),
        target.width,
        target.height,
        palette.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn export_defaults_match_the_editor() {
        let cli = Cli::try_parse_from(["ombre", "export"]).unwrap();
        let Command::Export(args) = cli.command else { panic!("expected export") };
        assert_eq!((args.width, args.height), (1920, 1080));
        assert_eq!(args.colors, vec!["#ff0000", "#0000ff"]);
        assert_eq!(args.angle, 90.0);
        assert!(args.grain.is_none());
        assert_eq!(args.scale, 1.0);
    }

    #[test]
    fn scale_multiplies_the_exported_size() {
        let cli = Cli::try_parse_from(["ombre", "export", "--width", "640", "--height", "360", "--scale", "1.5"])
            .unwrap();
        let Command::Export(args) = cli.command else { panic!("expected export") };
        assert_eq!(export_target(&args).unwrap(), OutputTarget::new(960, 540));
    }

    #[test]
    fn scale_applies_before_orientation() {
        let cli = Cli::try_parse_from(["ombre", "export", "--scale", "2", "--orientation", "portrait"]).unwrap();
        let Command::Export(args) = cli.command else { panic!("expected export") };
        assert_eq!(export_target(&args).unwrap(), OutputTarget::new(2160, 3840));
    }

    #[test]
    fn zero_scale_is_rejected() {
        let cli = Cli::try_parse_from(["ombre", "export", "--scale", "0"]).unwrap();
        let Command::Export(args) = cli.command else { panic!("expected export") };
        assert!(export_target(&args).is_err());
    }

    #[test]
    fn export_flags_parse() {
        let cli = Cli::try_parse_from([
            "ombre", "-v", "export", "--colors", "#f00,#0f0,#00f", "--style", "blotchy",
            "--angle", "-45", "--orientation", "portrait", "--seed", "7",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Command::Export(args) = cli.command else { panic!("expected export") };
        assert_eq!(args.colors.len(), 3);
        assert!(matches!(args.style, StyleArg::Blotchy));
        assert_eq!(args.angle, -45.0);
        assert_eq!(args.seed, Some(7));
    }
}
