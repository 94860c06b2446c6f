use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use image::GrayImage;
use serde::{Deserialize, Serialize};
use vectrace::{
    Image, PenState, Point2f, RasterSurface, Resolution, Rgba, Stroke, StrokeTrace, TraceSettings,
    pixel_buffer_from_rgba,
};

#[derive(Parser, Debug)]
#[command(name = "vectrace")]
#[command(about = "Trace raster sketches into SVG")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Edge strokes fitted with quadratic curves.
    #[command(name = "strokes")]
    Strokes(StrokesArgs),
    /// Dark-pixel polylines on a white background, scaled to a resolution.
    #[command(name = "polyline")]
    Polyline(PolylineArgs),
    /// Rescale an existing SVG document.
    #[command(name = "rescale")]
    Rescale(RescaleArgs),
}

#[derive(Args, Debug, Clone)]
struct StrokesArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, required = true)]
    out: PathBuf,
    /// JSON settings file; missing keys take their defaults.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Grayscale PNG redraw of the strokes.
    #[arg(long)]
    preview: Option<PathBuf>,
    /// Stroke list and run state as JSON.
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct PolylineArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, required = true)]
    out: PathBuf,
    #[arg(long, default_value_t = 2)]
    line_thickness: u8,
    #[arg(long, default_value_t = 52)]
    simplify_level: u8,
    #[arg(long, default_value = "xxxl")]
    resolution: Resolution,
}

#[derive(Args, Debug, Clone)]
struct RescaleArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, required = true)]
    out: PathBuf,
    /// Resolution key; unknown keys keep the size.
    #[arg(long, default_value = "xxxl")]
    resolution: String,
    #[arg(long, default_value_t = 512.0)]
    base_width: f64,
    #[arg(long, default_value_t = 512.0)]
    base_height: f64,
}

#[derive(Debug, Serialize)]
struct StrokeDto {
    pen: &'static str,
    p0: [f32; 2],
    p1: [f32; 2],
    p2: [f32; 2],
    width0: f32,
    width2: f32,
}

impl From<&Stroke> for StrokeDto {
    fn from(s: &Stroke) -> Self {
        let xy = |p: Point2f| [p.x, p.y];
        Self {
            pen: match s.pen {
                PenState::Down => "down",
                PenState::Up => "up",
            },
            p0: xy(s.curve.p0),
            p1: xy(s.curve.p1),
            p2: xy(s.curve.p2),
            width0: s.curve.width0,
            width2: s.curve.width2,
        }
    }
}

#[derive(Debug, Serialize)]
struct WindowDto {
    position: [f32; 2],
    size: usize,
}

#[derive(Debug, Serialize)]
struct TraceDump<'a> {
    width: usize,
    height: usize,
    settings: &'a TraceSettings,
    window: WindowDto,
    strokes: Vec<StrokeDto>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Strokes(args) => run_strokes(args),
        Command::Polyline(args) => run_polyline(args),
        Command::Rescale(args) => run_rescale(args),
    }
}

fn run_strokes(args: StrokesArgs) -> Result<()> {
    let settings: TraceSettings = match &args.settings {
        Some(path) => read_json(path)?,
        None => TraceSettings::default(),
    };
    let img = load_input_rgba(&args.input)?;

    let Some(StrokeTrace {
        strokes,
        svg,
        window,
    }) = vectrace::trace(&img.as_view(), &settings)
    else {
        anyhow::bail!("input image {} is empty", args.input.display());
    };

    write_text(&args.out, &svg)?;
    tracing::info!(
        strokes = strokes.len(),
        out = %args.out.display(),
        "wrote stroke svg"
    );

    if let Some(path) = &args.preview {
        let mut surface = RasterSurface::new(img.width(), img.height());
        vectrace::render(&strokes, &mut surface);
        save_u8_image(path, &surface.into_image())?;
        tracing::info!(out = %path.display(), "wrote preview");
    }

    if let Some(path) = &args.json {
        let dump = TraceDump {
            width: img.width(),
            height: img.height(),
            settings: &settings,
            window: WindowDto {
                position: [window.position.x, window.position.y],
                size: window.size,
            },
            strokes: strokes.iter().map(StrokeDto::from).collect(),
        };
        write_json(path, &dump)?;
    }

    Ok(())
}

fn run_polyline(args: PolylineArgs) -> Result<()> {
    let img = load_input_rgba(&args.input)?;
    let settings = TraceSettings {
        line_thickness: args.line_thickness,
        simplify_level: args.simplify_level,
        output_resolution: args.resolution,
        ..TraceSettings::default()
    };

    let svg = vectrace::vectorize(&img.as_view(), &settings)
        .with_context(|| format!("input image {} is empty", args.input.display()))?;

    write_text(&args.out, &svg)?;
    tracing::info!(
        resolution = %args.resolution,
        out = %args.out.display(),
        "wrote polyline svg"
    );
    Ok(())
}

fn run_rescale(args: RescaleArgs) -> Result<()> {
    let svg = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let out = vectrace::rescale(&svg, &args.resolution, args.base_width, args.base_height);
    write_text(&args.out, &out)
}

fn load_input_rgba(path: &Path) -> Result<Image<Rgba>> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let rgba = dyn_img.to_rgba8();
    let (w, h) = rgba.dimensions();

    pixel_buffer_from_rgba(w as usize, h as usize, rgba.as_raw())
        .with_context(|| format!("constructing pixel buffer from {}", path.display()))
}

fn save_u8_image(path: &Path, img: &Image<u8>) -> Result<()> {
    let gray = GrayImage::from_raw(img.width() as u32, img.height() as u32, img.data().to_vec())
        .context("constructing GrayImage from raw bytes")?;
    gray.save(path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}
