//! Boxkit: bounding-box geometry for object-detection pipelines.
//!
//! Boxkit represents rectangular image regions, converts them between the
//! VOC, COCO and YOLO annotation conventions, computes overlap metrics and
//! decides whether one box is contained in another under a pluggable policy.
//! It works on already-extracted box coordinates; it is not a detector and
//! does not load datasets.
//!
//! # Modules
//!
//! - [`geometry`]: Coordinates, format adapters and the [`BoundingBox`](geometry::BoundingBox) facade
//! - [`containment`]: Containment policies and their configuration
//! - [`draw`]: Rendering boxes and labels onto RGB buffers
//! - [`error`]: Error types for boxkit operations

pub mod containment;
pub mod draw;
pub mod error;
pub mod geometry;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub use error::BoxError;

use containment::{BoxContainmentChecker, ContainmentConfig, ContainmentMethod};
use geometry::{AnyBox, BoundingBox, CocoBox, Coordinates, ImageShape, Space, VocBox, YoloBox};

/// The boxkit CLI application.
#[derive(Parser)]
#[command(name = "boxkit")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log conversions and decisions to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert one box to every supported format.
    Convert(ConvertArgs),
    /// Compute IoU and one-sided coverage of two pixel-space VOC boxes.
    Iou(IouArgs),
    /// Decide whether an inner VOC box is contained in an outer one.
    Contains(ContainsArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InputFormat {
    Voc,
    Coco,
    Yolo,
    Coords,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SpaceArg {
    Pixel,
    Normalized,
}

impl From<SpaceArg> for Space {
    fn from(arg: SpaceArg) -> Self {
        match arg {
            SpaceArg::Pixel => Space::Pixel,
            SpaceArg::Normalized => Space::Normalized,
        }
    }
}

/// Image dimensions shared by subcommands.
#[derive(clap::Args)]
struct ShapeArgs {
    /// Image height in pixels.
    #[arg(long, requires = "image_width")]
    image_height: Option<u32>,

    /// Image width in pixels.
    #[arg(long, requires = "image_height")]
    image_width: Option<u32>,
}

impl ShapeArgs {
    fn shape(&self) -> Result<Option<ImageShape>, BoxError> {
        match (self.image_height, self.image_width) {
            (Some(h), Some(w)) => ImageShape::new(h, w).map(Some),
            _ => Ok(None),
        }
    }
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// The four box values in the order of the chosen format.
    #[arg(
        num_args = 4,
        required = true,
        value_names = ["A", "B", "C", "D"],
        allow_negative_numbers = true
    )]
    values: Vec<f64>,

    /// Format of the input values.
    #[arg(long, value_enum, default_value = "voc")]
    format: InputFormat,

    /// Coordinate space of the input (defaults to normalized for YOLO, pixel otherwise).
    #[arg(long, value_enum)]
    space: Option<SpaceArg>,

    #[command(flatten)]
    shape: ShapeArgs,
}

/// Arguments for the iou subcommand.
#[derive(clap::Args)]
struct IouArgs {
    /// First box as XMIN YMIN XMAX YMAX.
    #[arg(short = 'a', long = "box-a", num_args = 4, required = true, allow_negative_numbers = true)]
    box_a: Vec<f64>,

    /// Second box as XMIN YMIN XMAX YMAX.
    #[arg(short = 'b', long = "box-b", num_args = 4, required = true, allow_negative_numbers = true)]
    box_b: Vec<f64>,
}

/// Arguments for the contains subcommand.
#[derive(clap::Args)]
struct ContainsArgs {
    /// Inner box as XMIN YMIN XMAX YMAX.
    #[arg(long, num_args = 4, required = true, allow_negative_numbers = true)]
    inner: Vec<f64>,

    /// Outer box as XMIN YMIN XMAX YMAX.
    #[arg(long, num_args = 4, required = true, allow_negative_numbers = true)]
    outer: Vec<f64>,

    /// Containment method ('iou', 'percentage_inside' or 'adaptive').
    #[arg(long, default_value = "adaptive", conflicts_with = "config")]
    method: String,

    /// Threshold the method's score must reach.
    #[arg(long, default_value_t = 0.5, conflicts_with = "config")]
    threshold: f64,

    /// YAML or JSON file with `method` and `threshold`.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Run the boxkit CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), BoxError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Iou(args)) => run_iou(args),
        Some(Commands::Contains(args)) => run_contains(args),
        None => {
            println!("boxkit {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Bounding-box conversion, overlap metrics and containment checks.");
            println!();
            println!("Run 'boxkit --help' for usage information.");
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Every representation of one box, as printed by `convert`.
#[derive(Serialize)]
struct ConversionReport {
    input_format: &'static str,
    image_shape: Option<ImageShape>,
    area: f64,
    pixel: Coordinates,
    voc: VocBox,
    coco: CocoBox,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalized: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    yolo: Option<YoloBox>,
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), BoxError> {
    let [a, b, c, d] = four(&args.values)?;
    let shape = args.shape.shape()?;

    let default_space = match args.format {
        InputFormat::Yolo => Space::Normalized,
        _ => Space::Pixel,
    };
    let space = args.space.map(Space::from).unwrap_or(default_space);

    let input: AnyBox = match args.format {
        InputFormat::Voc => VocBox::with_space(a, b, c, d, space)?.into(),
        InputFormat::Coco => CocoBox::with_space(a, b, c, d, space)?.into(),
        InputFormat::Yolo => YoloBox::with_space(a, b, c, d, space)?.into(),
        InputFormat::Coords => Coordinates::with_space(a, b, c, d, space)?.into(),
    };

    let bb = BoundingBox::new(input, shape)?;
    let report = ConversionReport {
        input_format: input.format_name(),
        image_shape: bb.image_shape(),
        area: bb.area(),
        pixel: *bb.pixel_box(),
        voc: bb.to_voc(false)?,
        coco: bb.to_coco(false)?,
        normalized: shape.map(|_| bb.to_coordinates(true)).transpose()?,
        yolo: shape.map(|_| bb.to_yolo()).transpose()?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[derive(Serialize)]
struct IouReport {
    iou: f64,
    intersection_area: f64,
    a_inside_b: f64,
    b_inside_a: f64,
}

/// Execute the iou subcommand.
fn run_iou(args: IouArgs) -> Result<(), BoxError> {
    let a = pixel_voc(&args.box_a)?;
    let b = pixel_voc(&args.box_b)?;

    let report = IouReport {
        iou: BoundingBox::iou(&a, &b),
        intersection_area: a.intersection_area(&b),
        a_inside_b: a.percentage_inside(&b),
        b_inside_a: b.percentage_inside(&a),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[derive(Serialize)]
struct ContainmentReport {
    method: ContainmentMethod,
    threshold: Option<f64>,
    score: Option<f64>,
    contained: bool,
}

/// Execute the contains subcommand.
fn run_contains(args: ContainsArgs) -> Result<(), BoxError> {
    let checker: BoxContainmentChecker = match &args.config {
        Some(path) => ContainmentConfig::read(path)?.build()?,
        None => ContainmentConfig::new(args.method.as_str(), Some(args.threshold)).build()?,
    };
    debug!(?checker, "containment checker ready");

    let inner = pixel_voc(&args.inner)?;
    let outer = pixel_voc(&args.outer)?;

    let report = ContainmentReport {
        method: checker.method(),
        threshold: checker.threshold(),
        score: checker.score(&inner, &outer),
        contained: checker.is_contained(&inner, &outer),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn four(values: &[f64]) -> Result<[f64; 4], BoxError> {
    <[f64; 4]>::try_from(values)
        .map_err(|_| BoxError::geometry(format!("expected 4 box values, got {}", values.len())))
}

fn pixel_voc(values: &[f64]) -> Result<BoundingBox, BoxError> {
    let [xmin, ymin, xmax, ymax] = four(values)?;
    BoundingBox::new(VocBox::new(xmin, ymin, xmax, ymax)?, None)
}
