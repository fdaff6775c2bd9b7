//! CLI tool to reproject an extent between two spatial references.
//!
//! Usage:
//!   reproject-extent --from EPSG:4326 --to EPSG:32633 --extent=-3,41,-2,40
//!   reproject-extent --from EPSG:4326 --to EPSG:32633 --describe
//!
//! Descriptors are WKT or authority ids. A descriptor starting with `@` is
//! read from the named file.
//!
//! Built with the `cli` feature:
//!   cargo build -p projection --features cli

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use geo_common::Extent;
use projection::{spatial_reference, CoordinateTransform, Direction};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionArg {
    Forward,
    Inverse,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Forward => Direction::Forward,
            DirectionArg::Inverse => Direction::Inverse,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "reproject-extent")]
#[command(about = "Reproject an extent by grid sampling")]
struct Args {
    /// Source reference (WKT, AUTH:CODE or @file)
    #[arg(long)]
    from: String,

    /// Target reference (WKT, AUTH:CODE or @file)
    #[arg(long)]
    to: String,

    /// Extent as ulx,uly,lrx,lry
    #[arg(long, allow_hyphen_values = true)]
    extent: Option<String>,

    /// Samples per axis
    #[arg(long, default_value_t = 10, env = "EXTENT_SAMPLE_GRID_SIZE")]
    grid_size: usize,

    #[arg(long, value_enum, default_value = "forward")]
    direction: DirectionArg,

    /// Print the classification of both references and exit
    #[arg(long)]
    describe: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn load_descriptor(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read descriptor from {}", path)),
        None => Ok(arg.to_string()),
    }
}

fn describe(label: &str, reference: &str) {
    println!("{}:", label);
    println!("  kind:       {:?}", spatial_reference::reference_kind(reference));
    let id = spatial_reference::authority_id(reference);
    if !id.is_empty() {
        println!("  authority:  {}", id);
    }
    if let Some(def) = spatial_reference::proj_definition(reference) {
        println!("  definition: {}", def);
    }
    let a = spatial_reference::spheroid_semi_major_axis(reference);
    if a > 0.0 {
        println!(
            "  spheroid:   a={} rf={}",
            a,
            spatial_reference::spheroid_inverse_flattening(reference)
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level, args.json)?;

    let from = load_descriptor(&args.from)?;
    let to = load_descriptor(&args.to)?;

    if args.describe {
        describe("source", &from);
        describe("target", &to);
        println!(
            "same reference: {}",
            spatial_reference::is_same_reference(&from, &to)
        );
        return Ok(());
    }

    let Some(extent_arg) = args.extent.as_deref() else {
        bail!("--extent is required unless --describe is given");
    };
    let mut extent: Extent = extent_arg.parse().context("Invalid --extent")?;

    let transform = CoordinateTransform::create(&from, &to)?;
    info!(identity = transform.is_identity(), "Transform created");

    let total = args.grid_size.saturating_mul(args.grid_size);
    let succeeded = transform.transform_extent(&mut extent, args.grid_size, args.direction.into());
    if succeeded == 0 {
        bail!("No sample of the extent could be transformed");
    }

    println!("{}", extent);
    println!("samples: {}/{}", succeeded, total);
    Ok(())
}
