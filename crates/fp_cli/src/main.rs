//! Field Planner CLI
//!
//! Preset dumps, offline perimeter extraction and snapshot checks for the
//! fp_core engine.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use fp_core::engine::config::{FieldConfig, GameVariant};
use fp_core::geometry::{extract_perimeter, Polygon, Raster, Rgb};
use fp_core::{Alliance, Session};

#[derive(Parser)]
#[command(name = "fieldplan")]
#[command(version = fp_core::VERSION)]
#[command(about = "Field geometry and inventory tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a variant preset
    Config {
        /// Game variant (ftc, frc)
        #[arg(long, default_value_t = GameVariant::Ftc)]
        variant: GameVariant,

        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },

    /// Trace the legal play area from a raw RGBA image
    Perimeter {
        /// Raw RGBA8 pixel file (width * height * 4 bytes)
        #[arg(long)]
        raw: PathBuf,

        #[arg(long)]
        width: usize,

        #[arg(long)]
        height: usize,

        /// Background colour as R,G,B
        #[arg(long, default_value = "0,0,0")]
        bg: Rgb,

        /// Field config (YAML or JSON); defaults to the FTC preset
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Import a session snapshot and report its contents
    Check {
        /// Snapshot JSON file
        snapshot: PathBuf,

        /// Field config (YAML or JSON); defaults to the FTC preset
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print a JSON schema
    Schema {
        /// Config file schema instead of the snapshot schema
        #[arg(long, default_value = "false")]
        config: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Config { variant, format } => {
            let config = FieldConfig::for_variant(variant);
            println!("{}", render(&config, format)?);
        }

        Commands::Perimeter { raw, width, height, bg, config } => {
            let config = load_config(config.as_deref())?;
            let polygon = run_perimeter(&raw, width, height, bg, &config)?;
            println!("{}", serde_json::to_string_pretty(&polygon)?);
        }

        Commands::Check { snapshot, config } => {
            let config = load_config(config.as_deref())?;
            let report = run_check(&snapshot, config)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Schema { config } => {
            let schema = if config { FieldConfig::schema() } else { fp_core::save::snapshot_schema() };
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings only so stdout stays parseable.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}

fn render<T: Serialize>(value: &T, format: Format) -> Result<String> {
    Ok(match format {
        Format::Yaml => serde_yaml::to_string(value)?,
        Format::Json => serde_json::to_string_pretty(value)?,
    })
}

/// YAML unless the file ends in `.json`. Validated before use.
fn load_config(path: Option<&Path>) -> Result<FieldConfig> {
    let Some(path) = path else {
        return Ok(FieldConfig::default());
    };

    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: FieldConfig = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&text)?,
        _ => serde_yaml::from_str(&text)?,
    };
    config.ensure_valid().with_context(|| format!("validating {}", path.display()))?;

    tracing::info!(variant = %config.variant, "loaded config from {}", path.display());
    Ok(config)
}

fn run_perimeter(raw: &Path, width: usize, height: usize, bg: Rgb, config: &FieldConfig) -> Result<Polygon> {
    let pixels = std::fs::read(raw).with_context(|| format!("reading {}", raw.display()))?;
    let len = pixels.len();
    let Some(raster) = Raster::from_rgba(width, height, pixels) else {
        bail!("{} holds {len} bytes, expected {} for {width}x{height} RGBA", raw.display(), width * height * 4);
    };

    let polygon = extract_perimeter(&raster, bg, &config.geometry, &config.perimeter);
    if polygon.is_empty() {
        bail!("no field found against background {bg}");
    }
    Ok(polygon)
}

#[derive(Debug, Serialize)]
struct AllianceReport {
    primary: usize,
    extension: usize,
    grid: usize,
    raw_score: u32,
    motif_score: u32,
    double_parked: bool,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    variant: GameVariant,
    robots: usize,
    floor: usize,
    total_items: usize,
    motif: String,
    red: AllianceReport,
    blue: AllianceReport,
}

fn run_check(snapshot: &Path, config: FieldConfig) -> Result<CheckReport> {
    let json = std::fs::read_to_string(snapshot).with_context(|| format!("reading {}", snapshot.display()))?;
    let mut session = Session::new(config)?;
    session
        .import_json(&json)
        .with_context(|| format!("rejected snapshot {}", snapshot.display()))?;

    let summary = |alliance: Alliance| {
        let classifier = session.inventory().classifier(alliance);
        AllianceReport {
            primary: classifier.primary.len(),
            extension: classifier.extension.len(),
            grid: session.inventory().slot_grid(alliance).occupied(),
            raw_score: session.raw_score(alliance),
            motif_score: session.motif_score(alliance),
            double_parked: session.double_parked(alliance),
        }
    };

    Ok(CheckReport {
        variant: session.config().variant,
        robots: session.robots().len(),
        floor: session.floor_items().len(),
        total_items: session.total_items(),
        motif: session.motif().to_string(),
        red: summary(Alliance::Red),
        blue: summary(Alliance::Blue),
    })
}
