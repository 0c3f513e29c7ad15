// Photo Critic CLI binary

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use photo_critic_lib::constants::ENV_LOG;
use photo_critic_lib::detection::DetectionRecord;
use photo_critic_lib::{score, tools, AnalyzerConfig, ImageInput, PhotoAnalyzer, ScoreResult};

#[derive(Parser)]
#[command(name = "photocritic")]
#[command(about = "Photo Critic - Scores photos and suggests improvements", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an image with the configured backends
    Analyze {
        /// Image file
        image: PathBuf,
        /// Image width in pixels (lets pixel-space face boxes be placed)
        #[arg(long, requires = "height")]
        width: Option<u32>,
        /// Image height in pixels
        #[arg(long, requires = "width")]
        height: Option<u32>,
        /// Seed for fallback scores (reproducible output)
        #[arg(long)]
        seed: Option<u64>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score a saved detection record (JSON)
    Score {
        /// Detection record file
        detections: PathBuf,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check backend and tool availability
    Tools,
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { image, width, height, seed, json } => cmd_analyze(&image, width.zip(height), seed, json),
        Commands::Score { detections, json } => cmd_score(&detections, json),
        Commands::Tools => cmd_tools(),
    }
}

fn init_logging() -> Result<()> {
    let filter = match EnvFilter::try_from_env(ENV_LOG) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

fn cmd_analyze(path: &Path, dimensions: Option<(u32, u32)>, seed: Option<u64>, json: bool) -> Result<()> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image {}", path.display()))?;

    let mut image = ImageInput::new(bytes, path.to_string_lossy());
    if let Some((width, height)) = dimensions {
        image = image.with_dimensions(width, height);
    }

    let config = AnalyzerConfig::from_env()?;
    let analyzer = PhotoAnalyzer::from_config(&config)?;

    let result = match seed {
        Some(seed) => analyzer.analyze_with_rng(&image, &mut StdRng::seed_from_u64(seed)),
        None => analyzer.analyze(&image),
    };

    print_result(&result, json)
}

fn cmd_score(path: &Path, json: bool) -> Result<()> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut record: DetectionRecord = serde_json::from_str(&data)
        .with_context(|| format!("Invalid detection record in {}", path.display()))?;
    record.sort_colors_by_coverage();

    // A record is always present here, so the rng is never drawn from
    let result = score(Some(&record), &mut StdRng::seed_from_u64(0));
    print_result(&result, json)
}

fn cmd_tools() -> Result<()> {
    let config = AnalyzerConfig::from_env()?;

    println!("Backends:");
    println!(
        "  vision:       {}",
        if config.vision_enabled() { "configured" } else { "not configured" }
    );
    println!(
        "  custom model: {}",
        if config.use_custom_model { "enabled" } else { "disabled" }
    );
    println!("  timeout:      {} ms", config.timeout.as_millis());
    println!();

    println!("Tools:");
    for (name, path) in [("python", tools::python_path()), ("evaluator", tools::evaluator_path())] {
        let status = if tools::is_tool_available(name) { "OK" } else { "NOT FOUND" };
        println!("  {:<10} {:<10} {}", name, status, path.display());
    }

    Ok(())
}

fn print_result(result: &ScoreResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("Overall:      {:>3}", result.overall);
    println!("  Composition {:>3}  ({}, {})", result.composition,
        result.composition_details.rule_of_thirds, result.composition_details.balance);
    println!("  Focus       {:>3}  ({}, {})", result.focus,
        result.focus_details.sharpness, result.focus_details.depth_of_field);
    println!("  Exposure    {:>3}  ({}, {})", result.exposure,
        result.exposure_details.brightness, result.exposure_details.dynamic_range);
    println!("  Color       {:>3}  ({}, {})", result.color,
        result.color_details.saturation, result.color_details.contrast);

    match result.fallback_reason {
        Some(reason) => println!("Method:       {:?} ({})", result.method, reason),
        None => println!("Method:       {:?}", result.method),
    }

    if !result.labels.is_empty() {
        println!("Labels:       {}", result.labels.join(", "));
    }
    if !result.logos.is_empty() {
        println!("Logos:        {}", result.logos.join(", "));
    }

    println!();
    println!("Recommendations:");
    for (i, rec) in result.recommendations.iter().enumerate() {
        println!("  {}. {}", i + 1, rec);
    }

    Ok(())
}
