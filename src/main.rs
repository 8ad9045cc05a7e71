//! tierpack CLI - plan test batches from history.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use tierpack::analyze::analyze;
use tierpack::config::{self, Config, OutputFormat};
use tierpack::manifest::Manifest;
use tierpack::report;
use tierpack::strategy::Strategy;

#[derive(Parser)]
#[command(name = "tierpack")]
#[command(about = "Group test files into parallel tiers", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "tierpack.toml")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group the units in a manifest and print the plan
    Plan {
        /// JSON manifest with units and their history
        #[arg(short, long)]
        manifest: PathBuf,

        /// Override the worker budget
        #[arg(short, long, allow_negative_numbers = true)]
        workers: Option<i64>,

        /// Override the strategy (balanced, fast-fail, dependency-aware, resource-optimized)
        #[arg(short, long)]
        strategy: Option<Strategy>,

        /// Output format (text, json)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Append the efficiency report
        #[arg(long)]
        analyze: bool,
    },

    /// Validate configuration file
    Validate,

    /// Initialize a new configuration file
    Init {
        /// Default strategy
        #[arg(short, long, default_value = "balanced")]
        strategy: Strategy,

        /// Default worker budget
        #[arg(short, long, default_value_t = 4, allow_negative_numbers = true)]
        workers: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Plan {
            manifest,
            workers,
            strategy,
            format,
            analyze,
        } => plan(&cli.config, &manifest, workers, strategy, format, analyze),
        Commands::Validate => validate_config(&cli.config),
        Commands::Init { strategy, workers } => init_config(&cli.config, strategy, workers),
    }
}

/// Loads the config if the file exists, falling back to defaults.
fn load_or_default(config_path: &Path) -> Result<Config> {
    if config_path.exists() {
        let config = config::load_config(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
        info!("Loaded configuration from {}", config_path.display());
        Ok(config)
    } else {
        debug!(
            "No config at {}, using defaults",
            config_path.display()
        );
        Ok(Config::default())
    }
}

fn plan(
    config_path: &Path,
    manifest_path: &Path,
    workers: Option<i64>,
    strategy: Option<Strategy>,
    format: Option<OutputFormat>,
    analyze_flag: bool,
) -> Result<()> {
    let mut config = load_or_default(config_path)?;

    // Apply overrides
    if let Some(workers) = workers {
        config.scheduler.max_workers = workers;
    }
    if let Some(strategy) = strategy {
        config.scheduler.strategy = strategy;
    }
    if let Some(format) = format {
        config.report.format = format;
    }
    if analyze_flag {
        config.report.analyze = true;
    }

    let manifest = Manifest::load(manifest_path)?;
    let units = manifest.work_units();
    let schedule = config.scheduler().group(&units);
    let efficiency = config.report.analyze.then(|| analyze(&schedule));

    match config.report.format {
        OutputFormat::Json => {
            let json = report::render_json(&schedule, efficiency.as_ref())
                .context("Failed to serialize plan")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            print!("{}", report::render_text(&schedule, efficiency.as_ref()));
        }
    }

    Ok(())
}

fn validate_config(config_path: &Path) -> Result<()> {
    match config::load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("Settings:");
            println!(
                "  Max workers: {} (effective {})",
                config.scheduler.max_workers,
                config.scheduler().max_workers()
            );
            println!("  Strategy: {}", config.scheduler.strategy);
            println!("  Format: {}", config.report.format);
            println!("  Analyze: {}", config.report.analyze);
            Ok(())
        }
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_config(config_path: &Path, strategy: Strategy, workers: i64) -> Result<()> {
    let config = format!(
        r#"# tierpack configuration file

[scheduler]
# Workers the test runner uses in parallel (values below 1 mean 1)
max_workers = {}
# balanced | fast-fail | dependency-aware | resource-optimized
strategy = "{}"

[report]
# text | json
format = "text"
analyze = false
"#,
        workers, strategy
    );

    if config_path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit manually.",
            config_path.display()
        );
        std::process::exit(1);
    }

    std::fs::write(config_path, config)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {}", config_path.display());
    println!();
    println!("Edit the configuration as needed, then run:");
    println!("  tierpack plan --manifest units.json");

    Ok(())
}
