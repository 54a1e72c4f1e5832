// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Meshquote Inc.

//! Meshquote CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use meshquote::cli::{discover_stl_files, BatchEntry, BatchReport, Reporter};
use meshquote::config::{BuildEnvelope, EngineConfig};
use meshquote::pipeline::{self, BatchRunner};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "meshquote")]
#[command(about = "Meshquote - STL geometry analysis and manufacturing estimation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration TOML (defaults to meshquote.toml when present)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an STL file and report its geometry metrics
    Analyze {
        /// Input STL file
        input: PathBuf,
    },

    /// Produce a full manufacturing quote for an STL file
    Quote {
        /// Input STL file
        input: PathBuf,

        /// Write the analysis record as JSON instead of a terminal report
        #[arg(short, long)]
        json: bool,
    },

    /// Search print orientations against the build envelope
    Orient {
        /// Input STL file
        input: PathBuf,

        /// Build envelope as WxDxH in mm, e.g. 220x220x250
        #[arg(short, long)]
        envelope: Option<String>,
    },

    /// Analyze a library of STL files with pacing between files
    Batch {
        /// Directory to scan for .stl files
        dir: PathBuf,

        /// JSON report output path
        #[arg(short, long, default_value = "meshquote-report.json")]
        out: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "meshquote=debug"
    } else {
        "meshquote=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::load()?,
    };

    match &cli.command {
        Commands::Analyze { input } => analyze_command(input, &config),
        Commands::Quote { input, json } => quote_command(input, *json, &config),
        Commands::Orient { input, envelope } => {
            orient_command(input, envelope.as_deref(), &config)
        }
        Commands::Batch { dir, out } => batch_command(dir, out, &config, cli.verbose),
        Commands::Version => {
            println!("Meshquote v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn read_mesh(input: &Path) -> Result<(Vec<u8>, f64)> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read mesh file: {}", input.display()))?;
    let size_mb = bytes.len() as f64 / (1024.0 * 1024.0);
    Ok((bytes, size_mb))
}

fn analyze_command(input: &Path, config: &EngineConfig) -> Result<()> {
    let (bytes, size_mb) = read_mesh(input)?;

    let start = std::time::Instant::now();
    let analysis = pipeline::analyze_bytes(&bytes, Some(size_mb), config);
    Reporter::report_analysis(&input.display().to_string(), &analysis, start.elapsed());

    Ok(())
}

fn quote_command(input: &Path, json: bool, config: &EngineConfig) -> Result<()> {
    let (bytes, size_mb) = read_mesh(input)?;

    let start = std::time::Instant::now();
    let analysis = pipeline::analyze_bytes(&bytes, Some(size_mb), config);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    if analysis.estimate.is_none() {
        Reporter::report_error("Estimator configuration is out of range; no quote produced");
        std::process::exit(1);
    }
    Reporter::report_analysis(&input.display().to_string(), &analysis, start.elapsed());

    Ok(())
}

fn orient_command(input: &Path, envelope: Option<&str>, config: &EngineConfig) -> Result<()> {
    let (bytes, _) = read_mesh(input)?;

    let mut config = config.clone();
    if let Some(raw) = envelope {
        config.envelope = parse_envelope(raw)?;
    }

    match pipeline::orient_bytes(&bytes, &config) {
        Ok(candidate) => {
            if !candidate.fits {
                Reporter::report_warning(
                    "Model exceeds the build volume; showing identity rotation",
                );
            }
            Reporter::report_orientation(&input.display().to_string(), &candidate);
            Ok(())
        }
        Err(error) => {
            Reporter::report_error(&format!("Cannot orient: {}", error));
            std::process::exit(1);
        }
    }
}

fn batch_command(dir: &Path, out: &Path, config: &EngineConfig, verbose: bool) -> Result<()> {
    use colored::Colorize;
    use indicatif::{ProgressBar, ProgressStyle};

    if !dir.is_dir() {
        Reporter::report_error(&format!("Not a directory: {}", dir.display()));
        std::process::exit(1);
    }

    let pending = discover_stl_files(dir);
    if pending.is_empty() {
        Reporter::report_warning("No .stl files found");
        return Ok(());
    }

    let runner = BatchRunner::from_settings(&config.batch);
    let planned = pending.len().min(config.batch.max_per_run);

    let progress = ProgressBar::new(planned as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut report = BatchReport::new(pending.len());
    let mut entries = Vec::new();

    let processed = runner.run(&pending, |path| {
        progress.set_message(format!("{}", path.display()));
        match std::fs::read(path) {
            Ok(bytes) => {
                let size_mb = bytes.len() as f64 / (1024.0 * 1024.0);
                let analysis = pipeline::analyze_bytes(&bytes, Some(size_mb), config);
                entries.push(BatchEntry::from_analysis(path, size_mb, &analysis));
            }
            Err(error) => {
                if verbose {
                    Reporter::report_warning(&format!(
                        "Skipping {}: {}",
                        path.display(),
                        error
                    ));
                }
            }
        }
        progress.inc(1);
    });
    progress.finish_with_message("Batch complete");

    for entry in entries {
        report.push(entry);
    }
    report.write_json(out)?;

    println!("\n{}", "═".repeat(80).bright_black());
    println!("{}", "Batch Summary".bold());
    println!("{}", "═".repeat(80).bright_black());
    println!(
        "  {} {}",
        "Discovered:".bright_black(),
        report.discovered.to_string().cyan()
    );
    println!(
        "  {} {}",
        "Processed:".bright_black(),
        processed.to_string().cyan()
    );
    let degraded = report.entries.iter().filter(|e| e.degraded).count();
    println!(
        "  {} {}",
        "Degraded:".bright_black(),
        if degraded > 0 {
            degraded.to_string().yellow()
        } else {
            degraded.to_string().green()
        }
    );
    if report.discovered > processed {
        println!(
            "  {} {}",
            "Deferred:".bright_black(),
            (report.discovered - processed).to_string().yellow()
        );
    }
    println!(
        "  {} {}",
        "Report:".bright_black(),
        out.display().to_string().cyan()
    );
    println!("{}", "═".repeat(80).bright_black());

    Ok(())
}

fn parse_envelope(raw: &str) -> Result<BuildEnvelope> {
    let parts: Vec<&str> = raw.split(['x', 'X']).collect();
    if parts.len() != 3 {
        anyhow::bail!("Envelope must be WxDxH in mm, e.g. 220x220x250");
    }
    let mut dims = [0f64; 3];
    for (slot, part) in dims.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Invalid envelope dimension: {}", part))?;
    }
    let envelope = BuildEnvelope::new(dims[0], dims[1], dims[2]);
    if !envelope.is_valid() {
        anyhow::bail!("Envelope dimensions must be positive");
    }
    Ok(envelope)
}
