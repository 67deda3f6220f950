use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use bromascan::Scanner;

/// Scan a binary for a previously synthesized masked pattern catalog
/// (scanpat, §6 CLI surface).
///
/// The target platform is read from the pattern catalog itself (§6: every
/// pattern catalog carries a `"platform"` field) rather than passed on the
/// command line.
#[derive(Parser)]
#[command(name = "scanpat", version, about)]
struct Args {
    /// Binary to scan
    binary: PathBuf,

    /// Pattern catalog naming the methods to locate
    patterns: PathBuf,

    /// Where to write the resulting scan-result catalog
    output: PathBuf,

    /// Print per-method progress
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    fmt().with_env_filter(filter).without_time().with_target(false).init();

    let binary = std::fs::read(&args.binary)
        .with_context(|| format!("failed to read binary file {}", args.binary.display()))?;
    tracing::info!(bytes = binary.len(), path = %args.binary.display(), "read binary file");

    let (platform, classes) = bromascan_catalog::read_patterns(&args.patterns)
        .with_context(|| format!("failed to read pattern catalog {}", args.patterns.display()))?;
    tracing::info!(%platform, classes = classes.len(), "read pattern catalog");

    let summary = Scanner::new()
        .run(&binary, platform, classes)
        .context("pattern scan failed")?;

    bromascan_catalog::write_scan_results(&args.output, platform, &summary.classes)
        .with_context(|| format!("failed to write scan-result catalog {}", args.output.display()))?;

    let percent = if summary.total == 0 {
        0.0
    } else {
        (summary.successful as f64 / summary.total as f64) * 100.0
    };
    println!(
        "Scan complete: {} methods found, {} methods not found ({:.2}%)",
        summary.successful, summary.failed, percent
    );

    Ok(())
}
