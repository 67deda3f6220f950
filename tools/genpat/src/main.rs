use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use bromascan::Generator;

/// Synthesize a masked byte-pattern catalog from a binary and a binding
/// catalog (genpat, §6 CLI surface).
#[derive(Parser)]
#[command(name = "genpat", version, about)]
struct Args {
    /// Target platform: auto, win, imac, m1, ios
    #[arg(short, long, default_value = "auto")]
    platform: String,

    /// Binary to synthesize patterns against
    binary: PathBuf,

    /// Binding catalog naming the methods to synthesize patterns for
    catalog: PathBuf,

    /// Where to write the resulting pattern catalog
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

    let platform = bromascan::resolve_platform(&args.platform, &binary)
        .with_context(|| format!("failed to resolve platform {:?}", args.platform))?;
    tracing::info!(%platform, "resolved platform");

    let classes = bromascan_catalog::read_bindings(&args.catalog)
        .with_context(|| format!("failed to read binding catalog {}", args.catalog.display()))?;
    tracing::info!(classes = classes.len(), "read binding catalog");

    let summary = Generator::new()
        .run(&binary, platform, classes)
        .context("pattern synthesis failed")?;

    bromascan_catalog::write_patterns(&args.output, platform, &summary.classes)
        .with_context(|| format!("failed to write pattern catalog {}", args.output.display()))?;

    println!(
        "Pattern generation complete: {} / {} methods successful ({} failed)",
        summary.successful, summary.total, summary.failed
    );

    Ok(())
}
