use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// Clear, merge or reformat a bromascan binding catalog (broutil, §6 CLI
/// surface). Operates purely on catalog text/JSON; never touches binaries.
#[derive(Parser)]
#[command(name = "broutil", version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reset every Offset binding back to Null, leaving Link/Inlined alone
    Clear { input: PathBuf, output: PathBuf },
    /// Merge a scan-result catalog's offsets back into a binding catalog
    Append {
        input: PathBuf,
        scan_results: PathBuf,
        output: PathBuf,
    },
    /// Reformat a binding catalog without changing its bindings
    Format { input: PathBuf, output: PathBuf },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::new("info")).without_time().with_target(false).init();

    let args = Args::parse();
    match args.command {
        Command::Clear { input, output } => {
            let mut classes = bromascan_catalog::read_bindings(&input)
                .with_context(|| format!("failed to read binding catalog {}", input.display()))?;
            tracing::info!(classes = classes.len(), path = %input.display(), "read binding catalog");
            bromascan_catalog::clear_bindings(&mut classes);
            bromascan_catalog::write_bindings(&output, &classes)
                .with_context(|| format!("failed to write binding catalog {}", output.display()))?;
            println!("Cleared bindings from binding catalog: {}", output.display());
        }
        Command::Append {
            input,
            scan_results,
            output,
        } => {
            let mut classes = bromascan_catalog::read_bindings(&input)
                .with_context(|| format!("failed to read binding catalog {}", input.display()))?;
            tracing::info!(classes = classes.len(), path = %input.display(), "read binding catalog");
            let (platform, results) = bromascan_catalog::read_patterns(&scan_results)
                .with_context(|| format!("failed to read scan-result catalog {}", scan_results.display()))?;
            tracing::info!(%platform, classes = results.len(), path = %scan_results.display(), "read scan-result catalog");
            bromascan_catalog::merge_scan_results(&mut classes, platform, &results);
            bromascan_catalog::write_bindings(&output, &classes)
                .with_context(|| format!("failed to write binding catalog {}", output.display()))?;
            println!("Appended bindings to binding catalog: {}", output.display());
        }
        Command::Format { input, output } => {
            let classes = bromascan_catalog::read_bindings(&input)
                .with_context(|| format!("failed to read binding catalog {}", input.display()))?;
            tracing::info!(classes = classes.len(), path = %input.display(), "read binding catalog");
            bromascan_catalog::write_bindings(&output, &classes)
                .with_context(|| format!("failed to write binding catalog {}", output.display()))?;
            println!("Reformatted binding catalog: {}", output.display());
        }
    }

    Ok(())
}
