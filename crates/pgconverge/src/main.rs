//! pgconverge CLI
//!
//! Prints the DDL that turns one PostgreSQL schema dump into another.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use pgconverge_core::{process, Input};

/// Generate the patch that converges a PostgreSQL schema.
#[derive(Parser)]
#[command(name = "pgconverge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Schema dump describing the current database.
    #[arg(short, long, env = "PGCONVERGE_SOURCE")]
    source: PathBuf,

    /// Schema dump describing the schema to converge to.
    #[arg(short, long, env = "PGCONVERGE_DESIRED")]
    desired: PathBuf,

    /// Write the patch to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let source = read(&cli.source)?;
    let desired = read(&cli.desired)?;
    let source_name = cli.source.display().to_string();
    let desired_name = cli.desired.display().to_string();

    let patch = match process(
        Input::new(&source_name, &source),
        Input::new(&desired_name, &desired),
    ) {
        Ok(patch) => patch,
        Err(err) => {
            error!("{err}");
            eprintln!("{}", err.detail());
            return Ok(ExitCode::FAILURE);
        }
    };

    if patch.is_empty() {
        info!("Schemas are identical, nothing to do.");
    }

    match &cli.output {
        Some(path) => {
            fs::write(path, &patch)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "Patch written");
        }
        None => print!("{patch}"),
    }

    Ok(ExitCode::SUCCESS)
}

fn read(path: &Path) -> anyhow::Result<Vec<u8>> {
    debug!(path = %path.display(), "Reading schema");
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}
