//! teamsite CLI - build a Quarto showcase site from team project folders.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use teamsite_site::{BuildResult, SiteBuilder};
use tracing_subscriber::{fmt, EnvFilter};

mod config;

use config::ConfigFile;

#[derive(Parser)]
#[command(name = "teamsite")]
#[command(about = "Build a Quarto showcase site from team project folders")]
#[command(version)]
pub struct Cli {
    /// Site root containing Team_Projects/
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Path to teamsite.toml, relative to the root
    #[arg(short, long, default_value = "teamsite.toml")]
    config: PathBuf,

    /// Generate files without running quarto render
    #[arg(long)]
    no_render: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    exit_status(run(cli))
}

/// Report the build outcome and map it to the process exit status.
fn exit_status(result: Result<BuildResult>) -> ExitCode {
    match result {
        Ok(result) => {
            tracing::info!(
                "Listed {} documents from {} teams ({} converted) in {}ms",
                result.documents,
                result.teams,
                result.converted,
                result.duration_ms
            );
            if result.rendered {
                tracing::info!("Site built: {}", result.output_dir.display());
            } else {
                tracing::info!("Site files generated; render skipped");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Site build failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<BuildResult> {
    let config_path = cli.root.join(&cli.config);
    let config = ConfigFile::load(&config_path)?.into_build_config(cli.root, !cli.no_render);

    tracing::info!("Building site in {}", config.root.display());

    let result = SiteBuilder::new(config).build()?;
    Ok(result)
}
