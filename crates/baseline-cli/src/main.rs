//! compare-baselines
//!
//! Compares recorded performance baselines and writes a JSON report.
//!
//! # Usage
//!
//! ```bash
//! compare-baselines cpu [-d DIR] [--codenames BASIS OTHER...] [-o FILE] [-a]
//! compare-baselines directory -s SOURCE_DIR -t TARGET_DIR
//! compare-baselines commit -s SOURCE_REV [-t TARGET_REV]
//! compare-baselines latest
//! compare-baselines history -r REV... --host-kernel K --codename C
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/perf-baselines/config.toml)
//! 3. Environment variables (BASELINES_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use baseline_cli::{
    compare_commits, compare_cpu_models, compare_directories, compare_latest, init_logging,
    load_settings, show_history, Cli, Commands,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref(), cli.log_level.as_deref())?;
    init_logging(&settings)?;

    let written = match cli.command {
        Commands::Cpu { directory, filters } => {
            compare_cpu_models(&settings, directory.as_deref(), &filters)?
        }
        Commands::Directory {
            source,
            target,
            filters,
        } => compare_directories(&settings, &source, &target, &filters)?,
        Commands::Commit {
            source,
            target,
            directory,
            repo,
            filters,
        } => compare_commits(
            &settings,
            &source,
            &target,
            directory.as_deref(),
            repo.as_deref(),
            &filters,
        )?,
        Commands::Latest {
            directory,
            repo,
            filters,
        } => compare_latest(&settings, directory.as_deref(), repo.as_deref(), &filters)?,
        Commands::History(args) => show_history(&settings, &args)?,
    };

    println!("{}", written.display());
    Ok(())
}
