//! CLI for the polite page fetcher.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use polite_core::config;
use std::path::PathBuf;

use commands::{run_cache_clear, run_config, run_fetch, FetchArgs};

/// Top-level CLI for the polite page fetcher.
#[derive(Debug, Parser)]
#[command(name = "polite")]
#[command(about = "polite: paced, backoff-aware page fetcher", long_about = None)]
pub struct Cli {
    /// Read settings from this file instead of ~/.config/polite/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch pages one at a time with randomized spacing and backoff.
    Run {
        /// URLs to fetch, in order.
        urls: Vec<String>,

        /// Also read URLs from a file (one per line, `#` starts a comment).
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Save each completed page into this directory.
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Fixed jitter seed for a reproducible schedule (overrides config).
        #[arg(long, value_name = "N")]
        seed: Option<u64>,

        /// Neither read nor update the page cache.
        #[arg(long)]
        no_cache: bool,
    },

    /// Show where settings live and their effective values.
    Config,

    /// Delete the page cache.
    CacheClear,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                urls,
                file,
                out_dir,
                seed,
                no_cache,
            } => {
                let args = FetchArgs {
                    urls,
                    file,
                    out_dir,
                    seed,
                    no_cache,
                };
                run_fetch(&cfg, args).await?
            }
            CliCommand::Config => run_config(&cfg, cli.config.as_deref())?,
            CliCommand::CacheClear => run_cache_clear(&cfg)?,
        }

        Ok(())
    }
}
