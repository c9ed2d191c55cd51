//! CLI for the epicdl batch downloader.

mod commands;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use epicdl_core::config::{self, Collection, EpicConfig, ImageFormat};
use std::path::PathBuf;

use commands::{run_fetch, run_list};

/// Top-level CLI for epicdl.
#[derive(Debug, Parser)]
#[command(name = "epicdl")]
#[command(about = "epicdl: fetch the daily NASA EPIC image list and download every image", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/epicdl/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Feed selection shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct FeedArgs {
    /// Fetch the list for this day (YYYY-MM-DD) instead of the most recent one.
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub date: Option<String>,

    /// Image collection.
    #[arg(long, value_enum)]
    pub collection: Option<CollectionArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CollectionArg {
    Natural,
    Enhanced,
    Aerosol,
    Cloud,
}

impl From<CollectionArg> for Collection {
    fn from(arg: CollectionArg) -> Self {
        match arg {
            CollectionArg::Natural => Collection::Natural,
            CollectionArg::Enhanced => Collection::Enhanced,
            CollectionArg::Aerosol => Collection::Aerosol,
            CollectionArg::Cloud => Collection::Cloud,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatArg {
    Png,
    Jpg,
}

impl From<FormatArg> for ImageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ImageFormat::Png,
            FormatArg::Jpg => ImageFormat::Jpg,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch the image list, write metadata and download every image.
    Fetch {
        #[command(flatten)]
        feed: FeedArgs,

        /// Items per worker (one worker thread per chunk).
        #[arg(long, short = 'w', value_name = "N")]
        workers: Option<usize>,

        /// Image format to download.
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Directory for metadata JSON files.
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// Directory for downloaded images.
        #[arg(long, value_name = "DIR")]
        image_dir: Option<PathBuf>,
    },

    /// Print the image list (token and archive date path) without downloading.
    List {
        #[command(flatten)]
        feed: FeedArgs,
    },
}

/// Accepts `YYYY-MM-DD` (digits only, no range checks; the API rejects bad days).
fn parse_date(s: &str) -> Result<String, String> {
    let b = s.as_bytes();
    let shaped = b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b
            .iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if shaped {
        Ok(s.to_string())
    } else {
        Err(format!("expected YYYY-MM-DD, got {:?}", s))
    }
}

impl FeedArgs {
    fn apply(&self, cfg: &mut EpicConfig) {
        if let Some(c) = self.collection {
            cfg.collection = c.into();
        }
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = match &cli.config {
            Some(path) => config::load_from_path(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => config::load_or_init().context("loading config")?,
        };

        match cli.command {
            CliCommand::Fetch {
                feed,
                workers,
                format,
                data_dir,
                image_dir,
            } => {
                feed.apply(&mut cfg);
                if let Some(n) = workers {
                    cfg.worker_size = n;
                }
                if let Some(f) = format {
                    cfg.image_format = f.into();
                }
                if let Some(dir) = data_dir {
                    cfg.data_dir = dir;
                }
                if let Some(dir) = image_dir {
                    cfg.image_dir = dir;
                }
                tracing::debug!("effective config: {:?}", cfg);
                run_fetch(&cfg, feed.date.as_deref())?;
            }
            CliCommand::List { feed } => {
                feed.apply(&mut cfg);
                run_list(&cfg, feed.date.as_deref())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
