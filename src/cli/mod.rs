//! Command-line interface wiring for bionlp-ingest.

use std::path::Path;

use anyhow::{Context, Result};
use bionlp_ingest::{config::Settings, CachedPathResolver};
use clap::{Parser, Subcommand};

pub mod bio;
pub mod fetch;
pub mod medmentions;
pub mod pubtator;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Biomedical NER dataset ingestion", long_about = None)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Medmentions(args) => medmentions::run(args, settings),
            Commands::Pubtator(args) => pubtator::run(args, settings),
            Commands::Bio(args) => bio::run(args, settings),
            Commands::Fetch(args) => fetch::run(args, settings),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Split a MedMentions release into train/dev/test JSONL files.
    Medmentions(medmentions::Args),
    /// Convert a single PubTator file into span examples.
    Pubtator(pubtator::Args),
    /// Convert a BIO-tagged TSV file into span examples.
    Bio(bio::Args),
    /// Download a remote dataset into the cache and print its local path.
    Fetch(fetch::Args),
}

pub(crate) fn resolver(settings: &Settings) -> Result<CachedPathResolver> {
    CachedPathResolver::new(&settings.cache_dir, &settings.user_agent)
        .context("initialising path resolver")
}

/// Output file stem for an input path or URL, e.g. `train` for `.../train.tsv`.
pub(crate) fn output_stem(path: &str, fallback: &str) -> String {
    Path::new(path.trim_end_matches('/'))
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
