//! CLI entry-point for pre-fetching remote datasets into the cache.

use anyhow::{Context, Result};
use bionlp_ingest::{config::Settings, PathResolver};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

/// Args for the `fetch` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// URL (or local path) to resolve.
    #[arg(long)]
    pub path: String,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let resolver = super::resolver(&settings)?;
    let local = resolver
        .resolve(&args.path)
        .with_context(|| format!("resolve {}", args.path))?;
    if let Some(meta) = resolver.cached_meta(&args.path)? {
        info!(url = %meta.url, fetched_at = %meta.fetched_at, bytes = meta.bytes, "cache entry");
    }
    println!("{}", local.display());
    Ok(())
}
