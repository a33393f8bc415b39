//! CLI entry-point for converting a single PubTator file.

use anyhow::{Context, Result};
use bionlp_ingest::{
    config::Settings, data::jsonl::write_jsonl, OffsetCheck, PathResolver, PubtatorReader,
};
use clap::Args as ClapArgs;
use tracing::instrument;

/// Args for the `pubtator` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// PubTator file path or URL.
    #[arg(long)]
    pub path: String,
    /// Output file stem; defaults to the input file stem.
    #[arg(long)]
    pub name: Option<String>,
    /// Fail when an entity's offsets do not select its mention text.
    #[arg(long)]
    pub verify_offsets: bool,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let resolver = super::resolver(&settings)?;
    let local = resolver
        .resolve(&args.path)
        .with_context(|| format!("resolve {}", args.path))?;
    let offset_check = if args.verify_offsets {
        OffsetCheck::Verify
    } else {
        OffsetCheck::Trust
    };

    let examples = PubtatorReader::open(&local)?
        .with_offset_check(offset_check)
        .map(|document| document?.to_span_example(|t| Ok(t.to_string())))
        .collect::<bionlp_ingest::Result<Vec<_>>>()
        .with_context(|| format!("parse {}", local.display()))?;

    let name = args
        .name
        .unwrap_or_else(|| super::output_stem(&args.path, "pubtator"));
    write_jsonl(
        settings.join_output("pubtator").join(format!("{name}.jsonl")),
        &examples,
    )?;
    Ok(())
}
