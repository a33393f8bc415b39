//! CLI entry-point for converting BIO-tagged TSV data.

use anyhow::{Context, Result};
use bionlp_ingest::{config::Settings, data::jsonl::write_jsonl, read_ner_from_tsv};
use clap::Args as ClapArgs;
use tracing::instrument;

/// Args for the `bio` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// TSV file path or URL, one `word<TAB>tag` pair per line.
    #[arg(long)]
    pub path: String,
    /// Output file stem; defaults to the input file stem.
    #[arg(long)]
    pub name: Option<String>,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let resolver = super::resolver(&settings)?;
    let examples = read_ner_from_tsv(&args.path, &resolver)
        .with_context(|| format!("read bio tsv {}", args.path))?;
    let name = args
        .name
        .unwrap_or_else(|| super::output_stem(&args.path, "bio"));
    write_jsonl(
        settings.join_output("bio").join(format!("{name}.jsonl")),
        &examples,
    )?;
    Ok(())
}
