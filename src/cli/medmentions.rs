//! CLI entry-point for splitting a MedMentions release.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bionlp_ingest::{
    config::Settings,
    data::{jsonl::write_jsonl, medmentions::load_label_mapping},
    MedMentionsLoader, OffsetCheck, SpanExample, Split, SplitPolicy, Splits,
};
use clap::Args as ClapArgs;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, instrument};

/// Args for the `medmentions` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// MedMentions directory, `.tar.gz`/`.zip` archive of one, or a URL to either.
    #[arg(long)]
    pub path: String,
    /// JSON object mapping semantic type codes to output labels.
    #[arg(long)]
    pub label_mapping: Option<PathBuf>,
    /// Label every entity `ENTITY`.
    #[arg(long)]
    pub span_only: bool,
    /// Write parsed documents instead of span examples.
    #[arg(long)]
    pub documents: bool,
    /// Fail when an entity's offsets do not select its mention text.
    #[arg(long)]
    pub verify_offsets: bool,
    /// Fail when a document id is listed in more than one split.
    #[arg(long)]
    pub reject_overlap: bool,
    /// Leave an extracted archive on disk.
    #[arg(long)]
    pub keep_extracted: bool,
    /// Directory to extract archives under instead of the system temp dir.
    #[arg(long)]
    pub extract_dir: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let resolver = super::resolver(&settings)?;
    let mut loader = MedMentionsLoader::new(args.path.as_str(), &resolver)
        .span_only(args.span_only)
        .keep_extracted(args.keep_extracted);
    if args.verify_offsets {
        loader = loader.offset_check(OffsetCheck::Verify);
    }
    if args.reject_overlap {
        loader = loader.split_policy(SplitPolicy::RejectOverlap);
    }
    if let Some(dir) = &args.extract_dir {
        loader = loader.extract_root(dir);
    }
    if let Some(path) = &args.label_mapping {
        let mapping = load_label_mapping(path)
            .with_context(|| format!("read label mapping {}", path.display()))?;
        loader = loader.label_mapping(mapping);
    }

    let out_dir = settings.join_output("medmentions");
    if args.documents {
        let splits = loader
            .load_documents()
            .with_context(|| format!("load medmentions from {}", args.path))?;
        write_splits(&out_dir, &splits)
    } else {
        let splits = loader
            .load_spans()
            .with_context(|| format!("load medmentions from {}", args.path))?;
        let labels = label_counts(&splits);
        info!(distinct = labels.len(), counts = ?labels, "entity labels");
        write_splits(&out_dir, &splits)
    }
}

fn write_splits<T: Serialize>(dir: &Path, splits: &Splits<T>) -> Result<()> {
    for split in Split::ALL {
        let path = dir.join(format!("{}.jsonl", split.as_str()));
        write_jsonl(&path, splits.get(split))
            .with_context(|| format!("write {}", path.display()))?;
    }
    Ok(())
}

/// Entity count per label, in first-seen order.
fn label_counts(splits: &Splits<SpanExample>) -> IndexMap<String, usize> {
    let mut counts = IndexMap::new();
    for example in Split::ALL.into_iter().flat_map(|split| splits.get(split)) {
        for entity in &example.entities {
            *counts.entry(entity.label.clone()).or_insert(0) += 1;
        }
    }
    counts
}
