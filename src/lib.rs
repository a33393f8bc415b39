//! Dataset ingestion for biomedical NER corpora.
//!
//! - [`data::pubtator`] parses MedMentions PubTator files into documents.
//! - [`data::medmentions`] partitions a MedMentions release into train/dev/test.
//! - [`data::bio`] converts BIO-tagged TSV sentences into character spans.
//!
//! Remote inputs go through a [`resolve::PathResolver`], which downloads and
//! caches them before the readers see a local path.

pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod resolve;

pub use data::{
    bio::{read_ner_from_tsv, sentence_to_example, BioReader},
    medmentions::{MedMentionsLoader, Split, SplitPolicy, Splits},
    pubtator::{parse_document, read_med_mentions, Document, Entity, OffsetCheck, PubtatorReader},
    span::{EntitySpan, SpanExample},
};
pub use error::{DatasetError, Result};
pub use resolve::{CachedPathResolver, LocalResolver, PathResolver};
