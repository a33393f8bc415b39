//! MedMentions corpus loading with train/dev/test partitioning.
//!
//! A MedMentions release is a directory (or a `.tar.gz`/`.zip` of one) holding
//! the PubTator corpus plus one PubMed id list per split.

use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::BufRead,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    data::{
        archive::{ArchiveKind, ExtractedArchive},
        open_text,
        pubtator::{Document, OffsetCheck, PubtatorReader},
        span::SpanExample,
    },
    error::{DatasetError, Result},
    resolve::PathResolver,
};

pub const CORPUS_FILE: &str = "corpus_pubtator.txt";
pub const ALL_IDS_FILE: &str = "corpus_pubtator_pmids_all.txt";
pub const DEV_IDS_FILE: &str = "corpus_pubtator_pmids_dev.txt";
pub const TEST_IDS_FILE: &str = "corpus_pubtator_pmids_test.txt";
pub const TRAIN_IDS_FILE: &str = "corpus_pubtator_pmids_trng.txt";

/// Every file a MedMentions directory must contain.
pub const EXPECTED_FILES: [&str; 5] = [
    CORPUS_FILE,
    ALL_IDS_FILE,
    DEV_IDS_FILE,
    TEST_IDS_FILE,
    TRAIN_IDS_FILE,
];

/// Label given to every entity when types are collapsed.
pub const ENTITY_LABEL: &str = "ENTITY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Dev,
    Test,
}

impl Split {
    /// Splits in the order membership is tested.
    pub const ALL: [Split; 3] = [Split::Train, Split::Dev, Split::Test];

    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Dev => "dev",
            Split::Test => "test",
        }
    }
}

/// Records partitioned by split, each in corpus order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Splits<T> {
    pub train: Vec<T>,
    pub dev: Vec<T>,
    pub test: Vec<T>,
}

impl<T> Default for Splits<T> {
    fn default() -> Self {
        Self {
            train: Vec::new(),
            dev: Vec::new(),
            test: Vec::new(),
        }
    }
}

impl<T> Splits<T> {
    pub fn get(&self, split: Split) -> &[T] {
        match split {
            Split::Train => &self.train,
            Split::Dev => &self.dev,
            Split::Test => &self.test,
        }
    }

    fn push(&mut self, split: Split, record: T) {
        match split {
            Split::Train => self.train.push(record),
            Split::Dev => self.dev.push(record),
            Split::Test => self.test.push(record),
        }
    }

    pub fn len(&self) -> usize {
        self.train.len() + self.dev.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How an id listed in several split files is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SplitPolicy {
    /// Assign to the first matching split in train, dev, test order.
    #[default]
    PreferTrain,
    /// Fail with [`DatasetError::SplitOverlap`].
    RejectOverlap,
}

/// PubMed ids of each split.
#[derive(Debug, Clone, Default)]
pub struct SplitIds {
    pub train: HashSet<String>,
    pub dev: HashSet<String>,
    pub test: HashSet<String>,
}

impl SplitIds {
    /// Load the three id lists from a MedMentions directory.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            train: read_ids(&dir.join(TRAIN_IDS_FILE))?,
            dev: read_ids(&dir.join(DEV_IDS_FILE))?,
            test: read_ids(&dir.join(TEST_IDS_FILE))?,
        })
    }

    pub fn get(&self, split: Split) -> &HashSet<String> {
        match split {
            Split::Train => &self.train,
            Split::Dev => &self.dev,
            Split::Test => &self.test,
        }
    }

    /// Split a document belongs to, or `None` if no list mentions it.
    pub fn assign(&self, pubmed_id: &str, policy: SplitPolicy) -> Result<Option<Split>> {
        let mut matches = Split::ALL
            .into_iter()
            .filter(|split| self.get(*split).contains(pubmed_id));

        let first = matches.next();
        if policy == SplitPolicy::RejectOverlap && matches.next().is_some() {
            return Err(DatasetError::SplitOverlap {
                pubmed_id: pubmed_id.to_string(),
            });
        }
        Ok(first)
    }
}

fn read_ids(path: &Path) -> Result<HashSet<String>> {
    let mut ids = HashSet::new();
    for line in open_text(path)?.lines() {
        let line = line?;
        let id = line.trim();
        if !id.is_empty() {
            ids.insert(id.to_string());
        }
    }
    debug!(path = %path.display(), count = ids.len(), "loaded split ids");
    Ok(ids)
}

/// Read a `{"mention type": "label"}` JSON object.
pub fn load_label_mapping(path: impl AsRef<Path>) -> Result<HashMap<String, String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => DatasetError::MissingFile(path.to_path_buf()),
        _ => err.into(),
    })?;
    Ok(serde_json::from_reader(file)?)
}

/// Builder for reading a MedMentions release into train/dev/test splits.
pub struct MedMentionsLoader<'a> {
    source: String,
    resolver: &'a dyn PathResolver,
    label_mapping: Option<HashMap<String, String>>,
    span_only: bool,
    offset_check: OffsetCheck,
    split_policy: SplitPolicy,
    keep_extracted: bool,
    extract_root: Option<PathBuf>,
}

impl<'a> MedMentionsLoader<'a> {
    /// `source` is a directory, an archive of one, or a URL to either.
    pub fn new(source: impl Into<String>, resolver: &'a dyn PathResolver) -> Self {
        Self {
            source: source.into(),
            resolver,
            label_mapping: None,
            span_only: false,
            offset_check: OffsetCheck::default(),
            split_policy: SplitPolicy::default(),
            keep_extracted: false,
            extract_root: None,
        }
    }

    /// Relabel mention types through `mapping`. Unmapped types are an error.
    pub fn label_mapping(mut self, mapping: HashMap<String, String>) -> Self {
        self.label_mapping = Some(mapping);
        self
    }

    /// Collapse every type to [`ENTITY_LABEL`]. Overrides any label mapping.
    pub fn span_only(mut self, span_only: bool) -> Self {
        self.span_only = span_only;
        self
    }

    pub fn offset_check(mut self, offset_check: OffsetCheck) -> Self {
        self.offset_check = offset_check;
        self
    }

    pub fn split_policy(mut self, split_policy: SplitPolicy) -> Self {
        self.split_policy = split_policy;
        self
    }

    /// Leave an extracted archive on disk after loading instead of deleting it.
    pub fn keep_extracted(mut self, keep: bool) -> Self {
        self.keep_extracted = keep;
        self
    }

    /// Parent directory for archive extraction. Defaults to the system temp dir.
    pub fn extract_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extract_root = Some(dir.into());
        self
    }

    fn label(&self, mention_type: &str) -> Result<String> {
        if self.span_only {
            return Ok(ENTITY_LABEL.to_string());
        }
        match &self.label_mapping {
            None => Ok(mention_type.to_string()),
            Some(mapping) => mapping
                .get(mention_type)
                .cloned()
                .ok_or_else(|| DatasetError::MissingLabel(mention_type.to_string())),
        }
    }

    /// Load span examples labelled according to the builder settings.
    pub fn load_spans(&self) -> Result<Splits<SpanExample>> {
        self.load_with(|_, example| example)
    }

    /// Load raw documents. Labels are still computed, so an incomplete label
    /// mapping fails here too.
    pub fn load_documents(&self) -> Result<Splits<Document>> {
        self.load_with(|document, _| document)
    }

    fn load_with<T, F>(&self, mut convert: F) -> Result<Splits<T>>
    where
        F: FnMut(Document, SpanExample) -> T,
    {
        let resolved = self.resolver.resolve(&self.source)?;
        match ArchiveKind::detect(&self.source) {
            Some(kind) => {
                let extracted = match &self.extract_root {
                    Some(root) => ExtractedArchive::extract_in(root, &resolved, kind)?,
                    None => ExtractedArchive::extract(&resolved, kind)?,
                };
                let splits = self.split_dir(extracted.path(), &mut convert);
                if self.keep_extracted {
                    extracted.keep();
                }
                splits
            }
            None => self.split_dir(&resolved, &mut convert),
        }
    }

    fn split_dir<T, F>(&self, dir: &Path, convert: &mut F) -> Result<Splits<T>>
    where
        F: FnMut(Document, SpanExample) -> T,
    {
        if let Some(missing) = EXPECTED_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| !path.exists())
        {
            return Err(DatasetError::MissingFile(missing));
        }

        let ids = SplitIds::load(dir)?;
        let mut splits = Splits::default();
        let mut dropped = 0usize;

        let documents =
            PubtatorReader::open(dir.join(CORPUS_FILE))?.with_offset_check(self.offset_check);
        for document in documents {
            let document = document?;
            let example = document.to_span_example(|t| self.label(t))?;
            match ids.assign(&document.pubmed_id, self.split_policy)? {
                Some(split) => splits.push(split, convert(document, example)),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!(dropped, "documents absent from every split list were skipped");
        }
        info!(
            dir = %dir.display(),
            train = splits.train.len(),
            dev = splits.dev.len(),
            test = splits.test.len(),
            "loaded medmentions splits"
        );
        Ok(splits)
    }
}
