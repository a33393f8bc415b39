//! MedMentions PubTator parsing.
//!
//! A corpus file is a sequence of blank-line separated blocks:
//!
//! ```text
//! PMID|t|Title text
//! PMID|a|Abstract text
//! PMID<TAB>start<TAB>end<TAB>mention<TAB>T047,T191<TAB>C0006826
//! ```
//!
//! Entity offsets index into `title + " " + abstract` and are trusted as-is
//! unless [`OffsetCheck::Verify`] is requested.

use std::{
    io::{BufRead, Lines},
    path::Path,
};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    data::{open_text, span::EntitySpan, span::SpanExample},
    error::{DatasetError, Result},
};

/// One annotated mention inside a MedMentions document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub start: usize,
    pub end: usize,
    pub mention_text: String,
    /// First semantic type code only, e.g. `T191` from `T191,T192`.
    pub mention_type: String,
    pub umls_id: String,
}

/// A parsed PubTator document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    text: String,
    pub pubmed_id: String,
    pub entities: Vec<Entity>,
}

impl Document {
    pub fn new(
        pubmed_id: impl Into<String>,
        title: impl Into<String>,
        abstract_text: impl Into<String>,
        entities: Vec<Entity>,
    ) -> Self {
        let title = title.into();
        let abstract_text = abstract_text.into();
        let text = format!("{title} {abstract_text}");
        Self {
            title,
            abstract_text,
            text,
            pubmed_id: pubmed_id.into(),
            entities,
        }
    }

    /// Title and abstract joined by a single space; entity offsets index into this.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Convert to a span example, labelling each entity with `label`.
    pub fn to_span_example<F>(&self, mut label: F) -> Result<SpanExample>
    where
        F: FnMut(&str) -> Result<String>,
    {
        let entities = self
            .entities
            .iter()
            .map(|e| Ok(EntitySpan::new(e.start, e.end, label(&e.mention_type)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(SpanExample::new(self.text.clone(), entities))
    }

    /// Check that every entity's offsets select its mention text.
    pub fn verify_offsets(&self) -> Result<()> {
        for entity in &self.entities {
            let found = char_slice(&self.text, entity.start, entity.end).unwrap_or_default();
            if found != entity.mention_text {
                return Err(DatasetError::OffsetMismatch {
                    pubmed_id: self.pubmed_id.clone(),
                    start: entity.start,
                    end: entity.end,
                    expected: entity.mention_text.clone(),
                    found: found.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Whether entity offsets are validated against the document text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OffsetCheck {
    /// Accept the file's offsets unchanged. Some corpora carry known
    /// off-by-one annotations, so this is the default.
    #[default]
    Trust,
    /// Fail with [`DatasetError::OffsetMismatch`] when `text[start..end]`
    /// differs from the mention text.
    Verify,
}

fn char_slice(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let mut bounds = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()));
    let from = bounds.nth(start)?;
    let to = if end == start {
        from
    } else {
        bounds.nth(end - start - 1)?
    };
    text.get(from..to)
}

/// Parse the lines of a single document block.
///
/// Line numbers in returned errors are relative to the block (1-based).
pub fn parse_document<S: AsRef<str>>(lines: &[S]) -> Result<Document> {
    if lines.len() < 2 {
        return Err(DatasetError::format(
            lines.len() + 1,
            format!(
                "document block needs a title and an abstract line, found {} line(s)",
                lines.len()
            ),
        ));
    }

    let (pubmed_id, title) = split_text_line(lines[0].as_ref(), 1)?;
    let (_, abstract_text) = split_text_line(lines[1].as_ref(), 2)?;

    let entities = lines[2..]
        .iter()
        .enumerate()
        .map(|(i, line)| parse_entity(line.as_ref(), i + 3))
        .collect::<Result<Vec<_>>>()?;

    Ok(Document::new(pubmed_id, title, abstract_text, entities))
}

fn split_text_line(line: &str, line_no: usize) -> Result<(&str, &str)> {
    let mut parts = line.splitn(3, '|').map(str::trim);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(pubmed_id), Some(_), Some(body)) => Ok((pubmed_id, body)),
        _ => Err(DatasetError::format(
            line_no,
            format!("expected `PMID|kind|text`, got {line:?}"),
        )),
    }
}

fn parse_entity(line: &str, line_no: usize) -> Result<Entity> {
    let fields: Vec<&str> = line.split('\t').collect();
    let [_, start, end, mention, types, umls_id] = fields[..] else {
        return Err(DatasetError::format(
            line_no,
            format!(
                "expected 6 tab separated annotation fields, found {}",
                fields.len()
            ),
        ));
    };
    let offset = |raw: &str| {
        raw.trim().parse::<usize>().map_err(|err| {
            DatasetError::format(line_no, format!("invalid offset {raw:?}: {err}"))
        })
    };
    Ok(Entity {
        start: offset(start)?,
        end: offset(end)?,
        mention_text: mention.to_string(),
        mention_type: types.split(',').next().unwrap_or_default().to_string(),
        umls_id: umls_id.to_string(),
    })
}

/// Lazy reader yielding one [`Document`] per blank-line separated block.
///
/// The reader is single pass. After the first error it yields nothing more.
pub struct PubtatorReader<R> {
    lines: Lines<R>,
    line_no: usize,
    block: Vec<String>,
    block_start: usize,
    offset_check: OffsetCheck,
    finished: bool,
}

impl PubtatorReader<Box<dyn BufRead>> {
    /// Open a local corpus file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening pubtator corpus");
        Ok(Self::new(open_text(path)?))
    }
}

impl<R: BufRead> PubtatorReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            block: Vec::new(),
            block_start: 1,
            offset_check: OffsetCheck::default(),
            finished: false,
        }
    }

    pub fn with_offset_check(mut self, offset_check: OffsetCheck) -> Self {
        self.offset_check = offset_check;
        self
    }

    fn flush(&mut self) -> Result<Document> {
        let block = std::mem::take(&mut self.block);
        let document =
            parse_document(&block).map_err(|err| err.offset_line(self.block_start))?;
        if self.offset_check == OffsetCheck::Verify {
            document.verify_offsets()?;
        }
        Ok(document)
    }
}

impl<R: BufRead> Iterator for PubtatorReader<R> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            match self.lines.next() {
                Some(Ok(line)) => {
                    self.line_no += 1;
                    let line = line.trim();
                    if line.is_empty() {
                        let result = self.flush();
                        self.block_start = self.line_no + 1;
                        self.finished = result.is_err();
                        return Some(result);
                    }
                    self.block.push(line.to_string());
                }
                Some(Err(err)) => {
                    self.finished = true;
                    return Some(Err(err.into()));
                }
                None => {
                    self.finished = true;
                    if self.block.is_empty() {
                        return None;
                    }
                    return Some(self.flush());
                }
            }
        }
    }
}

/// Read a whole PubTator file as span examples labelled with raw mention types.
pub fn read_med_mentions(path: impl AsRef<Path>) -> Result<Vec<SpanExample>> {
    let path = path.as_ref();
    let examples = PubtatorReader::open(path)?
        .map(|document| document?.to_span_example(|t| Ok(t.to_string())))
        .collect::<Result<Vec<_>>>()?;
    info!(path = %path.display(), count = examples.len(), "read pubtator examples");
    Ok(examples)
}
