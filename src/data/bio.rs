//! BIO-tagged TSV corpora (one `word<TAB>tag` pair per line).
//!
//! Sentences are separated by blank lines and `-DOCSTART-` markers are
//! ignored. Each sentence is detokenized by joining its words with single
//! spaces, and tagged runs become character spans over that string.

use std::{
    io::{BufRead, Lines},
    path::Path,
};

use tracing::{debug, info};

use crate::{
    data::{
        open_text,
        span::{EntitySpan, SpanExample},
    },
    error::{DatasetError, Result},
    resolve::PathResolver,
};

const DOCSTART: &str = "-DOCSTART-";
const OUTSIDE: &str = "O";

/// Build a span example from one sentence of `(word, tag)` pairs.
///
/// A span opens on the first non-`O` tag after an `O` (or at sentence start)
/// and takes that tag's type with its two character prefix removed,
/// uppercased. Tag changes inside a run do not split the span, so
/// `B-ORG I-PER` yields a single `ORG` span. Spans are half-open character
/// ranges: the end points just past the last tagged word.
pub fn sentence_to_example<W, T>(tokens: &[(W, T)]) -> SpanExample
where
    W: AsRef<str>,
    T: AsRef<str>,
{
    let mut cursor = 0usize;
    let mut open: Option<(usize, String)> = None;
    let mut entities = Vec::new();
    let mut words = Vec::with_capacity(tokens.len());

    for (word, tag) in tokens {
        let (word, tag) = (word.as_ref(), tag.as_ref());
        words.push(word);
        if tag == OUTSIDE {
            if let Some((start, label)) = open.take() {
                entities.push(EntitySpan::new(start, cursor - 1, label));
            }
        } else if open.is_none() {
            let label = tag.chars().skip(2).collect::<String>().to_uppercase();
            open = Some((cursor, label));
        }
        cursor += word.chars().count() + 1;
    }
    if let Some((start, label)) = open {
        entities.push(EntitySpan::new(start, cursor - 1, label));
    }

    SpanExample::new(words.join(" "), entities)
}

/// Lazy, single-pass reader producing one [`SpanExample`] per sentence.
pub struct BioReader<R> {
    lines: Lines<R>,
    line_no: usize,
    sentence: Vec<(String, String)>,
    finished: bool,
}

impl BioReader<Box<dyn BufRead>> {
    /// Open a local TSV file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening bio tsv");
        Ok(Self::new(open_text(path)?))
    }
}

impl<R: BufRead> BioReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            sentence: Vec::new(),
            finished: false,
        }
    }

    fn flush(&mut self) -> SpanExample {
        let example = sentence_to_example(&self.sentence);
        self.sentence.clear();
        example
    }
}

impl<R: BufRead> Iterator for BioReader<R> {
    type Item = Result<SpanExample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(err)) => {
                    self.finished = true;
                    return Some(Err(err.into()));
                }
                None => {
                    self.finished = true;
                    if self.sentence.is_empty() {
                        return None;
                    }
                    return Some(Ok(self.flush()));
                }
            };
            self.line_no += 1;

            let line = line.trim();
            if line.starts_with(DOCSTART) {
                continue;
            }
            if line.is_empty() {
                if self.sentence.is_empty() {
                    continue;
                }
                return Some(Ok(self.flush()));
            }

            let fields: Vec<&str> = line.split('\t').collect();
            let [word, tag] = fields[..] else {
                self.finished = true;
                return Some(Err(DatasetError::format(
                    self.line_no,
                    format!(
                        "expected `word<TAB>tag`, found {} tab separated field(s)",
                        fields.len()
                    ),
                )));
            };
            self.sentence.push((word.to_string(), tag.to_string()));
        }
    }
}

/// Resolve `path_or_url` and read every sentence it contains.
pub fn read_ner_from_tsv(
    path_or_url: &str,
    resolver: &dyn PathResolver,
) -> Result<Vec<SpanExample>> {
    let path = resolver.resolve(path_or_url)?;
    let examples = BioReader::open(&path)?.collect::<Result<Vec<_>>>()?;
    info!(path = %path.display(), sentences = examples.len(), "read bio examples");
    Ok(examples)
}
