//! Corpus readers and the exchange types they produce.

pub mod archive;
pub mod bio;
pub mod jsonl;
pub mod medmentions;
pub mod pubtator;
pub mod span;

use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind},
    path::Path,
};

use crate::error::{DatasetError, Result};

/// Open a local text file for buffered line reading.
pub(crate) fn open_text(path: &Path) -> Result<Box<dyn BufRead>> {
    match File::open(path) {
        Ok(file) => Ok(Box::new(BufReader::new(file))),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            Err(DatasetError::MissingFile(path.to_path_buf()))
        }
        Err(err) => Err(err.into()),
    }
}
