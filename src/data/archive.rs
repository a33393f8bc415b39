//! Scoped archive extraction.
//!
//! An [`ExtractedArchive`] owns a fresh temporary directory holding the
//! unpacked contents and deletes it when dropped. Call
//! [`ExtractedArchive::keep`] to leave the directory on disk instead.

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use flate2::read::GzDecoder;
use tempfile::TempDir;
use tracing::info;
use zip::ZipArchive;

use crate::error::{DatasetError, Result};

/// Archive formats the corpus loaders can unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

impl ArchiveKind {
    /// Detect an archive from the name it was requested under.
    pub fn detect(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.contains("tar.gz") || lower.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }
}

/// Archive contents unpacked into a temporary directory.
#[derive(Debug)]
pub struct ExtractedArchive {
    dir: TempDir,
}

impl ExtractedArchive {
    /// Unpack into a new directory under the system temp dir.
    pub fn extract(archive: &Path, kind: ArchiveKind) -> Result<Self> {
        Self::extract_in(&std::env::temp_dir(), archive, kind)
    }

    /// Unpack into a new directory created under `parent`.
    pub fn extract_in(parent: &Path, archive: &Path, kind: ArchiveKind) -> Result<Self> {
        let archive_err = |message: String| DatasetError::Archive {
            path: archive.to_path_buf(),
            message,
        };

        let file = File::open(archive)?;
        let dir = TempDir::new_in(parent)?;
        info!(
            archive = %archive.display(),
            dir = %dir.path().display(),
            ?kind,
            "extracting archive"
        );
        match kind {
            ArchiveKind::TarGz => tar::Archive::new(GzDecoder::new(file))
                .unpack(dir.path())
                .map_err(|err| archive_err(err.to_string()))?,
            ArchiveKind::Zip => ZipArchive::new(file)
                .and_then(|mut zip| zip.extract(dir.path()))
                .map_err(|err| archive_err(err.to_string()))?,
        }
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Disown the directory so it outlives this handle. The caller becomes
    /// responsible for removing it.
    pub fn keep(self) -> PathBuf {
        let path = self.dir.into_path();
        info!(dir = %path.display(), "keeping extracted archive");
        path
    }
}
