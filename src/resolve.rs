//! Path resolution: local paths pass through, remote files are downloaded once
//! into a cache directory and served from there afterwards.

use std::{
    collections::hash_map::DefaultHasher,
    fs::File,
    hash::{Hash, Hasher},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use urlencoding::encode;

use crate::error::{DatasetError, Result};

/// Turns a local path or remote URL into a path to a local, complete file.
pub trait PathResolver {
    fn resolve(&self, path_or_url: &str) -> Result<PathBuf>;
}

enum Location<'a> {
    Local(&'a Path),
    Remote(&'a str),
    Unsupported(&'a str),
}

fn locate(path_or_url: &str) -> Location<'_> {
    if let Some(local) = path_or_url.strip_prefix("file://") {
        return Location::Local(Path::new(local));
    }
    match path_or_url.split_once("://") {
        Some(("http" | "https", _)) => Location::Remote(path_or_url),
        Some((scheme, _)) => Location::Unsupported(scheme),
        None => Location::Local(Path::new(path_or_url)),
    }
}

fn existing(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        Ok(path.to_path_buf())
    } else {
        Err(DatasetError::MissingFile(path.to_path_buf()))
    }
}

/// Resolver for local paths only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalResolver;

impl PathResolver for LocalResolver {
    fn resolve(&self, path_or_url: &str) -> Result<PathBuf> {
        match locate(path_or_url) {
            Location::Local(path) => existing(path),
            Location::Remote(_) | Location::Unsupported(_) => Err(DatasetError::Fetch {
                url: path_or_url.to_string(),
                message: "remote paths need a caching resolver".to_string(),
            }),
        }
    }
}

/// Longest percent-encoded URL used verbatim as a cache file name. Leaves
/// room for the `.json` sidecar suffix under the usual 255 byte limit.
const MAX_CACHE_NAME: usize = 200;
/// Encoded URL tail kept when a name has to be shortened.
const KEPT_SUFFIX: usize = 100;

fn cache_file_name(url: &str) -> String {
    let encoded = encode(url).into_owned();
    if encoded.len() <= MAX_CACHE_NAME {
        return encoded;
    }
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    // percent-encoding leaves only ASCII, so any byte offset is a char boundary
    let tail = &encoded[encoded.len() - KEPT_SUFFIX..];
    format!("{:016x}-{tail}", hasher.finish())
}

/// Sidecar written next to each cached download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMeta {
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    pub bytes: u64,
}

/// Resolver that downloads `http(s)` URLs into `cache_dir` on first use.
pub struct CachedPathResolver {
    cache_dir: PathBuf,
    client: Client,
}

impl CachedPathResolver {
    pub fn new(cache_dir: impl Into<PathBuf>, user_agent: &str) -> Result<Self> {
        let cache_dir = cache_dir.into();
        std::fs::create_dir_all(&cache_dir)?;
        let client = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .brotli(true)
            .timeout(None)
            .build()?;
        Ok(Self { cache_dir, client })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Location a given URL is cached at. The file name keeps the URL's
    /// suffix, so archive detection by name still works on the cached copy.
    pub fn cache_path(&self, url: &str) -> PathBuf {
        self.cache_dir.join(cache_file_name(url))
    }

    fn meta_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".json");
        PathBuf::from(name)
    }

    /// Metadata recorded when `url` was downloaded, if it is cached.
    pub fn cached_meta(&self, url: &str) -> Result<Option<CacheMeta>> {
        let meta_path = Self::meta_path(&self.cache_path(url));
        if !meta_path.exists() {
            return Ok(None);
        }
        let meta = serde_json::from_reader(File::open(&meta_path)?)?;
        Ok(Some(meta))
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let fetch_err = |message: String| DatasetError::Fetch {
            url: url.to_string(),
            message,
        };

        info!(%url, "downloading");
        let mut resp = self
            .client
            .get(url)
            .send()
            .map_err(|err| fetch_err(err.to_string()))?;
        if !resp.status().is_success() {
            return Err(fetch_err(format!("HTTP {}", resp.status())));
        }
        let mut tmp = NamedTempFile::new_in(&self.cache_dir)?;
        let bytes = resp
            .copy_to(tmp.as_file_mut())
            .map_err(|err| fetch_err(err.to_string()))?;
        tmp.persist(dest).map_err(|err| err.error)?;

        let meta = CacheMeta {
            url: url.to_string(),
            fetched_at: Utc::now(),
            bytes,
        };
        serde_json::to_writer_pretty(File::create(Self::meta_path(dest))?, &meta)?;
        info!(path = %dest.display(), size = bytes, "cached download");
        Ok(())
    }
}

impl PathResolver for CachedPathResolver {
    fn resolve(&self, path_or_url: &str) -> Result<PathBuf> {
        match locate(path_or_url) {
            Location::Local(path) => existing(path),
            Location::Remote(url) => {
                let dest = self.cache_path(url);
                if dest.exists() {
                    debug!(%url, path = %dest.display(), "using cached download");
                } else {
                    self.download(url, &dest)?;
                }
                Ok(dest)
            }
            Location::Unsupported(scheme) => Err(DatasetError::Fetch {
                url: path_or_url.to_string(),
                message: format!("unsupported scheme {scheme:?}"),
            }),
        }
    }
}
