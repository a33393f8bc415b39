//! Runtime configuration for the bionlp-ingest binary.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Context;

/// Binary configuration resolved from `.env` and defaults. The library
/// itself takes these values as explicit arguments.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory remote datasets are downloaded into.
    pub cache_dir: PathBuf,
    /// Root folder for converted JSONL output.
    pub outputs_dir: PathBuf,
    /// User agent sent with dataset downloads.
    pub user_agent: String,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let cache_dir = env::var("BIONLP_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/cache"));
        let outputs_dir = env::var("BIONLP_OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));
        let user_agent = env::var("BIONLP_USER_AGENT")
            .unwrap_or_else(|_| format!("bionlp-ingest/{}", env!("CARGO_PKG_VERSION")));

        std::fs::create_dir_all(&cache_dir).context("creating cache dir")?;
        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            cache_dir,
            outputs_dir,
            user_agent,
        })
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}
