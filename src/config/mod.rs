//! Filesystem locations: where the database and log live, and where exports
//! go by default.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub(crate) const DB_FILE: &str = "expz.db";
pub(crate) const LOG_FILE: &str = "expz.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
    pub(crate) db_path: PathBuf,
    pub(crate) log_path: PathBuf,
    pub(crate) export_dir: PathBuf,
}

impl Config {
    /// Platform data directory, created if missing. Exports default to the
    /// user's home directory.
    pub(crate) fn resolve() -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "expz", "Exp-Z")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let export_dir = home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_dirs(proj_dirs.data_dir(), &export_dir)
    }

    pub(crate) fn with_dirs(data_dir: &Path, export_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            db_path: data_dir.join(DB_FILE),
            log_path: data_dir.join(LOG_FILE),
            export_dir: export_dir.to_path_buf(),
        })
    }
}

fn home_dir() -> Option<PathBuf> {
    directories::UserDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Expand a leading `~/` to the home directory.
pub(crate) fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
