//! # Request-Scoped Scratch Directory
//!
//! Per-run home for the decoded/encoded intermediates (`config.pb/json`,
//! `modified.pb/json`, `delta.pb/json`). Each pipeline run gets its own
//! directory keyed by the request id, so concurrent runs on one machine
//! cannot consume each other's leftovers; the directory is removed when
//! the run's handle is dropped.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// Scratch file names, kept operator-recognizable for debugging a run
/// that is stopped under a debugger or with cleanup disabled.
pub const CONFIG_PB: &str = "config.pb";
pub const CONFIG_JSON: &str = "config.json";
pub const MODIFIED_PB: &str = "modified.pb";
pub const MODIFIED_JSON: &str = "modified.json";
pub const DELTA_PB: &str = "delta.pb";
pub const DELTA_JSON: &str = "delta.json";

/// A request-scoped temporary directory.
#[derive(Debug)]
pub struct RequestScratch {
    dir: TempDir,
}

impl RequestScratch {
    /// Create the scratch directory for one pipeline run.
    pub fn create(request_id: Uuid) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("channel-update-{request_id}-"))
            .tempdir()?;
        Ok(Self { dir })
    }

    /// Root of this run's scratch space.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a named scratch file.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a scratch file, returning its path.
    pub async fn write(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.path(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}
