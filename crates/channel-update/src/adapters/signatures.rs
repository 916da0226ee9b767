//! # File Signature Store Adapter
//!
//! One JSON file per organization under a request-scoped directory.
//! Publication is write-to-temp-then-rename in the same directory: a
//! concurrent collector either sees the complete file or no file, never a
//! half-written one. This is a correctness property, not an optimization:
//! organizations deposit from independent processes on their own schedule.

use crate::domain::signing::{ConfigSignature, SignatureSet};
use crate::ports::outbound::{SignatureStore, SignatureStoreError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Suffix of published signature files: `<org>_sign.json`.
pub const SIGNATURE_FILE_SUFFIX: &str = "_sign.json";

/// File-backed signature deposit point.
#[derive(Debug, Clone, Default)]
pub struct FileSignatureStore;

impl FileSignatureStore {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(path: &Path, err: &std::io::Error) -> SignatureStoreError {
    SignatureStoreError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

#[async_trait::async_trait]
impl SignatureStore for FileSignatureStore {
    async fn store(
        &self,
        dir: &Path,
        org_name: &str,
        signature: &ConfigSignature,
    ) -> Result<PathBuf, SignatureStoreError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| io_error(dir, &e))?;

        let bytes = serde_json::to_vec_pretty(signature).map_err(|e| SignatureStoreError::Io {
            path: dir.display().to_string(),
            reason: format!("serializing signature: {e}"),
        })?;

        let final_path = dir.join(format!("{org_name}{SIGNATURE_FILE_SUFFIX}"));
        // Dot-prefixed temp in the same directory: rename stays on one
        // filesystem, and collectors skip dotfiles.
        let temp_path = dir.join(format!(".{org_name}.tmp-{}", Uuid::new_v4()));

        tokio::fs::write(&temp_path, &bytes)
            .await
            .map_err(|e| io_error(&temp_path, &e))?;
        if let Err(e) = tokio::fs::rename(&temp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(io_error(&final_path, &e));
        }

        info!(
            "[channel-update] ✍️ published signature for {org_name} at {}",
            final_path.display()
        );
        Ok(final_path)
    }

    async fn collect(&self, dir: &Path) -> Result<SignatureSet, SignatureStoreError> {
        let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| io_error(dir, &e))?;

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(dir, &e))? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || !name.ends_with(SIGNATURE_FILE_SUFFIX) {
                continue;
            }
            files.push((name, entry.path()));
        }
        // Directory iteration order is arbitrary; sort so duplicate
        // resolution is deterministic regardless of arrival order.
        files.sort();

        let mut set = SignatureSet::new();
        for (name, path) in files {
            let bytes = tokio::fs::read(&path).await.map_err(|e| io_error(&path, &e))?;
            let signature: ConfigSignature = serde_json::from_slice(&bytes).map_err(|e| {
                SignatureStoreError::Malformed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            })?;
            let header = signature
                .header()
                .map_err(|e| SignatureStoreError::Malformed {
                    path: path.display().to_string(),
                    reason: format!("unreadable signature header: {e}"),
                })?;

            let msp_id = header.creator.msp_id;
            if !set.insert(msp_id.clone(), signature) {
                warn!(
                    "[channel-update] duplicate signature for {msp_id} in {name}; keeping the first"
                );
            }
        }

        debug!(
            "[channel-update] collected {} signature(s) from {}: [{}]",
            set.len(),
            dir.display(),
            set.orgs().collect::<Vec<_>>().join(", ")
        );
        Ok(set)
    }
}
