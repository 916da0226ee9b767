//! # File Wallet Adapter
//!
//! Loads enrolled identities from a wallet directory: one `<label>.id`
//! JSON file per identity, PEM credentials inline. Only consumption for
//! signing lives here; enrollment is another tool's job.

use crate::ports::outbound::IdentityVault;
use shared_types::{AdminRole, Identity, IdentityError, OrgRef};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-backed identity wallet.
pub struct FileWallet {
    dir: PathBuf,
}

impl FileWallet {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn identity_path(&self, label: &str) -> PathBuf {
        self.dir.join(format!("{label}.id"))
    }
}

#[async_trait::async_trait]
impl IdentityVault for FileWallet {
    async fn resolve_signing_identity(
        &self,
        org: &OrgRef,
        role: AdminRole,
    ) -> Result<Identity, IdentityError> {
        let label = org.admin_identity.as_str();
        let path = self.identity_path(label);
        debug!(
            "[channel-update] resolving {role} `{label}` for {} from {}",
            org.name,
            path.display()
        );

        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                IdentityError::NotFound {
                    label: label.to_string(),
                    org: org.name.clone(),
                }
            } else {
                IdentityError::MalformedCredentials {
                    label: label.to_string(),
                    reason: format!("reading {}: {e}", path.display()),
                }
            }
        })?;

        let identity: Identity =
            serde_json::from_slice(&bytes).map_err(|e| IdentityError::MalformedCredentials {
                label: label.to_string(),
                reason: e.to_string(),
            })?;

        identity.require_x509(label)?;

        // A wallet entry claiming another org's MSP is a wiring mistake
        // that would otherwise surface as a remote signature rejection.
        if identity.msp_id != org.msp_id {
            return Err(IdentityError::MalformedCredentials {
                label: label.to_string(),
                reason: format!(
                    "wallet identity belongs to {}, expected {}",
                    identity.msp_id, org.msp_id
                ),
            });
        }

        Ok(identity)
    }
}
