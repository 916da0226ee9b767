//! # Channel Update Service
//!
//! Application service wiring the pure domain logic to the ports: the
//! codec tool, the ordering service, the identity wallet, and the
//! signature store.
//!
//! Each method is one short-lived pipeline step. Drafting, signing, and
//! submitting are invoked independently, usually by different operators
//! and possibly days apart, and coordinate only through the durable artifact
//! layout.

use crate::adapters::scratch::{
    RequestScratch, CONFIG_JSON, CONFIG_PB, DELTA_JSON, DELTA_PB, MODIFIED_JSON, MODIFIED_PB,
};
use crate::domain::entities::{
    ArtifactLayout, ChannelUpdateRequest, SubmitReceipt, UpdateIntent,
};
use crate::domain::errors::{PolicyRejection, UpdateError};
use crate::domain::signing::{self, Creator};
use crate::domain::{envelope, patch};
use crate::ports::inbound::ChannelUpdateApi;
use crate::ports::outbound::{
    CodecError, ConfigCodec, IdentityVault, OrdererGateway, SignatureStore,
};
use shared_types::{ChannelConfig, ChannelName, MessageType, OrgRef, ValidationError};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

/// Channel update pipeline service.
pub struct ChannelUpdateService<C, O, V, S> {
    codec: C,
    orderer: O,
    vault: V,
    signatures: S,
    artifacts: ArtifactLayout,
}

impl<C, O, V, S> ChannelUpdateService<C, O, V, S>
where
    C: ConfigCodec,
    O: OrdererGateway,
    V: IdentityVault,
    S: SignatureStore,
{
    /// Wire the service against a network root directory.
    pub fn new(codec: C, orderer: O, vault: V, signatures: S, network_root: PathBuf) -> Self {
        Self {
            codec,
            orderer,
            vault,
            signatures,
            artifacts: ArtifactLayout::new(network_root),
        }
    }

    /// The artifact layout this service drafts into.
    pub fn artifacts(&self) -> &ArtifactLayout {
        &self.artifacts
    }

    async fn stash(
        scratch: &RequestScratch,
        name: &str,
        bytes: &[u8],
    ) -> Result<(), UpdateError> {
        scratch
            .write(name, bytes)
            .await
            .map(|_| ())
            .map_err(|e| UpdateError::artifact_io(&scratch.path(name), &e))
    }

    async fn stash_tree(
        scratch: &RequestScratch,
        name: &str,
        tree: &serde_json::Value,
    ) -> Result<(), UpdateError> {
        let bytes = serde_json::to_vec_pretty(tree).map_err(|e| UpdateError::ArtifactIo {
            path: scratch.path(name).display().to_string(),
            reason: e.to_string(),
        })?;
        Self::stash(scratch, name, &bytes).await
    }

    /// Atomically publish a durable artifact (write-to-temp-then-rename).
    async fn publish_artifact(path: &Path, bytes: &[u8]) -> Result<(), UpdateError> {
        let parent = path.parent().ok_or_else(|| UpdateError::ArtifactIo {
            path: path.display().to_string(),
            reason: "artifact path has no parent directory".to_string(),
        })?;
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| UpdateError::artifact_io(parent, &e))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp = parent.join(format!(".{file_name}.tmp-{}", Uuid::new_v4()));
        tokio::fs::write(&temp, bytes)
            .await
            .map_err(|e| UpdateError::artifact_io(&temp, &e))?;
        if let Err(e) = tokio::fs::rename(&temp, path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(UpdateError::artifact_io(path, &e));
        }
        Ok(())
    }

    /// Read the envelope artifact a request points at.
    async fn read_envelope(path: &Path) -> Result<Vec<u8>, UpdateError> {
        tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ValidationError::MissingFile {
                    path: path.display().to_string(),
                }
                .into()
            } else {
                UpdateError::artifact_io(path, &e)
            }
        })
    }
}

#[async_trait::async_trait]
impl<C, O, V, S> ChannelUpdateApi for ChannelUpdateService<C, O, V, S>
where
    C: ConfigCodec,
    O: OrdererGateway,
    V: IdentityVault,
    S: SignatureStore,
{
    async fn draft_update(
        &self,
        channel: &ChannelName,
        intent: &UpdateIntent,
        org: &OrgRef,
    ) -> Result<ChannelUpdateRequest, UpdateError> {
        let request_id = Uuid::new_v4();
        info!(
            "[channel-update] 📦 drafting `{}` on `{channel}` as {} (request {request_id})",
            intent.describe(),
            org.name
        );

        let identity = self
            .vault
            .resolve_signing_identity(org, intent.admin_role())
            .await?;

        // Always a live read; the delta is only valid against the version
        // committed right now.
        let fetched = self.orderer.fetch_config(channel, &identity).await?;

        let scratch = RequestScratch::create(request_id).map_err(|e| UpdateError::ArtifactIo {
            path: "<scratch>".to_string(),
            reason: e.to_string(),
        })?;
        Self::stash(&scratch, CONFIG_PB, &fetched).await?;

        let decoded = self.codec.decode(&fetched, MessageType::Config).await?;
        Self::stash_tree(&scratch, CONFIG_JSON, &decoded).await?;

        let config: ChannelConfig =
            serde_json::from_value(decoded).map_err(|e| CodecError::MalformedOutput {
                operation: format!("decode {}", MessageType::Config),
                reason: e.to_string(),
            })?;

        let modified = patch::apply(&config, intent)?;
        let modified_tree =
            serde_json::to_value(&modified).map_err(|e| CodecError::MalformedOutput {
                operation: "re-encode patched config".to_string(),
                reason: e.to_string(),
            })?;
        Self::stash_tree(&scratch, MODIFIED_JSON, &modified_tree).await?;

        let modified_pb = self
            .codec
            .encode(&modified_tree, MessageType::Config)
            .await?;
        Self::stash(&scratch, MODIFIED_PB, &modified_pb).await?;

        let delta_pb = self
            .codec
            .compute_update(&fetched, &modified_pb, channel)
            .await?;
        Self::stash(&scratch, DELTA_PB, &delta_pb).await?;

        let delta_tree = self
            .codec
            .decode(&delta_pb, MessageType::ConfigUpdate)
            .await?;
        Self::stash_tree(&scratch, DELTA_JSON, &delta_tree).await?;

        let envelope_tree = envelope::wrap(delta_tree, channel);
        let envelope_pb = self
            .codec
            .encode(&envelope_tree, MessageType::Envelope)
            .await?;

        let kind = intent.kind();
        let envelope_path = self.artifacts.envelope_path(channel, kind);
        Self::publish_artifact(&envelope_path, &envelope_pb).await?;

        let signatures_dir = self.artifacts.signatures_dir(channel, kind);
        tokio::fs::create_dir_all(&signatures_dir)
            .await
            .map_err(|e| UpdateError::artifact_io(&signatures_dir, &e))?;

        info!(
            "[channel-update] drafted request {request_id}; envelope at {}",
            envelope_path.display()
        );
        Ok(ChannelUpdateRequest {
            id: request_id,
            channel: channel.clone(),
            kind,
            envelope_path,
            signatures_dir,
        })
    }

    async fn sign_update(
        &self,
        request: &ChannelUpdateRequest,
        org: &OrgRef,
    ) -> Result<PathBuf, UpdateError> {
        let identity = self
            .vault
            .resolve_signing_identity(org, request.kind.admin_role())
            .await?;

        let envelope_bytes = Self::read_envelope(&request.envelope_path).await?;
        let signature = signing::sign(&envelope_bytes, &identity, &org.admin_identity)?;

        let path = self
            .signatures
            .store(&request.signatures_dir, &org.name, &signature)
            .await?;
        info!(
            "[channel-update] {} signed request {} on `{}`",
            org.name, request.id, request.channel
        );
        Ok(path)
    }

    async fn submit_update(
        &self,
        request: ChannelUpdateRequest,
        org: &OrgRef,
    ) -> Result<SubmitReceipt, UpdateError> {
        let collected = self.signatures.collect(&request.signatures_dir).await?;
        if collected.is_empty() {
            return Err(ValidationError::NoSignatures {
                dir: request.signatures_dir.display().to_string(),
            }
            .into());
        }

        let envelope_bytes = Self::read_envelope(&request.envelope_path).await?;
        let identity = self
            .vault
            .resolve_signing_identity(org, request.kind.admin_role())
            .await?;

        let creator = Creator {
            msp_id: identity.msp_id.clone(),
            certificate: identity.credentials.certificate.clone(),
        };
        let tx_id = signing::transaction_id(&creator);
        info!(
            "[channel-update] 📤 submitting request {} on `{}` as tx {tx_id} with signatures from [{}]",
            request.id,
            request.channel,
            collected.orgs().collect::<Vec<_>>().join(", ")
        );

        let submission = crate::domain::entities::UpdateSubmission {
            channel: request.channel.clone(),
            tx_id: tx_id.clone(),
            envelope: envelope_bytes,
            signatures: collected.into_signatures(),
        };

        let ack = self
            .orderer
            .submit_config_update(&submission, &identity)
            .await?;

        if ack.is_success() {
            info!(
                "[channel-update] ✅ tx {tx_id} committed on `{}`; request {} is spent",
                request.channel, request.id
            );
            Ok(SubmitReceipt {
                tx_id,
                channel: request.channel,
            })
        } else {
            // No automatic retry: a stale base can only be fixed by
            // redrafting from a fresh fetch.
            warn!(
                "[channel-update] tx {tx_id} rejected on `{}` (status {}): {}",
                request.channel, ack.status, ack.info
            );
            Err(PolicyRejection {
                status: ack.status,
                info: ack.info,
            }
            .into())
        }
    }
}
