//! # Pipeline Errors
//!
//! The error taxonomy of the update pipeline. Every fallible operation
//! returns one of these explicitly; a caller can always distinguish
//! success from failure programmatically.

use crate::ports::outbound::{CodecError, OrdererError, SignatureStoreError};
use shared_types::{ConfigPathError, IdentityError, ValidationError};
use thiserror::Error;

/// A patch intent could not be applied to the decoded config tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatchError {
    /// An expected location in the tree is absent. Never synthesized.
    #[error(transparent)]
    Path(#[from] ConfigPathError),

    /// The organization key is already present at the target location.
    /// Overwriting silently would mask a concurrently-added org.
    #[error("organization {msp_id} already present under {group}")]
    DuplicateOrganization { msp_id: String, group: String },

    /// The consenter's host:port already appears in the consenter set.
    #[error("consenter {endpoint} already present in the consenter set")]
    DuplicateConsenter { endpoint: String },

    /// `ConsensusType.value.metadata.consenters` exists but is not the
    /// expected shape.
    #[error("consensus metadata is malformed: {reason}")]
    MalformedConsensusMetadata { reason: String },

    /// `OrdererAddresses.value.addresses` exists but is not the expected
    /// shape.
    #[error("orderer addresses value is malformed: {reason}")]
    MalformedOrdererAddresses { reason: String },
}

/// The ordering service refused the update: the signature set does not
/// satisfy the channel's modification policy, or the delta was computed
/// against a base version that is no longer current.
///
/// Terminal for the request. A stale base means the whole pipeline must
/// restart from a fresh fetch; retrying the same submission can never
/// succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("update rejected by the ordering service (status {status}): {info}")]
pub struct PolicyRejection {
    /// Raw status string returned by the ordering service.
    pub status: String,
    /// Human-readable detail accompanying the status.
    pub info: String,
}

/// Top-level pipeline error.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Bad input (channel name, missing required file). Aborts the step.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Codec tool failure. Fatal to the whole run: signatures are computed
    /// over encoded bytes, so nothing downstream can be trusted.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Identity resolution or validation failure.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Patch application failure.
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// The named channel does not exist on the ordering service.
    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    /// Transport failure talking to the ordering service. The step may be
    /// re-run, except submission after the remote version has advanced.
    #[error("network error: {0}")]
    Network(OrdererError),

    /// Terminal rejection; restart from a fresh fetch.
    #[error(transparent)]
    Policy(#[from] PolicyRejection),

    /// Signature deposit/collection failure.
    #[error(transparent)]
    Store(#[from] SignatureStoreError),

    /// Scratch or artifact file I/O failure.
    #[error("artifact I/O failed at {path}: {reason}")]
    ArtifactIo { path: String, reason: String },
}

impl From<OrdererError> for UpdateError {
    fn from(err: OrdererError) -> Self {
        match err {
            OrdererError::ChannelNotFound(channel) => Self::ChannelNotFound(channel),
            other => Self::Network(other),
        }
    }
}

impl From<ConfigPathError> for UpdateError {
    fn from(err: ConfigPathError) -> Self {
        Self::Patch(PatchError::Path(err))
    }
}

impl UpdateError {
    /// Helper for scratch/artifact I/O failures.
    pub(crate) fn artifact_io(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::ArtifactIo {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}
