//! # Outbound Ports (Driven Ports / SPI)
//!
//! Traits for the external collaborators the pipeline depends on: the
//! binary⇄tree codec tool, the ordering service, the identity wallet, and
//! the signature deposit directory.

use crate::domain::entities::UpdateSubmission;
use crate::domain::signing::{ConfigSignature, SignatureSet};
use serde_json::Value;
use shared_types::{AdminRole, ChannelName, Identity, IdentityError, MessageType, OrgRef};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Codec failures. Fatal to the whole run: signatures are computed over
/// encoded bytes, so a codec that cannot be trusted poisons everything
/// downstream.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The codec tool could not be launched at all.
    #[error("failed to launch codec tool `{tool}`: {reason}")]
    Spawn { tool: String, reason: String },

    /// The tool ran and rejected the input.
    #[error("codec {operation} failed (exit {status}): {stderr}")]
    ToolFailed {
        operation: String,
        status: i32,
        stderr: String,
    },

    /// The tool claimed success but its output is unusable.
    #[error("codec {operation} produced unparseable output: {reason}")]
    MalformedOutput { operation: String, reason: String },

    /// The tool ran past its wall-clock budget.
    #[error("codec {operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    /// Scratch I/O needed to drive the tool failed.
    #[error("codec scratch I/O failed at {path}: {reason}")]
    Io { path: String, reason: String },
}

/// Binary⇄tree conversion and delta computation.
///
/// `decode` and `encode` must be exact semantic inverses: re-decoding
/// `encode(decode(x))` is structurally identical to `decode(x)`.
/// `compute_update` returns only the changed subtree, scoped to one
/// channel.
#[async_trait::async_trait]
pub trait ConfigCodec: Send + Sync {
    /// Convert binary to its tree form.
    async fn decode(&self, binary: &[u8], message_type: MessageType) -> Result<Value, CodecError>;

    /// Convert a tree back to binary.
    async fn encode(&self, tree: &Value, message_type: MessageType) -> Result<Vec<u8>, CodecError>;

    /// Compute the minimal delta between two encoded configs.
    async fn compute_update(
        &self,
        original: &[u8],
        modified: &[u8],
        channel: &ChannelName,
    ) -> Result<Vec<u8>, CodecError>;
}

/// Transport-level ordering service failures.
#[derive(Debug, Error)]
pub enum OrdererError {
    /// The named channel does not exist.
    #[error("channel `{0}` not found on the ordering service")]
    ChannelNotFound(String),

    /// Connection could not be established.
    #[error("ordering service unreachable at {endpoint}: {reason}")]
    Unreachable { endpoint: String, reason: String },

    /// The request ran past its timeout.
    #[error("request to {endpoint} timed out after {seconds}s")]
    Timeout { endpoint: String, seconds: u64 },

    /// The service answered with something this client cannot interpret.
    #[error("unexpected response from ordering service: {reason}")]
    BadResponse { reason: String },
}

/// Status the ordering service returned for a submission.
///
/// The service re-validates everything independently: each signature
/// against the org's current MSP, the aggregate set against the channel's
/// modification policy, and the delta's base version against the
/// currently committed config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdererAck {
    pub status: String,
    pub info: String,
}

impl OrdererAck {
    /// The only status that commits an update.
    pub const SUCCESS: &'static str = "SUCCESS";

    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }
}

/// Gateway to the ordering service.
#[async_trait::async_trait]
pub trait OrdererGateway: Send + Sync {
    /// Live read of the committed channel config (binary). Never cached.
    async fn fetch_config(
        &self,
        channel: &ChannelName,
        identity: &Identity,
    ) -> Result<Vec<u8>, OrdererError>;

    /// Submit a signed config update. The returned ack carries the
    /// service's raw status; only an explicit success commits.
    async fn submit_config_update(
        &self,
        submission: &UpdateSubmission,
        identity: &Identity,
    ) -> Result<OrdererAck, OrdererError>;
}

/// Identity wallet.
///
/// One resolution capability for all call sites, polymorphic over the
/// admin flavor (application-org or orderer-org).
#[async_trait::async_trait]
pub trait IdentityVault: Send + Sync {
    /// Load and validate the org's enrolled admin identity for signing.
    async fn resolve_signing_identity(
        &self,
        org: &OrgRef,
        role: AdminRole,
    ) -> Result<Identity, IdentityError>;
}

/// Signature deposit/collection failures.
#[derive(Debug, Error)]
pub enum SignatureStoreError {
    /// Filesystem failure while publishing or reading.
    #[error("signature I/O failed at {path}: {reason}")]
    Io { path: String, reason: String },

    /// A published file exists but cannot be deserialized.
    #[error("malformed signature file {path}: {reason}")]
    Malformed { path: String, reason: String },
}

/// Durable deposit point for per-org signatures.
///
/// Multiple organizations store concurrently from independent processes;
/// each writes a distinct file, and publication must be atomic so a
/// concurrent `collect` never observes a half-written deposit.
#[async_trait::async_trait]
pub trait SignatureStore: Send + Sync {
    /// Atomically publish one org's signature under the request directory.
    /// Returns the path of the published file.
    async fn store(
        &self,
        dir: &Path,
        org_name: &str,
        signature: &ConfigSignature,
    ) -> Result<PathBuf, SignatureStoreError>;

    /// Read every published signature, de-duplicated by org identity, in
    /// stable order. Arrival order is irrelevant.
    async fn collect(&self, dir: &Path) -> Result<SignatureSet, SignatureStoreError>;
}
