//! # Channel Update Pipeline
//!
//! Automates channel configuration changes for a permissioned
//! multi-organization ledger network: fetch the committed config, apply one
//! mutation intent, compute the minimal delta, wrap it in a signable
//! envelope, let each organization co-sign on its own schedule, and submit
//! the aggregate to the ordering service.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure pipeline logic, no I/O: patch
//!   intents, envelope building, signature construction, error taxonomy
//! - **Ports Layer** (`ports/`): Trait definitions for inbound/outbound
//!   interfaces
//! - **Adapters Layer** (`adapters/`): External collaborators: the codec
//!   tool, the ordering service, the wallet, the signature directory
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//!
//! ## Coordination Model
//!
//! An update request is drafted once, then signed out-of-band by each
//! organization, possibly on separate machines over days. The signature
//! directory is the only shared mutable resource; deposits are additive
//! (one file per org) and atomically published, so collection never
//! observes a half-written file. A successful submission spends the
//! request: the remote version advances and any outstanding draft must be
//! regenerated from a fresh fetch.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::entities::{
    ArtifactLayout, ChannelUpdateRequest, IntentKind, SubmitReceipt, UpdateIntent,
    UpdateSubmission,
};
pub use domain::errors::{PatchError, PolicyRejection, UpdateError};
pub use domain::signing::{ConfigSignature, Creator, SignatureHeader, SignatureSet};
pub use ports::inbound::ChannelUpdateApi;
pub use ports::outbound::{
    CodecError, ConfigCodec, IdentityVault, OrdererAck, OrdererError, OrdererGateway,
    SignatureStore, SignatureStoreError,
};
pub use service::ChannelUpdateService;
