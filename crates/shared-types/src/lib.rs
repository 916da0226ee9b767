//! # Shared Types Crate
//!
//! This crate contains the channel configuration tree, the identity types
//! consumed by the signing pipeline, and the errors shared across crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Typed Paths**: The config tree is navigated through named accessors
//!   that fail explicitly when a path is absent, never through string paths.
//! - **Opaque Fragments**: Organization and consenter definitions produced by
//!   external generators are carried as-is and merged at known locations.

pub mod channel;
pub mod config;
pub mod errors;
pub mod fragments;
pub mod identity;
pub mod message;

pub use channel::{ChannelKind, ChannelName};
pub use config::{
    ChannelConfig, ConfigGroup, ConfigPolicy, ConfigValue, APPLICATION_GROUP, CONSENSUS_TYPE_KEY,
    CONSORTIUMS_GROUP, ORDERER_ADDRESSES_KEY, ORDERER_GROUP,
};
pub use errors::{ConfigPathError, IdentityError, ValidationError};
pub use fragments::{
    AnchorPeerDefinition, OrdererConsenterDefinition, OrdererEndpoint, OrganizationDefinition,
};
pub use identity::{AdminRole, Credentials, Identity, IdentityType, OrgRef};
pub use message::MessageType;
