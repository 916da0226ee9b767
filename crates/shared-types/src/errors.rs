//! # Shared Error Types
//!
//! Errors that cross crate boundaries: path resolution failures inside the
//! config tree, identity resolution failures, and input validation.

use thiserror::Error;

/// An expected location inside the config tree is absent.
///
/// The pipeline never synthesizes missing structure: a config that lacks a
/// path the ordering service is expected to maintain indicates a desync, and
/// patching around it would produce an update the service cannot validate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("expected config path not present: {path}")]
pub struct ConfigPathError {
    /// Dotted path from the config root, e.g. `channel_group.groups.Application`.
    pub path: String,
}

impl ConfigPathError {
    /// Build the error from path segments joined with `.`.
    pub fn missing(segments: &[&str]) -> Self {
        Self {
            path: segments.join("."),
        }
    }
}

/// Errors raised while resolving or validating a signing identity.
///
/// Messages always name the organization so an operator knows which wallet
/// to fix.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// No identity with the given label exists in the wallet.
    #[error("admin identity `{label}` for organization {org} not found in wallet")]
    NotFound { label: String, org: String },

    /// The identity exists but is not an X.509 identity.
    #[error("identity `{label}` has unsupported type `{found}`: X.509 required")]
    UnsupportedIdentityType { label: String, found: String },

    /// The identity file or its credentials could not be parsed.
    #[error("credentials for identity `{label}` are malformed: {reason}")]
    MalformedCredentials { label: String, reason: String },
}

/// Input validation failures. These abort the current step only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The channel name does not satisfy the naming rules.
    #[error("invalid channel name `{name}`: {reason}")]
    InvalidChannelName { name: String, reason: String },

    /// A file the step requires does not exist.
    #[error("required file missing: {path}")]
    MissingFile { path: String },

    /// Submission was attempted with an empty signature set.
    #[error("no signatures deposited under {dir}")]
    NoSignatures { dir: String },
}
