//! # Channel Configuration Tree
//!
//! The decoded form of a channel's governance document: nested groups of
//! `values` and `policies`, each carrying a `mod_policy` and a server-assigned
//! `version`. Versions are monotonic; any update must be computed against the
//! currently committed config or the ordering service rejects it.
//!
//! ## Typed Navigation
//!
//! Consumers never address the tree by string paths. Named accessors resolve
//! the well-known locations and return [`ConfigPathError`] when a location is
//! absent, so a desynced config fails early and explicitly.

use crate::errors::ConfigPathError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Top-level group holding application organizations.
pub const APPLICATION_GROUP: &str = "Application";
/// Top-level group holding ordering-service organizations.
pub const ORDERER_GROUP: &str = "Orderer";
/// System-channel-only top-level group holding consortium definitions.
pub const CONSORTIUMS_GROUP: &str = "Consortiums";
/// Orderer group value carrying the consensus metadata (consenter set).
pub const CONSENSUS_TYPE_KEY: &str = "ConsensusType";
/// Channel-level value carrying the advertised orderer addresses.
pub const ORDERER_ADDRESSES_KEY: &str = "OrdererAddresses";

/// A committed channel configuration: the channel group plus the sequence
/// number the ordering service assigned to this revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    #[serde(default)]
    pub sequence: u64,
    pub channel_group: ConfigGroup,
}

/// A node in the configuration tree.
///
/// Maps are ordered so that re-encoding a decoded tree is byte-stable; the
/// envelope signature is computed over encoded bytes, which makes encode
/// determinism a correctness requirement rather than a nicety.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigGroup {
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub groups: BTreeMap<String, ConfigGroup>,
    #[serde(default)]
    pub values: BTreeMap<String, ConfigValue>,
    #[serde(default)]
    pub policies: BTreeMap<String, ConfigPolicy>,
    #[serde(default)]
    pub mod_policy: String,
}

/// A leaf configuration value with an opaque body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigValue {
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub mod_policy: String,
    #[serde(default)]
    pub value: Value,
}

/// A policy entry with an opaque body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigPolicy {
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub mod_policy: String,
    #[serde(default)]
    pub policy: Value,
}

impl ConfigGroup {
    /// Look up a direct subgroup.
    pub fn subgroup(&self, name: &str) -> Option<&ConfigGroup> {
        self.groups.get(name)
    }

    /// Look up a direct subgroup for mutation.
    pub fn subgroup_mut(&mut self, name: &str) -> Option<&mut ConfigGroup> {
        self.groups.get_mut(name)
    }

    /// Look up a value entry.
    pub fn value(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Look up a value entry for mutation.
    pub fn value_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.values.get_mut(key)
    }
}

impl ChannelConfig {
    fn top_group(&self, name: &'static str) -> Result<&ConfigGroup, ConfigPathError> {
        self.channel_group
            .subgroup(name)
            .ok_or_else(|| ConfigPathError::missing(&["channel_group", "groups", name]))
    }

    fn top_group_mut(&mut self, name: &'static str) -> Result<&mut ConfigGroup, ConfigPathError> {
        self.channel_group
            .subgroup_mut(name)
            .ok_or_else(|| ConfigPathError::missing(&["channel_group", "groups", name]))
    }

    /// The `Application` group (application channels).
    pub fn application(&self) -> Result<&ConfigGroup, ConfigPathError> {
        self.top_group(APPLICATION_GROUP)
    }

    /// The `Application` group for mutation.
    pub fn application_mut(&mut self) -> Result<&mut ConfigGroup, ConfigPathError> {
        self.top_group_mut(APPLICATION_GROUP)
    }

    /// The `Orderer` group.
    pub fn orderer(&self) -> Result<&ConfigGroup, ConfigPathError> {
        self.top_group(ORDERER_GROUP)
    }

    /// The `Orderer` group for mutation.
    pub fn orderer_mut(&mut self) -> Result<&mut ConfigGroup, ConfigPathError> {
        self.top_group_mut(ORDERER_GROUP)
    }

    /// A named consortium group for mutation (system channel only).
    pub fn consortium_mut(&mut self, name: &str) -> Result<&mut ConfigGroup, ConfigPathError> {
        self.channel_group
            .subgroup_mut(CONSORTIUMS_GROUP)
            .ok_or_else(|| ConfigPathError::missing(&["channel_group", "groups", CONSORTIUMS_GROUP]))?
            .subgroup_mut(name)
            .ok_or_else(|| {
                ConfigPathError::missing(&[
                    "channel_group",
                    "groups",
                    CONSORTIUMS_GROUP,
                    "groups",
                    name,
                ])
            })
    }

    /// The channel-level `OrdererAddresses` value for mutation.
    pub fn orderer_addresses_mut(&mut self) -> Result<&mut ConfigValue, ConfigPathError> {
        self.channel_group
            .value_mut(ORDERER_ADDRESSES_KEY)
            .ok_or_else(|| {
                ConfigPathError::missing(&["channel_group", "values", ORDERER_ADDRESSES_KEY])
            })
    }

    /// The `Orderer.values.ConsensusType` value for mutation.
    pub fn consensus_type_mut(&mut self) -> Result<&mut ConfigValue, ConfigPathError> {
        self.top_group_mut(ORDERER_GROUP)?
            .value_mut(CONSENSUS_TYPE_KEY)
            .ok_or_else(|| {
                ConfigPathError::missing(&[
                    "channel_group",
                    "groups",
                    ORDERER_GROUP,
                    "values",
                    CONSENSUS_TYPE_KEY,
                ])
            })
    }
}
