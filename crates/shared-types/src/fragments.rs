//! # Opaque Config Fragments
//!
//! Definitions produced by an external generator and merged into the config
//! tree at known, MSP-keyed locations. The pipeline treats their bodies as
//! opaque; only the merge location and duplicate handling are its concern.

use crate::config::{ConfigGroup, ConfigValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A full organization group (MSP definition, policies, endpoints) as emitted
/// by the external material generator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationDefinition(pub ConfigGroup);

/// Anchor-peer value entries to merge into an organization's `values` map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorPeerDefinition(pub BTreeMap<String, ConfigValue>);

/// One ordering node's entry in the consenter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdererConsenterDefinition {
    pub host: String,
    pub port: u16,
    pub client_tls_cert: String,
    pub server_tls_cert: String,
}

impl OrdererConsenterDefinition {
    /// The `host:port` pair that must be unique within the consenter set.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// An advertised orderer address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdererEndpoint {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for OrdererEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
