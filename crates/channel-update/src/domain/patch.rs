//! # Patch Engine
//!
//! Pure mutation intents over a decoded channel configuration. Every
//! function takes the config by reference and returns a new tree, so the
//! caller can still diff against the original.
//!
//! ## Duplicate Handling
//!
//! Organization inserts reject duplicate keys outright: a key that already
//! exists means another operator got there first, and overwriting would
//! silently discard their change. Anchor-peer merges preserve existing
//! entries (re-applying identical input is a no-op), and orderer-endpoint
//! appends de-duplicate silently.
//!
//! ## Missing Paths
//!
//! An expected path that is absent always fails with [`ConfigPathError`].
//! Synthesizing partial structure would produce a tree the ordering
//! service no longer recognizes as derived from the committed config.

use super::entities::UpdateIntent;
use super::errors::PatchError;
use serde_json::Value;
use shared_types::{
    AnchorPeerDefinition, ChannelConfig, ChannelKind, ConfigPathError, OrdererConsenterDefinition,
    OrdererEndpoint, OrganizationDefinition, APPLICATION_GROUP, CONSENSUS_TYPE_KEY,
    CONSORTIUMS_GROUP, ORDERER_ADDRESSES_KEY, ORDERER_GROUP,
};

/// Dispatch one intent against the config tree.
pub fn apply(config: &ChannelConfig, intent: &UpdateIntent) -> Result<ChannelConfig, PatchError> {
    match intent {
        UpdateIntent::AddApplicationOrg { msp_id, org } => {
            add_application_org(config, msp_id, org)
        }
        UpdateIntent::AddAnchorPeers { msp_id, anchors } => {
            add_anchor_peers(config, msp_id, anchors)
        }
        UpdateIntent::AddOrdererOrg {
            msp_id,
            org,
            channel_kind,
        } => add_orderer_org(config, msp_id, org, *channel_kind),
        UpdateIntent::AddConsortiumMember {
            consortium,
            msp_id,
            org,
        } => add_consortium_member(config, consortium, msp_id, org),
        UpdateIntent::AddOrdererConsenter { consenter } => {
            add_orderer_consenter(config, consenter)
        }
        UpdateIntent::AddOrdererEndpoint { endpoint } => add_orderer_endpoint(config, endpoint),
    }
}

/// Insert a new organization under `Application.groups[msp_id]`.
///
/// Fails on an existing key: no silent overwrite of a concurrently-added
/// organization.
pub fn add_application_org(
    config: &ChannelConfig,
    msp_id: &str,
    org: &OrganizationDefinition,
) -> Result<ChannelConfig, PatchError> {
    let mut next = config.clone();
    let application = next.application_mut()?;
    if application.groups.contains_key(msp_id) {
        return Err(PatchError::DuplicateOrganization {
            msp_id: msp_id.to_string(),
            group: APPLICATION_GROUP.to_string(),
        });
    }
    application.groups.insert(msp_id.to_string(), org.0.clone());
    Ok(next)
}

/// Merge anchor-peer values into `Application.groups[msp_id].values`,
/// preserving existing keys. Re-applying identical input changes nothing.
pub fn add_anchor_peers(
    config: &ChannelConfig,
    msp_id: &str,
    anchors: &AnchorPeerDefinition,
) -> Result<ChannelConfig, PatchError> {
    let mut next = config.clone();
    let org = next
        .application_mut()?
        .subgroup_mut(msp_id)
        .ok_or_else(|| {
            ConfigPathError::missing(&[
                "channel_group",
                "groups",
                APPLICATION_GROUP,
                "groups",
                msp_id,
            ])
        })?;
    for (key, value) in &anchors.0 {
        org.values
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
    Ok(next)
}

/// Insert a new organization under `Orderer.groups[msp_id]`.
///
/// The channel kind gates a sanity check that the fetched config is the
/// right flavor: system-channel configs carry `Consortiums`, application
/// channels carry `Application`. Patching the wrong flavor would draft an
/// update the ordering service rejects much later, with a worse message.
pub fn add_orderer_org(
    config: &ChannelConfig,
    msp_id: &str,
    org: &OrganizationDefinition,
    channel_kind: ChannelKind,
) -> Result<ChannelConfig, PatchError> {
    match channel_kind {
        ChannelKind::System => {
            if config.channel_group.subgroup(CONSORTIUMS_GROUP).is_none() {
                return Err(ConfigPathError::missing(&[
                    "channel_group",
                    "groups",
                    CONSORTIUMS_GROUP,
                ])
                .into());
            }
        }
        ChannelKind::Application => {
            config.application()?;
        }
    }

    let mut next = config.clone();
    let orderer = next.orderer_mut()?;
    if orderer.groups.contains_key(msp_id) {
        return Err(PatchError::DuplicateOrganization {
            msp_id: msp_id.to_string(),
            group: ORDERER_GROUP.to_string(),
        });
    }
    orderer.groups.insert(msp_id.to_string(), org.0.clone());
    Ok(next)
}

/// Insert a new member under `Consortiums.groups[consortium].groups[msp_id]`
/// (system channel only).
pub fn add_consortium_member(
    config: &ChannelConfig,
    consortium: &str,
    msp_id: &str,
    org: &OrganizationDefinition,
) -> Result<ChannelConfig, PatchError> {
    let mut next = config.clone();
    let consortium_group = next.consortium_mut(consortium)?;
    if consortium_group.groups.contains_key(msp_id) {
        return Err(PatchError::DuplicateOrganization {
            msp_id: msp_id.to_string(),
            group: format!("{CONSORTIUMS_GROUP}.{consortium}"),
        });
    }
    consortium_group
        .groups
        .insert(msp_id.to_string(), org.0.clone());
    Ok(next)
}

/// Append an ordering node to
/// `Orderer.values.ConsensusType.value.metadata.consenters`.
///
/// Rejects a duplicate `host:port`.
pub fn add_orderer_consenter(
    config: &ChannelConfig,
    consenter: &OrdererConsenterDefinition,
) -> Result<ChannelConfig, PatchError> {
    let mut next = config.clone();
    let consensus = next.consensus_type_mut()?;

    let consenters = consensus
        .value
        .get_mut("metadata")
        .and_then(|metadata| metadata.get_mut("consenters"))
        .ok_or_else(|| {
            ConfigPathError::missing(&[
                "channel_group",
                "groups",
                ORDERER_GROUP,
                "values",
                CONSENSUS_TYPE_KEY,
                "value",
                "metadata",
                "consenters",
            ])
        })?;
    let consenters = consenters
        .as_array_mut()
        .ok_or_else(|| PatchError::MalformedConsensusMetadata {
            reason: "consenters is not an array".to_string(),
        })?;

    let endpoint = consenter.endpoint();
    for existing in consenters.iter() {
        let host = existing.get("host").and_then(Value::as_str).ok_or_else(|| {
            PatchError::MalformedConsensusMetadata {
                reason: "consenter entry lacks a host string".to_string(),
            }
        })?;
        let port = existing.get("port").and_then(Value::as_u64).ok_or_else(|| {
            PatchError::MalformedConsensusMetadata {
                reason: "consenter entry lacks a numeric port".to_string(),
            }
        })?;
        if format!("{host}:{port}") == endpoint {
            return Err(PatchError::DuplicateConsenter { endpoint });
        }
    }

    let entry = serde_json::to_value(consenter).map_err(|e| {
        PatchError::MalformedConsensusMetadata {
            reason: e.to_string(),
        }
    })?;
    consenters.push(entry);
    Ok(next)
}

/// Append `host:port` to `values.OrdererAddresses.value.addresses`,
/// de-duplicating silently.
pub fn add_orderer_endpoint(
    config: &ChannelConfig,
    endpoint: &OrdererEndpoint,
) -> Result<ChannelConfig, PatchError> {
    let mut next = config.clone();
    let value = next.orderer_addresses_mut()?;

    let addresses = value
        .value
        .get_mut("addresses")
        .ok_or_else(|| {
            ConfigPathError::missing(&[
                "channel_group",
                "values",
                ORDERER_ADDRESSES_KEY,
                "value",
                "addresses",
            ])
        })?
        .as_array_mut()
        .ok_or_else(|| PatchError::MalformedOrdererAddresses {
            reason: "addresses is not an array".to_string(),
        })?;

    let rendered = endpoint.to_string();
    let already_present = addresses.iter().any(|a| a.as_str() == Some(&rendered));
    if !already_present {
        addresses.push(Value::String(rendered));
    }
    Ok(next)
}
