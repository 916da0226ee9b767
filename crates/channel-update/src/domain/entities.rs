//! # Pipeline Entities
//!
//! The logical unit of work (a channel update request), the mutation
//! intents it can carry, and the durable artifact layout operators inspect
//! between pipeline steps.

use shared_types::{
    AdminRole, AnchorPeerDefinition, ChannelKind, ChannelName, OrdererConsenterDefinition,
    OrdererEndpoint, OrganizationDefinition,
};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::signing::ConfigSignature;

/// File name of the signable envelope artifact inside a request directory.
pub const ENVELOPE_ARTIFACT_FILE: &str = "config_update_as_envelope_pb.pb";
/// Subdirectory holding one signature file per organization.
pub const SIGNATURES_DIR: &str = "signatures";

/// One well-defined mutation of the channel configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateIntent {
    /// Insert a new organization under `Application.groups`.
    AddApplicationOrg {
        msp_id: String,
        org: OrganizationDefinition,
    },
    /// Merge anchor-peer values into an existing application org.
    AddAnchorPeers {
        msp_id: String,
        anchors: AnchorPeerDefinition,
    },
    /// Insert a new organization under `Orderer.groups`.
    AddOrdererOrg {
        msp_id: String,
        org: OrganizationDefinition,
        channel_kind: ChannelKind,
    },
    /// Insert a new member under a consortium (system channel only).
    AddConsortiumMember {
        consortium: String,
        msp_id: String,
        org: OrganizationDefinition,
    },
    /// Append an ordering node to the consenter set.
    AddOrdererConsenter { consenter: OrdererConsenterDefinition },
    /// Append an advertised orderer address.
    AddOrdererEndpoint { endpoint: OrdererEndpoint },
}

impl UpdateIntent {
    /// Which artifact family this intent belongs to.
    pub fn kind(&self) -> IntentKind {
        match self {
            Self::AddApplicationOrg { .. }
            | Self::AddAnchorPeers { .. }
            | Self::AddConsortiumMember { .. } => IntentKind::RequestNewOrg,
            Self::AddOrdererOrg { .. }
            | Self::AddOrdererConsenter { .. }
            | Self::AddOrdererEndpoint { .. } => IntentKind::AddOrderer,
        }
    }

    /// Which admin flavor drafts this intent.
    ///
    /// Application-side changes are drafted by an application org admin;
    /// orderer-side and system-channel changes by an ordering org admin.
    pub fn admin_role(&self) -> AdminRole {
        match self {
            Self::AddApplicationOrg { .. } | Self::AddAnchorPeers { .. } => {
                AdminRole::ApplicationOrg
            }
            Self::AddOrdererOrg { .. }
            | Self::AddConsortiumMember { .. }
            | Self::AddOrdererConsenter { .. }
            | Self::AddOrdererEndpoint { .. } => AdminRole::OrdererOrg,
        }
    }

    /// Short human-readable description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::AddApplicationOrg { msp_id, .. } => format!("add application org {msp_id}"),
            Self::AddAnchorPeers { msp_id, .. } => format!("add anchor peers for {msp_id}"),
            Self::AddOrdererOrg { msp_id, .. } => format!("add orderer org {msp_id}"),
            Self::AddConsortiumMember {
                consortium, msp_id, ..
            } => format!("add {msp_id} to consortium {consortium}"),
            Self::AddOrdererConsenter { consenter } => {
                format!("add orderer consenter {}", consenter.endpoint())
            }
            Self::AddOrdererEndpoint { endpoint } => format!("add orderer endpoint {endpoint}"),
        }
    }
}

/// Artifact family of a request, naming its directory under
/// `artifacts/<channel>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    RequestNewOrg,
    AddOrderer,
}

impl IntentKind {
    /// Directory name under the channel's artifact root.
    pub fn artifact_dir(self) -> &'static str {
        match self {
            Self::RequestNewOrg => "requestNewOrg",
            Self::AddOrderer => "addOrderer",
        }
    }

    /// Which admin flavor signs and submits requests of this kind.
    pub fn admin_role(self) -> AdminRole {
        match self {
            Self::RequestNewOrg => AdminRole::ApplicationOrg,
            Self::AddOrderer => AdminRole::OrdererOrg,
        }
    }
}

/// Durable artifact layout rooted at the network directory.
///
/// Scratch intermediates live in a request-scoped temp dir and vanish with
/// the run; everything under this layout is operator-inspectable and shared
/// between the independently invoked draft/sign/submit steps.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    network_root: PathBuf,
}

impl ArtifactLayout {
    pub fn new<P: AsRef<Path>>(network_root: P) -> Self {
        Self {
            network_root: network_root.as_ref().to_path_buf(),
        }
    }

    /// `<network-root>/artifacts/<channel>/<kind>`
    pub fn request_dir(&self, channel: &ChannelName, kind: IntentKind) -> PathBuf {
        self.network_root
            .join("artifacts")
            .join(channel.as_str())
            .join(kind.artifact_dir())
    }

    /// The signable envelope artifact for a request.
    pub fn envelope_path(&self, channel: &ChannelName, kind: IntentKind) -> PathBuf {
        self.request_dir(channel, kind).join(ENVELOPE_ARTIFACT_FILE)
    }

    /// The signature deposit directory for a request.
    pub fn signatures_dir(&self, channel: &ChannelName, kind: IntentKind) -> PathBuf {
        self.request_dir(channel, kind).join(SIGNATURES_DIR)
    }
}

/// The logical unit tying together a channel, the signable envelope
/// artifact, and the evolving signature set.
///
/// Created when a change is drafted; signers and the submitter on other
/// machines reattach with [`ChannelUpdateRequest::locate`]. Submission
/// consumes the request: once committed, the remote version has advanced
/// and a new draft must start from a fresh fetch.
#[derive(Debug, Clone)]
pub struct ChannelUpdateRequest {
    pub id: Uuid,
    pub channel: ChannelName,
    pub kind: IntentKind,
    pub envelope_path: PathBuf,
    pub signatures_dir: PathBuf,
}

impl ChannelUpdateRequest {
    /// Reattach to a previously drafted request by its artifact location.
    pub fn locate(layout: &ArtifactLayout, channel: ChannelName, kind: IntentKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            envelope_path: layout.envelope_path(&channel, kind),
            signatures_dir: layout.signatures_dir(&channel, kind),
            channel,
            kind,
        }
    }
}

/// Everything the ordering service needs to validate and commit an update.
#[derive(Debug, Clone)]
pub struct UpdateSubmission {
    pub channel: ChannelName,
    pub tx_id: String,
    /// Encoded signed-update envelope bytes.
    pub envelope: Vec<u8>,
    /// Collected signatures in stable order.
    pub signatures: Vec<ConfigSignature>,
}

/// Proof of a committed update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub tx_id: String,
    pub channel: ChannelName,
}
