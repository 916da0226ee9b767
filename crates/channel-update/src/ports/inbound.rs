//! # Inbound Port (Driving Port / API)
//!
//! The public API of the channel update pipeline.

use crate::domain::entities::{ChannelUpdateRequest, SubmitReceipt, UpdateIntent};
use crate::domain::errors::UpdateError;
use shared_types::{ChannelName, OrgRef};
use std::path::PathBuf;

/// Primary channel-update API.
///
/// The three operations are invoked independently, possibly by different
/// operators on different machines: one org drafts, each co-signing org
/// signs on its own schedule, and whoever believes quorum is reached
/// submits. Implementations must be thread-safe (`Send + Sync`).
#[async_trait::async_trait]
pub trait ChannelUpdateApi: Send + Sync {
    /// Draft an update: fetch the committed config, apply the intent,
    /// compute the delta, and publish the signable envelope artifact.
    async fn draft_update(
        &self,
        channel: &ChannelName,
        intent: &UpdateIntent,
        org: &OrgRef,
    ) -> Result<ChannelUpdateRequest, UpdateError>;

    /// Deposit one organization's signature over a drafted envelope.
    /// Returns the path of the published signature file.
    async fn sign_update(
        &self,
        request: &ChannelUpdateRequest,
        org: &OrgRef,
    ) -> Result<PathBuf, UpdateError>;

    /// Collect the deposited signatures and submit the update. Consumes
    /// the request: on success the remote version has advanced, and on
    /// [`UpdateError::Policy`] the request is terminally rejected; either
    /// way a new draft must start from a fresh fetch.
    async fn submit_update(
        &self,
        request: ChannelUpdateRequest,
        org: &OrgRef,
    ) -> Result<SubmitReceipt, UpdateError>;
}
