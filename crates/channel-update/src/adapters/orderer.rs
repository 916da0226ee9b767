//! # Ordering Service HTTP Adapter
//!
//! Typed client for the ordering service's admin API. All requests carry
//! explicit connect and overall timeouts; transport failures map to
//! [`OrdererError`] so callers can decide whether a step is re-runnable.

use crate::domain::entities::UpdateSubmission;
use crate::ports::outbound::{OrdererAck, OrdererError, OrdererGateway};
use base64::Engine;
use serde::Deserialize;
use shared_types::{ChannelName, Identity};
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the ordering service admin endpoints.
pub struct HttpOrdererGateway {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct FetchConfigResponse {
    /// Base64 of the committed config binary.
    config: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    info: String,
}

impl HttpOrdererGateway {
    /// Build a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, OrdererError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, OrdererError> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| OrdererError::BadResponse {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    fn channel_url(&self, channel: &ChannelName, suffix: &str) -> String {
        format!("{}/v1/channels/{}/{}", self.base_url, channel, suffix)
    }

    fn map_send_error(&self, endpoint: &str, err: reqwest::Error) -> OrdererError {
        if err.is_timeout() {
            OrdererError::Timeout {
                endpoint: endpoint.to_string(),
                seconds: self.timeout.as_secs(),
            }
        } else if err.is_connect() {
            OrdererError::Unreachable {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        } else {
            OrdererError::BadResponse {
                reason: err.to_string(),
            }
        }
    }
}

#[async_trait::async_trait]
impl OrdererGateway for HttpOrdererGateway {
    async fn fetch_config(
        &self,
        channel: &ChannelName,
        identity: &Identity,
    ) -> Result<Vec<u8>, OrdererError> {
        let url = self.channel_url(channel, "config");
        debug!("[channel-update] fetching config for `{channel}` from {url}");

        let response = self
            .client
            .get(&url)
            .header("x-msp-id", &identity.msp_id)
            .header(
                "x-admin-cert",
                base64::engine::general_purpose::STANDARD
                    .encode(identity.credentials.certificate.as_bytes()),
            )
            .send()
            .await
            .map_err(|e| self.map_send_error(&url, e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(OrdererError::ChannelNotFound(channel.to_string()));
        }
        let response = response
            .error_for_status()
            .map_err(|e| OrdererError::BadResponse {
                reason: e.to_string(),
            })?;

        let body: FetchConfigResponse =
            response.json().await.map_err(|e| OrdererError::BadResponse {
                reason: format!("unparseable fetch-config response: {e}"),
            })?;
        base64::engine::general_purpose::STANDARD
            .decode(body.config)
            .map_err(|e| OrdererError::BadResponse {
                reason: format!("config payload is not valid base64: {e}"),
            })
    }

    async fn submit_config_update(
        &self,
        submission: &UpdateSubmission,
        identity: &Identity,
    ) -> Result<OrdererAck, OrdererError> {
        let url = self.channel_url(&submission.channel, "config-updates");
        debug!(
            "[channel-update] submitting tx {} for `{}` with {} signature(s)",
            submission.tx_id,
            submission.channel,
            submission.signatures.len()
        );

        let body = serde_json::json!({
            "tx_id": submission.tx_id,
            "channel": submission.channel,
            "config_update_envelope": base64::engine::general_purpose::STANDARD
                .encode(&submission.envelope),
            "signatures": submission.signatures,
            "submitter_msp_id": identity.msp_id,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(&url, e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(OrdererError::ChannelNotFound(submission.channel.to_string()));
        }

        // The service reports validation outcomes in the body even on
        // non-2xx responses; only an unparseable body is a transport error.
        let ack: StatusResponse =
            response.json().await.map_err(|e| OrdererError::BadResponse {
                reason: format!("unparseable submission response: {e}"),
            })?;
        Ok(OrdererAck {
            status: ack.status,
            info: ack.info,
        })
    }
}
