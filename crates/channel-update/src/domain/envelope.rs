//! # Update Envelope Builder
//!
//! Wraps a decoded configuration delta in the signed-update envelope shape
//! the ordering service expects. The envelope must be re-encoded to binary
//! by the codec before signing; signatures bind the encoded bytes.

use serde_json::{json, Value};
use shared_types::ChannelName;

/// Channel-header transaction type for configuration updates.
///
/// Protocol constant. Altering it produces an envelope the ordering
/// service will not treat as a config transaction.
pub const CONFIG_UPDATE_TRANSACTION_TYPE: u32 = 2;

/// Wrap a decoded config-update delta for the given channel.
pub fn wrap(config_update: Value, channel: &ChannelName) -> Value {
    json!({
        "payload": {
            "header": {
                "channel_header": {
                    "channel_id": channel.as_str(),
                    "type": CONFIG_UPDATE_TRANSACTION_TYPE,
                }
            },
            "data": {
                "config_update": config_update,
            }
        }
    })
}
