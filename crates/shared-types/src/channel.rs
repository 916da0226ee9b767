//! # Channel Naming
//!
//! Validated channel names and the application/system channel distinction.

use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum channel name length accepted by the ordering service.
const MAX_CHANNEL_NAME_LEN: usize = 249;

/// A validated channel name.
///
/// Channel names are restricted to lowercase alphanumerics, `.` and `-`,
/// must start with a letter, and are bounded in length. Validation happens
/// once at the edge; the rest of the pipeline carries the proven type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelName(String);

impl ChannelName {
    /// Parse and validate a channel name.
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidChannelName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("name is empty"));
        }
        if name.len() > MAX_CHANNEL_NAME_LEN {
            return Err(invalid("name exceeds 249 characters"));
        }
        let mut chars = name.chars();
        let first = chars.next().unwrap_or_default();
        if !first.is_ascii_lowercase() {
            return Err(invalid("first character must be a lowercase letter"));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '.' || *c == '-'))
        {
            return Err(invalid(&format!(
                "character `{bad}` not allowed (lowercase alphanumerics, `.` and `-` only)"
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChannelName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ChannelName> for String {
    fn from(value: ChannelName) -> Self {
        value.0
    }
}

/// Whether an update targets an application channel or the system channel.
///
/// The two differ only in which top-level group an orderer-side patch
/// addresses; the pipeline itself is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    Application,
    System,
}
