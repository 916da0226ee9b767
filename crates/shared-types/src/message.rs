//! # Codec Message Types
//!
//! The three protobuf message shapes the external codec tool converts
//! between binary and tree form.

use std::fmt;

/// Message type selector for codec operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// A committed channel configuration (`common.Config`).
    Config,
    /// A computed configuration delta (`common.ConfigUpdate`).
    ConfigUpdate,
    /// The signed outer wrapper (`common.Envelope`).
    Envelope,
}

impl MessageType {
    /// The fully qualified name the codec tool expects.
    pub fn proto_name(self) -> &'static str {
        match self {
            Self::Config => "common.Config",
            Self::ConfigUpdate => "common.ConfigUpdate",
            Self::Envelope => "common.Envelope",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.proto_name())
    }
}
