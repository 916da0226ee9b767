//! # Ports Layer
//!
//! Trait definitions for this subsystem's boundaries: the inbound API the
//! pipeline exposes, and the driven ports its external collaborators
//! implement.

pub mod inbound;
pub mod outbound;
