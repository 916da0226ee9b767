//! # Ledger-Ops Test Suite
//!
//! Unified test crate for cross-component pipeline flows.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support/       # Mock codec, mock ordering service, org fixtures
//! └── integration/   # End-to-end draft → sign → submit choreography
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ledger-ops-tests
//!
//! # By category
//! cargo test -p ledger-ops-tests integration::
//! ```


#[cfg(test)]
mod integration;
