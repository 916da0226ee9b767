//! # Integration Tests
//!
//! Cross-component choreography: draft → sign (×N orgs) → submit against
//! the mock ordering service, plus the concurrent signature-deposit
//! discipline.

mod concurrency;
mod flows;
