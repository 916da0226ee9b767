//! # Adapters Layer
//!
//! Implementations of the outbound ports against the real external
//! collaborators, plus the request-scoped scratch directory.

pub mod codec;
pub mod orderer;
pub mod scratch;
pub mod signatures;
pub mod wallet;

pub use codec::ConfigtxlatorCodec;
pub use orderer::HttpOrdererGateway;
pub use scratch::RequestScratch;
pub use signatures::FileSignatureStore;
pub use wallet::FileWallet;
