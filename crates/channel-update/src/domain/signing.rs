//! # Signature Construction
//!
//! Produces one organization's signature over canonical envelope bytes.
//! The signature header binds the signing org (MSP id + certificate) and a
//! fresh nonce; the ECDSA P-256 signature covers header bytes followed by
//! envelope bytes, so neither can be swapped after the fact.
//!
//! Byte fields are carried as base64 wherever they appear in JSON: one
//! canonical binary-safe encoding end to end.

use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::DecodePrivateKey;
use p256::SecretKey;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};
use sha2::{Digest, Sha256};
use shared_types::{Identity, IdentityError};
use std::collections::BTreeMap;

/// Nonce length inside signature headers and transaction ids.
pub const NONCE_LEN: usize = 24;

/// The signing organization, as bound into a signature header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub msp_id: String,
    /// PEM certificate of the admin identity. The ordering service checks
    /// it against the org's current MSP definition.
    pub certificate: String,
}

/// Header bound into every signature.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureHeader {
    pub creator: Creator,
    #[serde_as(as = "Base64")]
    pub nonce: Vec<u8>,
}

/// One organization's signature over an encoded envelope.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSignature {
    /// Serialized [`SignatureHeader`] bytes, exactly as signed.
    #[serde_as(as = "Base64")]
    pub signature_header: Vec<u8>,
    /// DER-encoded ECDSA P-256 signature over header || envelope.
    #[serde_as(as = "Base64")]
    pub signature: Vec<u8>,
}

impl ConfigSignature {
    /// Parse the bound header back out of the signed bytes.
    pub fn header(&self) -> Result<SignatureHeader, serde_json::Error> {
        serde_json::from_slice(&self.signature_header)
    }
}

/// Sign encoded envelope bytes with an organization's admin identity.
///
/// The identity must be X.509-typed; `label` names it in error messages.
pub fn sign(
    envelope: &[u8],
    identity: &Identity,
    label: &str,
) -> Result<ConfigSignature, IdentityError> {
    identity.require_x509(label)?;

    let signing_key = parse_signing_key(&identity.credentials.private_key, label)?;

    let mut nonce = vec![0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce);

    let header = SignatureHeader {
        creator: Creator {
            msp_id: identity.msp_id.clone(),
            certificate: identity.credentials.certificate.clone(),
        },
        nonce,
    };
    let header_bytes =
        serde_json::to_vec(&header).map_err(|e| IdentityError::MalformedCredentials {
            label: label.to_string(),
            reason: e.to_string(),
        })?;

    let mut message = Vec::with_capacity(header_bytes.len() + envelope.len());
    message.extend_from_slice(&header_bytes);
    message.extend_from_slice(envelope);

    let signature: Signature =
        signing_key
            .try_sign(&message)
            .map_err(|e| IdentityError::MalformedCredentials {
                label: label.to_string(),
                reason: format!("signing failed: {e}"),
            })?;

    Ok(ConfigSignature {
        signature_header: header_bytes,
        signature: signature.to_der().as_bytes().to_vec(),
    })
}

/// Check a signature against the signed envelope bytes and a known key.
///
/// The ordering service performs the authoritative check against each
/// org's current MSP; this is the local counterpart used in tests and
/// diagnostics.
pub fn verify(signature: &ConfigSignature, envelope: &[u8], key: &VerifyingKey) -> bool {
    let Ok(parsed) = Signature::from_der(&signature.signature) else {
        return false;
    };
    let mut message =
        Vec::with_capacity(signature.signature_header.len() + envelope.len());
    message.extend_from_slice(&signature.signature_header);
    message.extend_from_slice(envelope);
    key.verify(&message, &parsed).is_ok()
}

/// Generate a transaction id for a submission: hex of SHA-256 over a fresh
/// nonce and the submitting creator.
pub fn transaction_id(creator: &Creator) -> String {
    let mut nonce = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce);

    let mut hasher = Sha256::new();
    hasher.update(nonce);
    hasher.update(creator.msp_id.as_bytes());
    hasher.update(creator.certificate.as_bytes());
    hex::encode(hasher.finalize())
}

/// Wallet keys appear both as PKCS#8 (`BEGIN PRIVATE KEY`) and SEC1
/// (`BEGIN EC PRIVATE KEY`) PEM.
fn parse_signing_key(pem: &str, label: &str) -> Result<SigningKey, IdentityError> {
    let secret = match SecretKey::from_pkcs8_pem(pem) {
        Ok(secret) => secret,
        Err(_) => {
            SecretKey::from_sec1_pem(pem).map_err(|e| IdentityError::MalformedCredentials {
                label: label.to_string(),
                reason: format!("unreadable private key: {e}"),
            })?
        }
    };
    Ok(SigningKey::from(secret))
}

/// Signatures keyed by organization (MSP id), iterated in stable order.
///
/// Deposits arrive in arbitrary order from independent processes; the set
/// de-duplicates by org identity, never by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureSet {
    by_org: BTreeMap<String, ConfigSignature>,
}

impl SignatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a signature for an org. Returns `false` (keeping the first
    /// deposit) if the org already signed.
    pub fn insert(&mut self, msp_id: String, signature: ConfigSignature) -> bool {
        use std::collections::btree_map::Entry;
        match self.by_org.entry(msp_id) {
            Entry::Vacant(slot) => {
                slot.insert(signature);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn contains(&self, msp_id: &str) -> bool {
        self.by_org.contains_key(msp_id)
    }

    pub fn len(&self) -> usize {
        self.by_org.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_org.is_empty()
    }

    /// Organizations that have signed, in stable order.
    pub fn orgs(&self) -> impl Iterator<Item = &str> {
        self.by_org.keys().map(String::as_str)
    }

    /// Signatures in stable (org-sorted) order.
    pub fn into_signatures(self) -> Vec<ConfigSignature> {
        self.by_org.into_values().collect()
    }
}
