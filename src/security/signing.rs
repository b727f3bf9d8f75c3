//! Keyed signing for cookie values.
//!
//! # Responsibilities
//! - Sign flash and CSRF cookie payloads with the configured secret
//! - Reject tampered or foreign cookie values on read
//!
//! # Design Decisions
//! - Signature is appended as a final dot-separated hex digest
//! - A missing or wrong signature reads as "no cookie", never an error

use sha2::{Digest, Sha256};

/// Sign `payload` with `secret`, producing `payload.<hex digest>`.
pub fn sign(secret: &str, payload: &str) -> String {
    format!("{}.{}", payload, digest(secret, payload))
}

/// Verify a signed value, returning the payload if the signature matches.
pub fn verify<'a>(secret: &str, signed: &'a str) -> Option<&'a str> {
    let (payload, signature) = signed.rsplit_once('.')?;
    if digest(secret, payload) == signature {
        Some(payload)
    } else {
        None
    }
}

fn digest(secret: &str, payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update([0u8]);
    hasher.update(payload.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
