//! Content-addressed transaction identity.
//!
//! A [`Fingerprint`] is derived from exactly five fields of a
//! [`Transaction`]: notification date, transaction date, insider name, share
//! count and total value. Two transactions with equal fingerprints are the
//! same disclosed event, whatever their other fields say.
//!
//! The hash algorithm sits behind [`Fingerprinter`] so it can be replaced
//! without touching the diff engine or its callers.

use crate::model::Transaction;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex-encoded identity digest of a transaction
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a transaction to its identity digest.
///
/// Implementations must be pure and deterministic, and must only read the
/// five identity fields.
pub trait Fingerprinter {
    fn fingerprint(&self, transaction: &Transaction) -> Fingerprint;
}

/// SHA-256 over the length-prefixed identity fields.
///
/// Each field is fed as its byte length (u64, little endian) followed by its
/// UTF-8 bytes, so `("ab", "c")` and `("a", "bc")` never collide.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Fingerprinter;

impl Fingerprinter for Sha256Fingerprinter {
    fn fingerprint(&self, transaction: &Transaction) -> Fingerprint {
        let mut hasher = Sha256::new();
        for field in transaction.identity_fields() {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        Fingerprint(hex::encode(hasher.finalize()))
    }
}

/// Fingerprint with the default algorithm
pub fn fingerprint(transaction: &Transaction) -> Fingerprint {
    Sha256Fingerprinter.fingerprint(transaction)
}
