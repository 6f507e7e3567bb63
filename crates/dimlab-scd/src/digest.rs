//! Attribute fingerprints (versioned).
//!
//! Change detection needs a stable way to ask "is the incoming value the one
//! we already hold?" without comparing full attribute payloads. We use a
//! **simple, deterministic, non-cryptographic** digest:
//!
//! - algorithm: **FNV-1a 64-bit**
//! - input: the UTF-8 bytes of the attribute value as-given
//! - output: `"fnv1a64:<16 lowercase hex digits>"`
//!
//! Notes:
//! - This fingerprint is **not** a security primitive. It exists so a row can
//!   carry a short, printable token that changes whenever the tracked value
//!   changes, which is all the diff step needs.
//! - Collisions are possible in principle; equality of fingerprints is used
//!   as "no change" the same way warehouse MERGE pipelines use a hash column.

use serde::{Deserialize, Serialize};

/// Prefix used in serialized fingerprints.
pub const FINGERPRINT_V1_PREFIX: &str = "fnv1a64:";

/// A v1 attribute fingerprint.
///
/// Stored on every [`crate::DimensionRecord`] and recomputed for incoming
/// values by the change detector. Total over all strings, including `""`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the v1 fingerprint (FNV-1a 64-bit) of an attribute value.
pub fn fingerprint_v1(value: &str) -> Fingerprint {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x00000100000001b3;

    let mut hash = FNV_OFFSET_BASIS;
    for b in value.as_bytes() {
        hash ^= (*b) as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }

    Fingerprint(format!("{FINGERPRINT_V1_PREFIX}{hash:016x}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_has_expected_prefix_and_width() {
        let fp = fingerprint_v1("Seattle, WA");
        assert!(fp.as_str().starts_with(FINGERPRINT_V1_PREFIX));
        assert_eq!(fp.as_str().len(), FINGERPRINT_V1_PREFIX.len() + 16);
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(fingerprint_v1("Delhi"), fingerprint_v1("Delhi"));
    }

    #[test]
    fn fingerprint_changes_when_value_changes() {
        assert_ne!(fingerprint_v1("Delhi"), fingerprint_v1("Mumbai"));
    }

    #[test]
    fn fingerprint_is_total_over_empty_input() {
        let fp = fingerprint_v1("");
        assert_eq!(fp.as_str().len(), FINGERPRINT_V1_PREFIX.len() + 16);
    }
}
