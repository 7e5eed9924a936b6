//! Canonical serialization and hashing
//!
//! Reproducibility records hash their input so that two rating runs over the
//! same input and rate-table snapshot can be proven identical. The hash is
//! computed over a canonical JSON form: struct fields serialize in
//! declaration order and all map-shaped fields in the rating types are
//! BTreeMaps, so equal values always produce byte-identical JSON.

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors produced while canonicalizing a value
#[derive(Debug, Error)]
pub enum CanonicalError {
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Serializes a value to its canonical JSON form
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    Ok(serde_json::to_string(value)?)
}

/// Returns the lowercase hex SHA-256 digest of the given bytes
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Canonicalizes and hashes a value in one step
pub fn hash_canonical<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let json = canonical_json(value)?;
    Ok(sha256_hex(json.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Sample {
        name: String,
        tags: BTreeMap<String, String>,
    }

    #[test]
    fn test_sha256_known_vector() {
        // SHA-256 of the empty string
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_equal_values_hash_identically() {
        let mut tags = BTreeMap::new();
        tags.insert("b".to_string(), "2".to_string());
        tags.insert("a".to_string(), "1".to_string());

        let one = Sample { name: "x".into(), tags: tags.clone() };
        let two = Sample { name: "x".into(), tags };

        assert_eq!(hash_canonical(&one).unwrap(), hash_canonical(&two).unwrap());
    }

    #[test]
    fn test_different_values_hash_differently() {
        let one = Sample { name: "x".into(), tags: BTreeMap::new() };
        let two = Sample { name: "y".into(), tags: BTreeMap::new() };
        assert_ne!(hash_canonical(&one).unwrap(), hash_canonical(&two).unwrap());
    }
}
