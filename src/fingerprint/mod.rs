//! File identity fingerprinting.
//!
//! A [`Fingerprint`] is the cache key for a parse result. Content hashing is
//! the primary path: byte-identical re-uploads map to the same key even when
//! the filename or mtime changed. [`fingerprint_identity`] exists for callers
//! that only hold metadata (name + size + mtime) and accept the weaker
//! guarantee.

use blake3::Hasher;
use serde::{Deserialize, Serialize};

/// Deterministic identity key for an uploaded file.
///
/// Wraps a 32-byte BLAKE3 digest. Construction goes through
/// [`fingerprint_content`] or [`fingerprint_identity`]; the two are
/// domain-separated so a metadata fingerprint can never collide with a
/// content fingerprint of the same bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Returns the raw digest bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering, used as the KV store key suffix.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

const CONTENT_DOMAIN: &[u8] = b"sift:content:v1";
const IDENTITY_DOMAIN: &[u8] = b"sift:identity:v1";

/// Fingerprints a file by its content. Deterministic, pure, no I/O.
#[inline]
pub fn fingerprint_content(bytes: &[u8]) -> Fingerprint {
    let mut hasher = Hasher::new();
    hasher.update(CONTENT_DOMAIN);
    hasher.update(bytes);
    Fingerprint(*hasher.finalize().as_bytes())
}

/// Fingerprints a file by name + size + last-modified time.
///
/// Weaker than [`fingerprint_content`]: a re-upload with identical bytes but
/// altered metadata produces a different key. Field boundaries are hashed
/// explicitly so `("ab", 1)` and `("a", ...)` style ambiguities cannot
/// collide.
#[inline]
pub fn fingerprint_identity(name: &str, size: u64, modified_unix: i64) -> Fingerprint {
    let mut hasher = Hasher::new();
    hasher.update(IDENTITY_DOMAIN);
    hasher.update(name.as_bytes());
    hasher.update(b"|");
    hasher.update(&size.to_le_bytes());
    hasher.update(&modified_unix.to_le_bytes());
    Fingerprint(*hasher.finalize().as_bytes())
}
