//! Content addressing for submitted lyrics.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the exact lyrics bytes. No normalization is applied.
pub fn content_hash(lyrics: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(lyrics.as_bytes());
    format!("{:x}", hasher.finalize())
}
