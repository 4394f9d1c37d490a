use std::fmt::Write;

use sha2::{Digest, Sha256};

/// Full SHA-256 hex digest of the given text. An equality token for change
/// detection, not a security boundary.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
