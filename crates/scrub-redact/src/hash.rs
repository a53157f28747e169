//! Keyed cryptographic hashing for redaction tokens.
//!
//! Uses HMAC-SHA256 with truncated output to provide stable,
//! non-reversible digests. The key is the deployment secret from the
//! pipeline configuration, never derived from document content, so
//! changing the key changes every emitted token.

use hmac::{Hmac, Mac};
use scrub_common::{Result, ScrubError};
use sha2::Sha256;

/// Number of bytes kept from the HMAC output (12 hex chars).
pub const DIGEST_TRUNCATION_BYTES: usize = 6;

/// Key material for HMAC-SHA256.
#[derive(Clone)]
pub struct KeyMaterial {
    key: Vec<u8>,
}

impl KeyMaterial {
    /// Create key material from the configured secret.
    ///
    /// An empty secret is a configuration error, caught at startup.
    pub fn new(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(ScrubError::Configuration(
                "secret key must not be empty".to_string(),
            ));
        }
        Ok(Self {
            key: secret.as_bytes().to_vec(),
        })
    }

    /// Compute HMAC-SHA256 of the input and return the truncated hex digest.
    pub fn digest(&self, input: &str) -> String {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(input.as_bytes());
        let result = mac.finalize().into_bytes();
        hex::encode(&result[..DIGEST_TRUNCATION_BYTES])
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key bytes in debug output
        f.debug_struct("KeyMaterial").finish_non_exhaustive()
    }
}
