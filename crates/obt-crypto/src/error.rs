//! Error type shared by every stage of the OBT encrypt/decrypt pipeline.
//!
//! None of these are transient: each one is either malformed input or an
//! integrity failure, so callers surface them directly and never retry.

/// Errors produced while encoding, sealing, opening, or decoding OBT content.
#[derive(Debug, thiserror::Error)]
pub enum ObtError {
    /// Key string or raw key material is malformed, has a bad checksum,
    /// or does not describe a point on secp256k1.
    #[error("invalid key format: {0}")]
    KeyFormat(String),

    /// ECDH produced an unusable shared point.
    #[error("key agreement failed: {0}")]
    KeyAgreement(String),

    /// Envelope bytes are truncated, misaligned, or not valid hex.
    #[error("invalid envelope: {0}")]
    EnvelopeFormat(String),

    /// HMAC tag did not verify. The message must be discarded.
    #[error("authentication failed: hmac tag mismatch")]
    Authentication,

    /// Decrypted block carries an impossible padding length.
    #[error("invalid padding: pad length {pad_len} for {len} byte block")]
    Padding { pad_len: usize, len: usize },

    /// Plaintext does not decode as the requested content type.
    #[error("content serialization failed: {0}")]
    Serialization(String),

    /// The OS random source failed.
    #[error("RNG failed")]
    Rng,
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ObtError>;

impl ObtError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ObtError::KeyFormat(_) => "key_format",
            ObtError::KeyAgreement(_) => "key_agreement",
            ObtError::EnvelopeFormat(_) => "envelope_format",
            ObtError::Authentication => "authentication",
            ObtError::Padding { .. } => "padding",
            ObtError::Serialization(_) => "serialization",
            ObtError::Rng => "rng",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_distinct() {
        let errors = [
            ObtError::KeyFormat("x".into()),
            ObtError::KeyAgreement("x".into()),
            ObtError::EnvelopeFormat("x".into()),
            ObtError::Authentication,
            ObtError::Padding { pad_len: 0, len: 16 },
            ObtError::Serialization("x".into()),
            ObtError::Rng,
        ];
        let mut kinds: Vec<&str> = errors.iter().map(|e| e.kind()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn test_padding_message_includes_lengths() {
        let e = ObtError::Padding { pad_len: 40, len: 32 };
        assert_eq!(e.to_string(), "invalid padding: pad length 40 for 32 byte block");
    }
}
