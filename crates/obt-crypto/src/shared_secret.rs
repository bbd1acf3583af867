//! ECDH key agreement and the SHA-512 stretch into cipher and MAC keys.
//!
//! secret = SHA-512(x-coordinate of priv * pub)
//! cipher_key = secret[0..32], mac_key = secret[32..64]

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{ObtError, Result};
use crate::hash::sha512;
use crate::keys::{PrivateKey, PublicKey};

/// 64 bytes of key material shared by a (sender, recipient) pair.
///
/// Symmetric: derive(A_priv, B_pub) == derive(B_priv, A_pub).
/// Lives for a single encrypt or decrypt call.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    cipher_key: [u8; 32],
    mac_key: [u8; 32],
}

impl SharedSecret {
    fn from_digest(digest: [u8; 64]) -> Self {
        let mut digest = Zeroizing::new(digest);
        let mut secret = Self {
            cipher_key: [0u8; 32],
            mac_key: [0u8; 32],
        };
        secret.cipher_key.copy_from_slice(&digest[..32]);
        secret.mac_key.copy_from_slice(&digest[32..]);
        digest.zeroize();
        secret
    }

    /// AES-256 key, first half of the stretched secret.
    pub fn cipher_key(&self) -> &[u8; 32] {
        &self.cipher_key
    }

    /// HMAC-SHA256 key, second half of the stretched secret.
    pub fn mac_key(&self) -> &[u8; 32] {
        &self.mac_key
    }

    /// All 64 bytes in wire order. Treat as secret.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 64]> {
        let mut out = Zeroizing::new([0u8; 64]);
        out[..32].copy_from_slice(&self.cipher_key);
        out[32..].copy_from_slice(&self.mac_key);
        out
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

/// Derive the shared secret between `private` and `public`.
pub fn derive(private: &PrivateKey, public: &PublicKey) -> Result<SharedSecret> {
    let shared = k256::ecdh::diffie_hellman(private.scalar(), public.as_affine());
    let x = shared.raw_secret_bytes();
    if x.iter().all(|b| *b == 0) {
        return Err(ObtError::KeyAgreement("shared point has zero x-coordinate".into()));
    }
    Ok(SharedSecret::from_digest(sha512(x)))
}

/// Convenience wrapper that decodes the counterparty's public key string first.
pub fn derive_from_str(private: &PrivateKey, public: &str) -> Result<SharedSecret> {
    let public = PublicKey::decode(public)?;
    derive(private, &public)
}
