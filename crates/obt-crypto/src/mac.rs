//! HMAC-SHA256 over `IV || ciphertext`.

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{ObtError, Result};

pub const TAG_LEN: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// Compute the 32-byte tag over `data`.
pub fn sign(mac_key: &[u8; 32], data: &[u8]) -> [u8; TAG_LEN] {
    let mut mac = HmacSha256::new_from_slice(mac_key).expect("HMAC can take keys of any size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Recompute the tag and compare in constant time.
///
/// A tag of the wrong length never matches.
pub fn verify(mac_key: &[u8; 32], data: &[u8], tag: &[u8]) -> bool {
    let expected = sign(mac_key, data);
    constant_time_eq(&expected, tag)
}

/// Like [`verify`], but fails closed with [`ObtError::Authentication`].
pub fn check(mac_key: &[u8; 32], data: &[u8], tag: &[u8]) -> Result<()> {
    if verify(mac_key, data, tag) {
        Ok(())
    } else {
        Err(ObtError::Authentication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc4231_case_2() {
        let mut mac = HmacSha256::new_from_slice(b"Jefe").unwrap();
        mac.update(b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(mac.finalize().into_bytes()),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );

        // Zero-padding a short key up to the block size leaves HMAC unchanged.
        let mut key = [0u8; 32];
        key[..4].copy_from_slice(b"Jefe");
        assert_eq!(
            hex::encode(sign(&key, b"what do ya want for nothing?")),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_verify_roundtrip() {
        let key = [7u8; 32];
        let tag = sign(&key, b"iv and ciphertext");
        assert!(verify(&key, b"iv and ciphertext", &tag));
        assert!(check(&key, b"iv and ciphertext", &tag).is_ok());
    }

    #[test]
    fn test_verify_rejects_flipped_bit() {
        let key = [7u8; 32];
        let mut tag = sign(&key, b"data");
        tag[31] ^= 0x01;
        assert!(!verify(&key, b"data", &tag));
        assert!(matches!(check(&key, b"data", &tag), Err(ObtError::Authentication)));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let tag = sign(&[1u8; 32], b"data");
        assert!(!verify(&[2u8; 32], b"data", &tag));
    }

    #[test]
    fn test_verify_rejects_short_tag() {
        let key = [7u8; 32];
        let tag = sign(&key, b"data");
        assert!(!verify(&key, b"data", &tag[..16]));
        assert!(!verify(&key, b"data", &[]));
    }
}
