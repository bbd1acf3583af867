//! AES-256-CBC with explicit block padding.
//!
//! Padding is applied here rather than by the cipher crate so the unpad rule
//! can stay compatible with existing FIO clients: only the final byte is
//! inspected, and it must lie in `1..=len`. The remaining pad bytes are not
//! checked. Any tampering with them is already caught by the HMAC, which is
//! always verified before `decrypt` runs.

use aes::Aes256;
use ::cbc::cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use zeroize::Zeroizing;

use crate::error::{ObtError, Result};

pub const BLOCK_SIZE: usize = 16;
pub const IV_LEN: usize = 16;

type Aes256CbcEnc = ::cbc::Encryptor<Aes256>;
type Aes256CbcDec = ::cbc::Decryptor<Aes256>;

/// Append `16 - len % 16` bytes, each equal to the pad length.
/// Block-aligned input gets a whole extra block.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - data.len() % BLOCK_SIZE;
    let mut out = Vec::with_capacity(data.len() + pad_len);
    out.extend_from_slice(data);
    out.resize(data.len() + pad_len, pad_len as u8);
    out
}

/// Strip padding using the last byte only.
pub fn unpad(mut data: Vec<u8>) -> Result<Vec<u8>> {
    let len = data.len();
    let pad_len = data.last().copied().unwrap_or(0) as usize;
    if pad_len == 0 || pad_len > len {
        return Err(ObtError::Padding { pad_len, len });
    }
    data.truncate(len - pad_len);
    Ok(data)
}

/// Pad and encrypt. Output length is a positive multiple of 16.
pub fn encrypt(cipher_key: &[u8; 32], iv: &[u8; IV_LEN], plaintext: &[u8]) -> Vec<u8> {
    let padded = Zeroizing::new(pad(plaintext));
    Aes256CbcEnc::new(cipher_key.into(), iv.into()).encrypt_padded_vec_mut::<NoPadding>(&padded)
}

/// Decrypt and unpad.
pub fn decrypt(cipher_key: &[u8; 32], iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(ObtError::EnvelopeFormat(format!(
            "ciphertext length {} is not a positive multiple of {BLOCK_SIZE}",
            ciphertext.len()
        )));
    }
    let padded = Aes256CbcDec::new(cipher_key.into(), iv.into())
        .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
        .map_err(|_| ObtError::EnvelopeFormat("ciphertext is not block aligned".into()))?;
    unpad(padded)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x42; 32];
    const IV: [u8; 16] = [0x24; 16];

    #[test]
    fn test_pad_lengths() {
        for (len, padded) in [(0, 16), (1, 16), (15, 16), (16, 32), (17, 32), (128, 144)] {
            let data = vec![0xAB; len];
            let out = pad(&data);
            assert_eq!(out.len(), padded, "input length {len}");
            assert_eq!(&out[..len], &data[..]);

            let pad_byte = (padded - len) as u8;
            assert!(out[len..].iter().all(|b| *b == pad_byte));
            assert_eq!(unpad(out).unwrap(), data);
        }
    }

    #[test]
    fn test_unpad_rejects_zero() {
        let mut block = vec![7u8; 16];
        block[15] = 0;
        assert!(matches!(
            unpad(block),
            Err(ObtError::Padding { pad_len: 0, len: 16 })
        ));
    }

    #[test]
    fn test_unpad_rejects_overlong() {
        let mut block = vec![0u8; 16];
        block[15] = 17;
        assert!(matches!(
            unpad(block),
            Err(ObtError::Padding { pad_len: 17, len: 16 })
        ));
    }

    #[test]
    fn test_unpad_empty() {
        assert!(matches!(unpad(Vec::new()), Err(ObtError::Padding { .. })));
    }

    #[test]
    fn test_unpad_ignores_inner_pad_bytes() {
        // Only the last byte is consulted.
        let mut block = vec![0xEEu8; 16];
        block[15] = 3;
        assert_eq!(unpad(block).unwrap(), vec![0xEEu8; 13]);
    }

    #[test]
    fn test_unpad_whole_block() {
        assert!(unpad(vec![16u8; 16]).unwrap().is_empty());
    }

    #[test]
    fn test_encrypt_decrypt() {
        let msg = b"payment for invoice 42";
        let ct = encrypt(&KEY, &IV, msg);
        assert_eq!(ct.len(), 32);
        assert_ne!(&ct[..msg.len()], &msg[..]);
        assert_eq!(decrypt(&KEY, &IV, &ct).unwrap(), msg);
    }

    #[test]
    fn test_empty_plaintext_is_one_block() {
        let ct = encrypt(&KEY, &IV, b"");
        assert_eq!(ct.len(), 16);
        assert!(decrypt(&KEY, &IV, &ct).unwrap().is_empty());
    }

    #[test]
    fn test_iv_changes_ciphertext() {
        let other_iv = [0x25u8; 16];
        assert_ne!(encrypt(&KEY, &IV, b"same"), encrypt(&KEY, &other_iv, b"same"));
    }

    #[test]
    fn test_decrypt_rejects_misaligned() {
        assert!(matches!(
            decrypt(&KEY, &IV, &[0u8; 17]),
            Err(ObtError::EnvelopeFormat(_))
        ));
        assert!(matches!(
            decrypt(&KEY, &IV, &[]),
            Err(ObtError::EnvelopeFormat(_))
        ));
    }
}
