//! Envelope framing: `IV(16) || ciphertext(16*k, k >= 1) || HMAC tag(32)`.
//!
//! The envelope carries no version, type, or length fields. The payload
//! variant is agreed out of band, and lengths follow from the fixed-size
//! IV and tag.

use bytes::{BufMut, BytesMut};

use crate::cbc::{BLOCK_SIZE, IV_LEN};
use crate::error::{ObtError, Result};
use crate::mac::TAG_LEN;

/// Smallest valid envelope: IV, one ciphertext block, tag.
pub const MIN_ENVELOPE_LEN: usize = IV_LEN + BLOCK_SIZE + TAG_LEN;

/// A parsed envelope. Parsing only checks lengths; the tag is verified by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub iv: [u8; IV_LEN],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

impl Envelope {
    /// Split framed bytes into IV, ciphertext and tag.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MIN_ENVELOPE_LEN {
            return Err(ObtError::EnvelopeFormat(format!(
                "envelope is {} bytes, need at least {MIN_ENVELOPE_LEN}",
                bytes.len()
            )));
        }

        let (iv, rest) = bytes.split_at(IV_LEN);
        let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);
        if ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(ObtError::EnvelopeFormat(format!(
                "ciphertext region of {} bytes is not a multiple of {BLOCK_SIZE}",
                ciphertext.len()
            )));
        }

        let mut env = Envelope {
            iv: [0u8; IV_LEN],
            ciphertext: ciphertext.to_vec(),
            tag: [0u8; TAG_LEN],
        };
        env.iv.copy_from_slice(iv);
        env.tag.copy_from_slice(tag);
        Ok(env)
    }

    /// Decode lowercase or uppercase hex, then [`Envelope::parse`].
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| ObtError::EnvelopeFormat(format!("invalid hex: {e}")))?;
        Self::parse(&bytes)
    }

    /// The bytes covered by the tag: `IV || ciphertext`.
    pub fn authenticated_data(&self) -> Vec<u8> {
        authenticated_data(&self.iv, &self.ciphertext)
    }

    /// Serialize back to `IV || ciphertext || tag`.
    pub fn to_bytes(&self) -> Vec<u8> {
        frame(&self.iv, &self.ciphertext, &self.tag)
    }

    /// Lowercase hex of [`Envelope::to_bytes`].
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Total framed length in bytes.
    pub fn len(&self) -> usize {
        IV_LEN + self.ciphertext.len() + TAG_LEN
    }

    /// Never true: a parsed envelope holds at least one block.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// `IV || ciphertext`, the input to the HMAC.
pub fn authenticated_data(iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(IV_LEN + ciphertext.len());
    buf.put_slice(iv);
    buf.put_slice(ciphertext);
    buf.to_vec()
}

/// Concatenate the three parts. No validation; callers pass cipher output.
pub fn frame(iv: &[u8; IV_LEN], ciphertext: &[u8], tag: &[u8; TAG_LEN]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(IV_LEN + ciphertext.len() + TAG_LEN);
    buf.put_slice(iv);
    buf.put_slice(ciphertext);
    buf.put_slice(tag);
    buf.to_vec()
}
