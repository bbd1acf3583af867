//! Hybrid encryption for off-chain transaction (OBT) content.
//!
//! Two parties holding secp256k1 keys agree on a shared secret with ECDH,
//! stretch it with SHA-512 into an AES-256-CBC key and an HMAC-SHA256 key,
//! and exchange payloads as hex-encoded `IV || ciphertext || tag` envelopes
//! that can sit in a public ledger record.

#![forbid(unsafe_code)]

pub mod error;
pub mod hash;
pub mod keys;
pub mod shared_secret;

pub mod cbc;
pub mod mac;
pub mod envelope;

pub mod abi;
pub mod content;
pub mod obt;

#[cfg(test)]
mod proptests;

pub use content::{ContentPayload, ContentType, FundsRequest, ObtContent, ObtRecord};
pub use envelope::Envelope;
pub use error::{ObtError, Result};
pub use keys::{decode_private, decode_public, KeyPair, PrivateKey, PublicKey};
pub use obt::{
    decrypt_bytes, decrypt_content, decrypt_payload, encrypt_bytes, encrypt_bytes_with_iv,
    encrypt_content, encrypt_payload,
};
pub use shared_secret::{derive, SharedSecret};
