//! Command implementations, independent of argument parsing and printing.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use obt_crypto::{ContentType, KeyPair, ObtContent, PrivateKey, PublicKey};
use serde::Serialize;

/// Key material shown by `keygen` and `pubkey`.
#[derive(Debug, Clone, Serialize)]
pub struct KeyInfo {
    pub public_key: String,
    pub public_key_k1: String,
    /// Only set by `keygen`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

/// Result of `secret`.
#[derive(Debug, Clone, Serialize)]
pub struct SecretInfo {
    pub peer: String,
    pub cipher_key: String,
    pub mac_key: String,
}

/// Result of `encrypt`.
#[derive(Debug, Clone, Serialize)]
pub struct EncryptedContent {
    pub content_type: ContentType,
    pub content: String,
}

/// Result of `decrypt`.
#[derive(Debug, Clone, Serialize)]
pub struct DecryptedContent {
    pub content_type: ContentType,
    pub content: ObtContent,
}

pub fn keygen() -> KeyInfo {
    let pair = KeyPair::generate();
    KeyInfo {
        public_key: pair.public.to_fio_string(),
        public_key_k1: pair.public.to_k1_string(),
        private_key: Some(pair.private.to_wif()),
    }
}

pub fn pubkey(private: &PrivateKey) -> KeyInfo {
    let public = private.public_key();
    KeyInfo {
        public_key: public.to_fio_string(),
        public_key_k1: public.to_k1_string(),
        private_key: None,
    }
}

pub fn secret(private: &PrivateKey, peer: &str) -> anyhow::Result<SecretInfo> {
    let peer_key = PublicKey::decode(peer).context("decoding peer public key")?;
    let secret = obt_crypto::derive(private, &peer_key)?;
    Ok(SecretInfo {
        peer: peer_key.to_fio_string(),
        cipher_key: hex::encode(secret.cipher_key()),
        mac_key: hex::encode(secret.mac_key()),
    })
}

pub fn encrypt(
    private: &PrivateKey,
    recipient: &str,
    content_type: ContentType,
    json: &str,
) -> anyhow::Result<EncryptedContent> {
    let content = ObtContent::from_json(content_type, json)?;
    let hex_envelope = obt_crypto::encrypt_content(&content, private, recipient)
        .context("encrypting content")?;
    Ok(EncryptedContent {
        content_type,
        content: hex_envelope,
    })
}

pub fn decrypt(
    private: &PrivateKey,
    sender: &str,
    content_type: ContentType,
    hex_envelope: &str,
) -> anyhow::Result<DecryptedContent> {
    let content = obt_crypto::decrypt_content(hex_envelope, private, sender, content_type)
        .context("decrypting content")?;
    Ok(DecryptedContent {
        content_type,
        content,
    })
}

/// Read a file, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}
