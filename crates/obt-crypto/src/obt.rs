//! Encrypt and decrypt pipelines for OBT content.
//!
//! Seal: derive -> random IV -> AES-256-CBC -> HMAC(IV || CT) -> frame.
//! Open: parse -> derive -> verify tag -> decrypt. Nothing is decrypted until
//! the tag has verified.

use tracing::{debug, warn};

use crate::cbc::{self, IV_LEN};
use crate::content::{ContentPayload, ContentType, ObtContent};
use crate::envelope::{self, Envelope};
use crate::error::{ObtError, Result};
use crate::keys::{PrivateKey, PublicKey};
use crate::mac;
use crate::shared_secret;

fn random_iv() -> Result<[u8; IV_LEN]> {
    let mut iv = [0u8; IV_LEN];
    getrandom::getrandom(&mut iv).map_err(|_| ObtError::Rng)?;
    Ok(iv)
}

/// Encrypt `plaintext` from `sender` to `recipient` under a fresh random IV.
pub fn encrypt_bytes(sender: &PrivateKey, recipient: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let iv = random_iv()?;
    encrypt_bytes_with_iv(sender, recipient, plaintext, &iv)
}

/// Encrypt under a caller-chosen IV.
///
/// Reusing an IV with the same key pair leaks plaintext equality. Use this only
/// to reproduce fixed vectors; [`encrypt_bytes`] is the normal entry point.
pub fn encrypt_bytes_with_iv(
    sender: &PrivateKey,
    recipient: &PublicKey,
    plaintext: &[u8],
    iv: &[u8; IV_LEN],
) -> Result<Vec<u8>> {
    let secret = shared_secret::derive(sender, recipient)?;
    let ciphertext = cbc::encrypt(secret.cipher_key(), iv, plaintext);
    let tag = mac::sign(secret.mac_key(), &envelope::authenticated_data(iv, &ciphertext));
    let framed = envelope::frame(iv, &ciphertext, &tag);

    debug!(plaintext_len = plaintext.len(), envelope_len = framed.len(), "sealed envelope");
    Ok(framed)
}

/// Verify and decrypt framed envelope bytes sent by `sender` to `recipient`.
pub fn decrypt_bytes(recipient: &PrivateKey, sender: &PublicKey, framed: &[u8]) -> Result<Vec<u8>> {
    let env = Envelope::parse(framed)?;
    open(recipient, sender, &env)
}

fn open(recipient: &PrivateKey, sender: &PublicKey, env: &Envelope) -> Result<Vec<u8>> {
    let secret = shared_secret::derive(recipient, sender)?;

    if let Err(e) = mac::check(secret.mac_key(), &env.authenticated_data(), &env.tag) {
        warn!(envelope_len = env.len(), "envelope authentication failed, discarding");
        return Err(e);
    }

    let plaintext = cbc::decrypt(secret.cipher_key(), &env.iv, &env.ciphertext)?;
    debug!(envelope_len = env.len(), plaintext_len = plaintext.len(), "opened envelope");
    Ok(plaintext)
}

fn seal_hex(sender: &PrivateKey, recipient_public: &str, plaintext: &[u8]) -> Result<String> {
    let recipient = PublicKey::decode(recipient_public)?;
    let framed = encrypt_bytes(sender, &recipient, plaintext)?;
    Ok(hex::encode(framed))
}

fn open_hex(hex_envelope: &str, recipient: &PrivateKey, sender_public: &str) -> Result<Vec<u8>> {
    let env = Envelope::from_hex(hex_envelope)?;
    let sender = PublicKey::decode(sender_public)?;
    open(recipient, &sender, &env)
}

/// Serialize `content`, encrypt it to `recipient_public`, and return lowercase hex.
///
/// `recipient_public` is a key string in `FIO...` or `PUB_K1_...` form.
pub fn encrypt_content(
    content: &ObtContent,
    sender: &PrivateKey,
    recipient_public: &str,
) -> Result<String> {
    let sealed = seal_hex(sender, recipient_public, &content.to_abi_bytes()?)?;
    debug!(content_type = %content.content_type(), "encrypted content");
    Ok(sealed)
}

/// Typed shorthand for [`encrypt_content`].
pub fn encrypt_payload<P>(payload: &P, sender: &PrivateKey, recipient_public: &str) -> Result<String>
where
    P: ContentPayload,
{
    let sealed = seal_hex(sender, recipient_public, &payload.to_abi_bytes()?)?;
    debug!(content_type = %P::CONTENT_TYPE, "encrypted content");
    Ok(sealed)
}

/// Decode hex, verify, decrypt, and deserialize as `content_type`.
///
/// `sender_public` is the counterparty's key string. Fails with
/// [`ObtError::Authentication`] before any decryption if the tag is wrong.
pub fn decrypt_content(
    hex_envelope: &str,
    recipient: &PrivateKey,
    sender_public: &str,
    content_type: ContentType,
) -> Result<ObtContent> {
    let plaintext = open_hex(hex_envelope, recipient, sender_public)?;
    debug!(%content_type, "decrypted content");
    ObtContent::from_abi_bytes(content_type, &plaintext)
}

/// Typed shorthand for [`decrypt_content`].
pub fn decrypt_payload<P>(hex_envelope: &str, recipient: &PrivateKey, sender_public: &str) -> Result<P>
where
    P: ContentPayload,
{
    let plaintext = open_hex(hex_envelope, recipient, sender_public)?;
    P::from_abi_bytes(&plaintext)
}
