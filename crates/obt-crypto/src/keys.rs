//! Key codec for secp256k1 key pairs in ledger string encodings.
//!
//! Public keys travel as `FIO` + base58(point || ripemd160(point)[..4]) or the
//! typed `PUB_K1_` form, where the checksum also covers the curve tag. Private
//! keys are accepted as WIF, as `PVT_K1_` strings, or as raw 32-byte scalars.
//!
//! Every decoder validates prefix, length, checksum, and curve membership
//! before any point arithmetic happens.

use std::fmt;
use std::str::FromStr;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{FieldBytes, NonZeroScalar};
use rand_core::OsRng;
use zeroize::Zeroizing;

use crate::error::{ObtError, Result};
use crate::hash::{double_sha256_checksum, ripemd160_checksum};

/// Prefix of the legacy public key form used by the ledger's address system.
pub const FIO_PUBLIC_PREFIX: &str = "FIO";
/// Prefix of typed secp256k1 public keys.
pub const K1_PUBLIC_PREFIX: &str = "PUB_K1_";
/// Prefix of typed secp256k1 private keys.
pub const K1_PRIVATE_PREFIX: &str = "PVT_K1_";

const K1_CURVE_TAG: &[u8] = b"K1";
const WIF_VERSION: u8 = 0x80;
const WIF_COMPRESSED_FLAG: u8 = 0x01;
const SCALAR_LEN: usize = 32;
const POINT_LEN: usize = 33;
const CHECKSUM_LEN: usize = 4;

/// A secp256k1 private scalar. Zeroized on drop by the underlying key type.
#[derive(Clone)]
pub struct PrivateKey {
    inner: k256::SecretKey,
}

impl PrivateKey {
    /// Generate a fresh key from the OS random source.
    pub fn generate() -> Self {
        Self {
            inner: k256::SecretKey::random(&mut OsRng),
        }
    }

    /// Import a raw 32-byte big-endian scalar. Rejects zero and values >= n.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SCALAR_LEN {
            return Err(ObtError::KeyFormat(format!(
                "private key must be {SCALAR_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let inner = k256::SecretKey::from_bytes(FieldBytes::from_slice(bytes))
            .map_err(|_| ObtError::KeyFormat("private scalar out of range".into()))?;
        Ok(Self { inner })
    }

    /// Decode a wallet import format string (`5...`, or `K`/`L` compressed form).
    pub fn from_wif(wif: &str) -> Result<Self> {
        let raw = Zeroizing::new(decode_base58(wif)?);
        let body_len = match raw.len() {
            37 => 1 + SCALAR_LEN,
            38 if raw[33] == WIF_COMPRESSED_FLAG => 1 + SCALAR_LEN + 1,
            n => {
                return Err(ObtError::KeyFormat(format!(
                    "WIF payload has unexpected length {n}"
                )))
            }
        };
        if raw[0] != WIF_VERSION {
            return Err(ObtError::KeyFormat(format!(
                "WIF version byte 0x{:02x}, expected 0x80",
                raw[0]
            )));
        }
        let (body, checksum) = raw.split_at(body_len);
        if double_sha256_checksum(body) != checksum {
            return Err(ObtError::KeyFormat("WIF checksum mismatch".into()));
        }
        Self::from_bytes(&body[1..1 + SCALAR_LEN])
    }

    /// Decode a `PVT_K1_` typed private key string.
    pub fn from_k1_string(s: &str) -> Result<Self> {
        let body = s
            .strip_prefix(K1_PRIVATE_PREFIX)
            .ok_or_else(|| ObtError::KeyFormat(format!("missing {K1_PRIVATE_PREFIX} prefix")))?;
        let raw = Zeroizing::new(decode_base58(body)?);
        let scalar = split_checked(&raw, SCALAR_LEN, K1_CURVE_TAG)?;
        Self::from_bytes(scalar)
    }

    /// Raw big-endian scalar bytes. Treat as secret.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        let mut out = Zeroizing::new([0u8; 32]);
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    /// Canonical (uncompressed-flag) WIF encoding.
    pub fn to_wif(&self) -> String {
        let mut raw = Zeroizing::new(Vec::with_capacity(1 + SCALAR_LEN + CHECKSUM_LEN));
        raw.push(WIF_VERSION);
        raw.extend_from_slice(&self.to_bytes()[..]);
        let checksum = double_sha256_checksum(&raw);
        raw.extend_from_slice(&checksum);
        bs58::encode(raw.as_slice()).into_string()
    }

    /// `PVT_K1_` typed encoding.
    pub fn to_k1_string(&self) -> String {
        let scalar = self.to_bytes();
        let mut raw = Zeroizing::new(Vec::with_capacity(SCALAR_LEN + CHECKSUM_LEN));
        raw.extend_from_slice(&scalar[..]);
        raw.extend_from_slice(&ripemd160_checksum(&scalar[..], K1_CURVE_TAG));
        format!("{K1_PRIVATE_PREFIX}{}", bs58::encode(raw.as_slice()).into_string())
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: self.inner.public_key(),
        }
    }

    pub(crate) fn scalar(&self) -> NonZeroScalar {
        self.inner.to_nonzero_scalar()
    }
}

impl FromStr for PrivateKey {
    type Err = ObtError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with(K1_PRIVATE_PREFIX) {
            Self::from_k1_string(s)
        } else {
            Self::from_wif(s)
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// A secp256k1 public point, guaranteed on-curve and not the identity.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: k256::PublicKey,
}

impl PublicKey {
    /// Parse a SEC1 compressed point (33 bytes).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != POINT_LEN {
            return Err(ObtError::KeyFormat(format!(
                "compressed point must be {POINT_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let inner = k256::PublicKey::from_sec1_bytes(bytes)
            .map_err(|_| ObtError::KeyFormat("point is not on secp256k1".into()))?;
        Ok(Self { inner })
    }

    /// Decode a public key string in either `FIO...` or `PUB_K1_...` form.
    pub fn decode(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(body) = s.strip_prefix(K1_PUBLIC_PREFIX) {
            let raw = decode_base58(body)?;
            Self::from_sec1_bytes(split_checked(&raw, POINT_LEN, K1_CURVE_TAG)?)
        } else if let Some(body) = s.strip_prefix(FIO_PUBLIC_PREFIX) {
            let raw = decode_base58(body)?;
            Self::from_sec1_bytes(split_checked(&raw, POINT_LEN, b"")?)
        } else if s.starts_with("PUB_") {
            Err(ObtError::KeyFormat(format!(
                "unsupported curve in public key prefix: {}",
                s.split('_').nth(1).unwrap_or_default()
            )))
        } else {
            Err(ObtError::KeyFormat(format!(
                "public key must start with {FIO_PUBLIC_PREFIX} or {K1_PUBLIC_PREFIX}"
            )))
        }
    }

    /// 33-byte SEC1 compressed encoding.
    pub fn to_sec1_bytes(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        out.copy_from_slice(self.inner.to_encoded_point(true).as_bytes());
        out
    }

    /// Legacy `FIO` string form, the one stored against ledger accounts.
    pub fn to_fio_string(&self) -> String {
        let point = self.to_sec1_bytes();
        format!("{FIO_PUBLIC_PREFIX}{}", encode_checked(&point, b""))
    }

    /// `PUB_K1_` typed string form.
    pub fn to_k1_string(&self) -> String {
        let point = self.to_sec1_bytes();
        format!("{K1_PUBLIC_PREFIX}{}", encode_checked(&point, K1_CURVE_TAG))
    }

    pub(crate) fn as_affine(&self) -> &k256::AffinePoint {
        self.inner.as_affine()
    }
}

impl FromStr for PublicKey {
    type Err = ObtError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fio_string())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_fio_string())
    }
}

/// A private key together with its public key.
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub private: PrivateKey,
    pub public: PublicKey,
}

impl KeyPair {
    pub fn generate() -> Self {
        Self::from_private(PrivateKey::generate())
    }

    pub fn from_private(private: PrivateKey) -> Self {
        let public = private.public_key();
        Self { private, public }
    }
}

/// Decode a private key string (WIF or `PVT_K1_`).
pub fn decode_private(s: &str) -> Result<PrivateKey> {
    s.parse()
}

/// Decode a public key string (`FIO` or `PUB_K1_`).
pub fn decode_public(s: &str) -> Result<PublicKey> {
    PublicKey::decode(s)
}

fn decode_base58(s: &str) -> Result<Vec<u8>> {
    bs58::decode(s)
        .into_vec()
        .map_err(|e| ObtError::KeyFormat(format!("invalid base58: {e}")))
}

fn encode_checked(payload: &[u8], suffix: &[u8]) -> String {
    let mut raw = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    raw.extend_from_slice(payload);
    raw.extend_from_slice(&ripemd160_checksum(payload, suffix));
    bs58::encode(raw).into_string()
}

/// Split `payload || checksum`, verify the ripemd160 checksum, return the payload.
fn split_checked<'a>(raw: &'a [u8], payload_len: usize, suffix: &[u8]) -> Result<&'a [u8]> {
    if raw.len() != payload_len + CHECKSUM_LEN {
        return Err(ObtError::KeyFormat(format!(
            "decoded key is {} bytes, expected {}",
            raw.len(),
            payload_len + CHECKSUM_LEN
        )));
    }
    let (payload, checksum) = raw.split_at(payload_len);
    if ripemd160_checksum(payload, suffix) != checksum {
        return Err(ObtError::KeyFormat("key checksum mismatch".into()));
    }
    Ok(payload)
}
