//! Resolve the local private key from config, flags, or environment.

use std::path::Path;

use anyhow::{bail, Context};
use obt_crypto::PrivateKey;
use zeroize::Zeroizing;

use crate::config::IdentityConfig;

/// Load the private key named by `identity`.
///
/// Overrides from `--key`, `--key-file` and `OBT_PRIVATE_KEY` are already
/// folded into `identity` by [`crate::Config::with_overrides`].
pub fn load_private_key(identity: &IdentityConfig) -> anyhow::Result<PrivateKey> {
    if let Some(key) = &identity.private_key {
        return key.parse().context("parsing configured private key");
    }
    if let Some(path) = &identity.key_file {
        return read_key_file(path);
    }
    bail!("no private key configured: pass --key, set OBT_PRIVATE_KEY, or set identity.key_file")
}

/// Read a key file holding a single WIF or `PVT_K1_` string.
pub fn read_key_file(path: &Path) -> anyhow::Result<PrivateKey> {
    let contents = Zeroizing::new(
        std::fs::read_to_string(path)
            .with_context(|| format!("reading key file {}", path.display()))?,
    );
    contents
        .trim()
        .parse()
        .with_context(|| format!("parsing private key from {}", path.display()))
}
