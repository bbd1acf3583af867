use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

pub fn sha512(data: &[u8]) -> [u8; 64] {
    let out = Sha512::digest(data);
    let mut arr = [0u8; 64];
    arr.copy_from_slice(&out);
    arr
}

/// Bitcoin-style WIF checksum: first 4 bytes of sha256(sha256(data)).
pub fn double_sha256_checksum(data: &[u8]) -> [u8; 4] {
    let h = sha256(&sha256(data));
    [h[0], h[1], h[2], h[3]]
}

/// Key-string checksum: first 4 bytes of ripemd160(data || suffix).
/// Legacy `FIO` public keys use an empty suffix, typed keys use the curve tag ("K1").
pub fn ripemd160_checksum(data: &[u8], suffix: &[u8]) -> [u8; 4] {
    let mut h = Ripemd160::new();
    h.update(data);
    h.update(suffix);
    let out = h.finalize();
    [out[0], out[1], out[2], out[3]]
}
