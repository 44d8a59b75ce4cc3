//! Hash primitives and secp256r1 public-key validation.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::hash::{UInt160, UInt256};

/// Length of a compressed secp256r1 public key.
pub const COMPRESSED_KEY_LEN: usize = 33;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Double SHA-256, the digest used for block and transaction hashes.
pub fn hash256(data: &[u8]) -> UInt256 {
    UInt256::from_le(sha256(&sha256(data)))
}

/// RIPEMD-160 over SHA-256, the digest used for script hashes.
pub fn hash160(data: &[u8]) -> UInt160 {
    let sha = sha256(data);
    let ripe: [u8; 20] = Ripemd160::digest(sha).into();
    UInt160::from_le(ripe)
}

/// Checks that `data` is a valid compressed secp256r1 point and returns its
/// canonical 33-byte encoding.
pub fn validate_public_key(data: &[u8]) -> Result<[u8; COMPRESSED_KEY_LEN], CryptoError> {
    if data.len() != COMPRESSED_KEY_LEN {
        return Err(CryptoError::InvalidPublicKey(format!(
            "expected {} bytes, got {}",
            COMPRESSED_KEY_LEN,
            data.len()
        )));
    }
    p256::PublicKey::from_sec1_bytes(data)
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
    Ok(data.try_into().expect("length checked above"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // secp256r1 generator point, compressed.
    const GENERATOR: &str = "036b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296";

    #[test]
    fn hash160_is_deterministic() {
        let a = hash160(b"neo");
        let b = hash160(b"neo");
        assert_eq!(a, b);
        assert_ne!(a, hash160(b"gas"));
    }

    #[test]
    fn accepts_valid_compressed_key() {
        let key = hex::decode(GENERATOR).unwrap();
        assert!(validate_public_key(&key).is_ok());
    }

    #[test]
    fn rejects_malformed_key() {
        assert!(validate_public_key(&[1, 2, 3]).is_err());
        assert!(validate_public_key(&[0xFFu8; 33]).is_err());
    }
}
