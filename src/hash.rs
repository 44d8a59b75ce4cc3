//! Fixed-size digests used to address contracts and ledger records.
//!
//! Bytes are stored little-endian internally; the wire and stack-item form is
//! big-endian, matching how hashes are displayed.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HashError {
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

macro_rules! impl_digest {
    ($name:ident, $size:expr) => {
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; $size]);

        impl $name {
            pub const LEN: usize = $size;

            pub fn zero() -> Self {
                Self([0u8; $size])
            }

            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }

            /// Wraps raw little-endian bytes.
            pub fn from_le(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }

            pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, HashError> {
                let arr: [u8; $size] =
                    bytes.try_into().map_err(|_| HashError::InvalidLength {
                        expected: $size,
                        actual: bytes.len(),
                    })?;
                let mut le = arr;
                le.reverse();
                Ok(Self(le))
            }

            pub fn to_le_bytes(&self) -> [u8; $size] {
                self.0
            }

            pub fn to_be_bytes(&self) -> [u8; $size] {
                let mut b = self.0;
                b.reverse();
                b
            }

            pub fn from_hex(s: &str) -> Result<Self, HashError> {
                let s = s.strip_prefix("0x").unwrap_or(s);
                let bytes = hex::decode(s).map_err(|e| HashError::InvalidHex(e.to_string()))?;
                Self::from_be_bytes(&bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.to_be_bytes()))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_digest!(UInt160, 20);
impl_digest!(UInt256, 32);
