//! Contract groups: a group is identified by a public key and membership is
//! attested by a signature over the contract hash.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractGroup {
    /// Compressed secp256r1 public key, hex-encoded in JSON.
    #[serde(
        rename = "pubKey",
        serialize_with = "hex_bytes::serialize",
        deserialize_with = "hex_bytes::deserialize"
    )]
    pub public_key: Vec<u8>,
    /// Signature of the contract hash by the group key.
    #[serde(
        serialize_with = "hex_bytes::serialize",
        deserialize_with = "hex_bytes::deserialize"
    )]
    pub signature: Vec<u8>,
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let group = ContractGroup {
            public_key: vec![0x02; 33],
            signature: vec![0xAB; 64],
        };
        let json = serde_json::to_string(&group).unwrap();
        let parsed: ContractGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, group);
    }
}
