//! Permissions a contract declares for the contracts it may call.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::hash::UInt160;
use crate::manifest::{ContractManifest, WildcardContainer};

/// Which callees a permission entry covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionDescriptor {
    /// Any contract.
    Wildcard,
    /// A specific contract hash.
    Hash(UInt160),
    /// Any contract belonging to the group with this public key.
    Group(Vec<u8>),
}

impl PermissionDescriptor {
    fn matches(&self, target: &ContractManifest) -> bool {
        match self {
            PermissionDescriptor::Wildcard => true,
            PermissionDescriptor::Hash(hash) => *hash == target.abi.hash,
            PermissionDescriptor::Group(key) => {
                target.groups.iter().any(|g| g.public_key == *key)
            }
        }
    }
}

impl Serialize for PermissionDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PermissionDescriptor::Wildcard => serializer.serialize_str("*"),
            PermissionDescriptor::Hash(hash) => serializer.serialize_str(&hash.to_string()),
            PermissionDescriptor::Group(key) => serializer.serialize_str(&hex::encode(key)),
        }
    }
}

impl<'de> Deserialize<'de> for PermissionDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "*" => Ok(PermissionDescriptor::Wildcard),
            hash if hash.starts_with("0x") => UInt160::from_hex(hash)
                .map(PermissionDescriptor::Hash)
                .map_err(de::Error::custom),
            key if key.len() == 66 => hex::decode(key)
                .map(PermissionDescriptor::Group)
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "permission descriptor must be \"*\", a contract hash, or a group key, got {other:?}"
            ))),
        }
    }
}

/// One entry of the caller's call ACL: a callee descriptor plus the method
/// set allowed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractPermission {
    pub contract: PermissionDescriptor,
    pub methods: WildcardContainer<String>,
}

impl ContractPermission {
    /// The unrestricted permission every fresh manifest starts with.
    pub fn default_wildcard() -> Self {
        Self {
            contract: PermissionDescriptor::Wildcard,
            methods: WildcardContainer::wildcard(),
        }
    }

    /// Whether this entry allows calling `method` on the contract described
    /// by `target`.
    pub fn is_allowed(&self, target: &ContractManifest, method: &str) -> bool {
        self.contract.matches(target) && self.methods.contains(&method.to_string())
    }
}
