//! Contract manifests: the declarative document bound to every deployed
//! contract, listing its ABI, feature bits, call permissions, and trusts.
//!
//! The JSON form is canonical: it is what deployment takes as input, what the
//! 4-item contract stack encoding carries, and what the DAO persists.

mod contract_abi;
mod contract_group;
mod contract_permission;
mod wildcard_container;

pub use contract_abi::{ContractAbi, ContractEvent, ContractMethod, ContractParameter};
pub use contract_group::ContractGroup;
pub use contract_permission::{ContractPermission, PermissionDescriptor};
pub use wildcard_container::WildcardContainer;

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::hash::UInt160;
use crate::limits::MAX_MANIFEST_SIZE;

bitflags! {
    /// Feature bits a contract declares at deployment.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ContractFeatures: u8 {
        const NO_PROPERTIES = 0x00;
        /// The contract owns a storage namespace.
        const HAS_STORAGE = 0x01;
        /// The contract can receive asset payments.
        const PAYABLE = 0x04;
    }
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest size {size} exceeds limit {max}")]
    TooLarge { size: usize, max: usize },
    #[error("invalid manifest JSON: {0}")]
    Json(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractManifest {
    pub abi: ContractAbi,
    pub groups: Vec<ContractGroup>,
    #[serde(
        serialize_with = "serialize_features",
        deserialize_with = "deserialize_features"
    )]
    pub features: ContractFeatures,
    pub permissions: Vec<ContractPermission>,
    pub trusts: WildcardContainer<UInt160>,
    #[serde(rename = "safeMethods")]
    pub safe_methods: WildcardContainer<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

impl ContractManifest {
    /// The manifest every contract starts from: no features, one wildcard
    /// permission, nothing trusted.
    pub fn new(hash: UInt160) -> Self {
        Self {
            abi: ContractAbi::new(hash),
            groups: Vec::new(),
            features: ContractFeatures::NO_PROPERTIES,
            permissions: vec![ContractPermission::default_wildcard()],
            trusts: WildcardContainer::list(Vec::new()),
            safe_methods: WildcardContainer::list(Vec::new()),
            extra: None,
        }
    }

    pub fn has_storage(&self) -> bool {
        self.features.contains(ContractFeatures::HAS_STORAGE)
    }

    pub fn is_payable(&self) -> bool {
        self.features.contains(ContractFeatures::PAYABLE)
    }

    /// The manifest is valid for a script iff its ABI hash matches the
    /// script's hash.
    pub fn is_valid(&self, hash: &UInt160) -> bool {
        self.abi.hash == *hash
    }

    /// Whether this (caller) manifest permits calling `method` on the
    /// contract described by `target`.
    pub fn can_call(&self, target: &ContractManifest, method: &str) -> bool {
        self.permissions
            .iter()
            .any(|p| p.is_allowed(target, method))
    }

    /// Canonical JSON bytes.
    pub fn to_json_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("manifest serialization is infallible")
    }

    pub fn from_json_bytes(data: &[u8]) -> Result<Self, ManifestError> {
        if data.len() > MAX_MANIFEST_SIZE {
            return Err(ManifestError::TooLarge {
                size: data.len(),
                max: MAX_MANIFEST_SIZE,
            });
        }
        serde_json::from_slice(data).map_err(|e| ManifestError::Json(e.to_string()))
    }
}

fn serialize_features<S: Serializer>(
    features: &ContractFeatures,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Features {
        storage: bool,
        payable: bool,
    }
    Features {
        storage: features.contains(ContractFeatures::HAS_STORAGE),
        payable: features.contains(ContractFeatures::PAYABLE),
    }
    .serialize(serializer)
}

fn deserialize_features<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<ContractFeatures, D::Error> {
    #[derive(Deserialize)]
    struct Features {
        #[serde(default)]
        storage: bool,
        #[serde(default)]
        payable: bool,
    }
    let f = Features::deserialize(deserializer)?;
    let mut features = ContractFeatures::NO_PROPERTIES;
    if f.storage {
        features |= ContractFeatures::HAS_STORAGE;
    }
    if f.payable {
        features |= ContractFeatures::PAYABLE;
    }
    Ok(features)
}
