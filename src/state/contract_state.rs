//! Deployed contract records.

use std::cell::OnceCell;

use crate::crypto::hash160;
use crate::hash::UInt160;
use crate::io::{IoError, IoResult, Reader, Writer};
use crate::limits::{MAX_CONTRACT_SCRIPT_SIZE, MAX_MANIFEST_SIZE};
use crate::manifest::ContractManifest;
use crate::vm::StackItem;

/// A deployed contract. The stable `id` survives script updates and is what
/// the storage namespace is keyed by; the script hash is derived state.
#[derive(Debug, Clone)]
pub struct ContractState {
    pub id: i32,
    pub script: Vec<u8>,
    pub manifest: ContractManifest,
    /// Derived from `script`, computed on first use. Never persisted and
    /// never mutated independently.
    script_hash: OnceCell<UInt160>,
}

impl ContractState {
    pub fn new(id: i32, script: Vec<u8>, manifest: ContractManifest) -> Self {
        Self {
            id,
            script,
            manifest,
            script_hash: OnceCell::new(),
        }
    }

    /// Hash160 of the script, cached after the first call.
    pub fn script_hash(&self) -> UInt160 {
        *self.script_hash.get_or_init(|| hash160(&self.script))
    }

    pub fn has_storage(&self) -> bool {
        self.manifest.has_storage()
    }

    pub fn is_payable(&self) -> bool {
        self.manifest.is_payable()
    }

    /// The 4-item positional encoding scripts receive:
    /// `[script, manifest JSON, has_storage, is_payable]`.
    pub fn to_stack_item(&self) -> StackItem {
        StackItem::from_array(vec![
            StackItem::from_byte_string(self.script.clone()),
            StackItem::from_byte_string(self.manifest.to_json_bytes()),
            StackItem::from_bool(self.has_storage()),
            StackItem::from_bool(self.is_payable()),
        ])
    }

    pub fn encode(&self, w: &mut Writer) {
        w.write_i32_le(self.id);
        w.write_var_bytes(&self.script);
        w.write_var_bytes(&self.manifest.to_json_bytes());
    }

    pub fn decode(r: &mut Reader<'_>) -> IoResult<Self> {
        let id = r.read_i32_le()?;
        let script = r.read_var_bytes(MAX_CONTRACT_SCRIPT_SIZE)?.to_vec();
        let manifest_bytes = r.read_var_bytes(MAX_MANIFEST_SIZE)?;
        let manifest = ContractManifest::from_json_bytes(manifest_bytes)
            .map_err(|_| IoError::UnexpectedEof(r.position()))?;
        Ok(Self::new(id, script, manifest))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        self.encode(&mut w);
        w.into_bytes()
    }

    pub fn from_bytes(data: &[u8]) -> IoResult<Self> {
        Self::decode(&mut Reader::new(data))
    }
}

impl PartialEq for ContractState {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.script == other.script && self.manifest == other.manifest
    }
}

impl Eq for ContractState {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ContractFeatures;

    fn sample() -> ContractState {
        let script = vec![0x51, 0x66];
        let hash = hash160(&script);
        let mut manifest = ContractManifest::new(hash);
        manifest.features = ContractFeatures::HAS_STORAGE;
        ContractState::new(42, script, manifest)
    }

    #[test]
    fn script_hash_is_pure() {
        let cs = sample();
        assert_eq!(cs.script_hash(), hash160(&cs.script));
        assert_eq!(cs.script_hash(), cs.script_hash());
    }

    #[test]
    fn encode_decode_preserves_identity() {
        let cs = sample();
        let parsed = ContractState::from_bytes(&cs.to_bytes()).unwrap();
        assert_eq!(parsed, cs);
        assert_eq!(parsed.script_hash(), cs.script_hash());
    }

    #[test]
    fn stack_item_shape() {
        let cs = sample();
        let items = cs.to_stack_item().as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].as_bytes().unwrap(), cs.script);
        assert_eq!(items[1].as_bytes().unwrap(), cs.manifest.to_json_bytes());
        assert!(items[2].as_bool().unwrap());
        assert!(!items[3].as_bool().unwrap());
    }
}
