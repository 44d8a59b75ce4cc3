//! Transactional data-access overlay.
//!
//! A [`Dao`] buffers every write of one invocation above a shared [`Store`].
//! Nothing reaches the backing store until [`Dao::persist`] runs; dropping
//! the overlay discards the whole change set. This is what makes a faulted
//! execution side-effect free.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::hash::{UInt160, UInt256};
use crate::io::{Reader, Writer};
use crate::ledger::{Block, Transaction};
use crate::state::{ContractState, StorageItem};
use crate::storage::Store;

/// First byte of every stored key, one per record family.
#[derive(Debug, Clone, Copy)]
#[repr(u8)]
enum KeyPrefix {
    DataBlock = 0x01,
    DataTransaction = 0x02,
    StContract = 0x50,
    StStorage = 0x70,
    SysNextContractId = 0xC1,
}

pub struct Dao {
    store: Arc<dyn Store>,
    additions: BTreeMap<Vec<u8>, Vec<u8>>,
    deletions: BTreeSet<Vec<u8>>,
}

impl Dao {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            additions: BTreeMap::new(),
            deletions: BTreeSet::new(),
        }
    }

    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        if self.deletions.contains(key) {
            return None;
        }
        if let Some(value) = self.additions.get(key) {
            return Some(value.clone());
        }
        self.store.get(key)
    }

    fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.deletions.remove(&key);
        self.additions.insert(key, value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.additions.remove(key);
        self.deletions.insert(key.to_vec());
    }

    /// Entries under `prefix`, merging the overlay with the backing store.
    fn seek_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.store.seek_prefix(prefix).into_iter().collect();
        for key in &self.deletions {
            if key.starts_with(prefix) {
                merged.remove(key);
            }
        }
        for (key, value) in &self.additions {
            if key.starts_with(prefix) {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged.into_iter().collect()
    }

    /// Flushes the change set to the backing store.
    pub fn persist(&mut self) {
        for key in std::mem::take(&mut self.deletions) {
            self.store.delete(&key);
        }
        for (key, value) in std::mem::take(&mut self.additions) {
            self.store.put(&key, &value);
        }
    }

    // -- blocks and transactions.

    fn executable_key(prefix: KeyPrefix, hash: &UInt256) -> Vec<u8> {
        let mut key = Vec::with_capacity(1 + UInt256::LEN);
        key.push(prefix as u8);
        key.extend_from_slice(&hash.to_le_bytes());
        key
    }

    pub fn store_as_block(&mut self, block: &Block) {
        let mut w = Writer::new();
        block.encode(&mut w);
        self.put(
            Self::executable_key(KeyPrefix::DataBlock, &block.hash()),
            w.into_bytes(),
        );
    }

    pub fn get_block(&self, hash: &UInt256) -> Option<Block> {
        let data = self.get(&Self::executable_key(KeyPrefix::DataBlock, hash))?;
        match Block::decode(&mut Reader::new(&data)) {
            Ok(block) => Some(block),
            Err(err) => {
                tracing::error!(%hash, %err, "stored block failed to decode");
                None
            }
        }
    }

    pub fn store_as_transaction(&mut self, tx: &Transaction, height: u32) {
        let mut w = Writer::new();
        w.write_u32_le(height);
        tx.encode(&mut w);
        self.put(
            Self::executable_key(KeyPrefix::DataTransaction, &tx.hash()),
            w.into_bytes(),
        );
    }

    pub fn get_transaction(&self, hash: &UInt256) -> Option<(Transaction, u32)> {
        let data = self.get(&Self::executable_key(KeyPrefix::DataTransaction, hash))?;
        let mut r = Reader::new(&data);
        let height = r.read_u32_le().ok()?;
        match Transaction::decode(&mut r) {
            Ok(tx) => Some((tx, height)),
            Err(err) => {
                tracing::error!(%hash, %err, "stored transaction failed to decode");
                None
            }
        }
    }

    // -- contracts.

    fn contract_key(hash: &UInt160) -> Vec<u8> {
        let mut key = Vec::with_capacity(1 + UInt160::LEN);
        key.push(KeyPrefix::StContract as u8);
        key.extend_from_slice(&hash.to_le_bytes());
        key
    }

    pub fn get_contract_state(&self, hash: &UInt160) -> Option<ContractState> {
        let data = self.get(&Self::contract_key(hash))?;
        match ContractState::from_bytes(&data) {
            Ok(cs) => Some(cs),
            Err(err) => {
                tracing::error!(%hash, %err, "stored contract failed to decode");
                None
            }
        }
    }

    pub fn put_contract_state(&mut self, cs: &ContractState) {
        self.put(Self::contract_key(&cs.script_hash()), cs.to_bytes());
    }

    pub fn delete_contract_state(&mut self, hash: &UInt160) {
        self.delete(&Self::contract_key(hash));
    }

    /// Allocates a fresh stable contract id, atomically with the overlay.
    pub fn next_contract_id(&mut self) -> i32 {
        let key = vec![KeyPrefix::SysNextContractId as u8];
        let last = self
            .get(&key)
            .and_then(|b| b.try_into().ok())
            .map(i32::from_le_bytes)
            .unwrap_or(0);
        let next = last + 1;
        self.put(key, next.to_le_bytes().to_vec());
        next
    }

    // -- storage items.

    fn storage_key(id: i32, key: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(5 + key.len());
        out.push(KeyPrefix::StStorage as u8);
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(key);
        out
    }

    pub fn get_storage_item(&self, id: i32, key: &[u8]) -> Option<StorageItem> {
        let data = self.get(&Self::storage_key(id, key))?;
        match StorageItem::from_bytes(&data) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::error!(id, %err, "stored item failed to decode");
                None
            }
        }
    }

    pub fn put_storage_item(&mut self, id: i32, key: &[u8], item: &StorageItem) {
        self.put(Self::storage_key(id, key), item.to_bytes());
    }

    /// Removing a missing key is not an error.
    pub fn delete_storage_item(&mut self, id: i32, key: &[u8]) {
        self.delete(&Self::storage_key(id, key));
    }

    /// All storage items in the contract's namespace, keys trimmed of the
    /// record prefix, in ascending key order.
    pub fn storage_items(&self, id: i32) -> Vec<(Vec<u8>, StorageItem)> {
        let prefix = Self::storage_key(id, &[]);
        self.seek_prefix(&prefix)
            .into_iter()
            .filter_map(|(key, value)| {
                let item = StorageItem::from_bytes(&value).ok()?;
                Some((key[prefix.len()..].to_vec(), item))
            })
            .collect()
    }
}
