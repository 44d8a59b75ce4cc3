//! Shared fixtures: an in-memory chain and context/contract builders.

use std::sync::Arc;

use neo_interop::chain::ChainView;
use neo_interop::crypto::hash160;
use neo_interop::dao::Dao;
use neo_interop::hash::{UInt160, UInt256};
use neo_interop::interop::{Context, Trigger};
use neo_interop::ledger::{Block, Header, Transaction};
use neo_interop::manifest::{ContractFeatures, ContractManifest};
use neo_interop::state::ContractState;
use neo_interop::storage::MemoryStore;

/// secp256r1 generator point, compressed.
pub const GENERATOR_KEY: &str =
    "036b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296";

/// A chain of in-memory blocks; index equals height.
pub struct TestChain {
    blocks: Vec<Block>,
}

impl TestChain {
    /// A chain holding only the genesis block.
    pub fn new() -> Self {
        let genesis = Block {
            header: Header {
                version: 0,
                prev_hash: UInt256::zero(),
                merkle_root: UInt256::zero(),
                timestamp: 1000,
                index: 0,
                next_consensus: UInt160::from_be_bytes(&[0xCC; 20]).unwrap(),
            },
            transactions: Vec::new(),
        };
        Self {
            blocks: vec![genesis],
        }
    }

    /// The block that would extend the chain, carrying `transactions`.
    pub fn new_block(&self, transactions: Vec<Transaction>) -> Block {
        let last = self.blocks.last().unwrap();
        Block {
            header: Header {
                version: 0,
                prev_hash: last.hash(),
                merkle_root: UInt256::zero(),
                timestamp: last.header.timestamp + 1000,
                index: last.header.index + 1,
                next_consensus: last.header.next_consensus,
            },
            transactions,
        }
    }

    pub fn add_block(&mut self, transactions: Vec<Transaction>) -> Block {
        let block = self.new_block(transactions);
        self.blocks.push(block.clone());
        block
    }

    pub fn tip(&self) -> &Block {
        self.blocks.last().unwrap()
    }
}

impl ChainView for TestChain {
    fn block_height(&self) -> u32 {
        self.blocks.last().unwrap().index()
    }

    fn current_block_hash(&self) -> UInt256 {
        self.blocks.last().unwrap().hash()
    }

    fn header_hash(&self, index: u32) -> Option<UInt256> {
        self.blocks.get(index as usize).map(Block::hash)
    }

    fn get_header(&self, hash: &UInt256) -> Option<Header> {
        self.blocks
            .iter()
            .find(|b| b.hash() == *hash)
            .map(|b| b.header.clone())
    }

    fn get_block(&self, hash: &UInt256) -> Option<Block> {
        self.blocks.iter().find(|b| b.hash() == *hash).cloned()
    }
}

pub fn new_context(chain: &TestChain) -> Context<'_> {
    Context::new(
        chain,
        Dao::new(Arc::new(MemoryStore::new())),
        Trigger::Application,
    )
}

/// A transaction with a distinctive script and fees.
pub fn sample_transaction() -> Transaction {
    Transaction {
        version: 0,
        nonce: 0x0BADC0DE,
        sender: UInt160::from_be_bytes(&[0xAA; 20]).unwrap(),
        system_fee: 100,
        network_fee: 7,
        valid_until_block: 1_000,
        script: vec![0x61, 0x66],
    }
}

/// A deployable contract over `script`: manifest bound to the script hash,
/// with the given feature bits.
pub fn contract_with_features(id: i32, script: Vec<u8>, features: ContractFeatures) -> ContractState {
    let mut manifest = ContractManifest::new(hash160(&script));
    manifest.features = features;
    ContractState::new(id, script, manifest)
}

pub fn storage_contract(id: i32, script: Vec<u8>) -> ContractState {
    contract_with_features(id, script, ContractFeatures::HAS_STORAGE)
}
