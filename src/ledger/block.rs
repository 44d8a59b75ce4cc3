//! Blocks and headers.

use crate::crypto::hash256;
use crate::hash::{UInt160, UInt256};
use crate::io::{IoResult, Reader, Writer};
use crate::ledger::Transaction;

/// Maximum transactions decoded from a single stored block.
const MAX_TRANSACTIONS_PER_BLOCK: u64 = u16::MAX as u64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub version: u32,
    pub prev_hash: UInt256,
    pub merkle_root: UInt256,
    pub timestamp: u64,
    pub index: u32,
    pub next_consensus: UInt160,
}

impl Header {
    /// Double SHA-256 over the deterministic header encoding.
    pub fn hash(&self) -> UInt256 {
        let mut w = Writer::new();
        self.encode(&mut w);
        hash256(w.bytes())
    }

    pub fn encode(&self, w: &mut Writer) {
        w.write_u32_le(self.version);
        w.write_bytes(&self.prev_hash.to_le_bytes());
        w.write_bytes(&self.merkle_root.to_le_bytes());
        w.write_u64_le(self.timestamp);
        w.write_u32_le(self.index);
        w.write_bytes(&self.next_consensus.to_le_bytes());
    }

    pub fn decode(r: &mut Reader<'_>) -> IoResult<Self> {
        Ok(Self {
            version: r.read_u32_le()?,
            prev_hash: UInt256::from_le(r.read_bytes(UInt256::LEN)?.try_into().unwrap()),
            merkle_root: UInt256::from_le(r.read_bytes(UInt256::LEN)?.try_into().unwrap()),
            timestamp: r.read_u64_le()?,
            index: r.read_u32_le()?,
            next_consensus: UInt160::from_le(r.read_bytes(UInt160::LEN)?.try_into().unwrap()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub header: Header,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn hash(&self) -> UInt256 {
        self.header.hash()
    }

    pub fn index(&self) -> u32 {
        self.header.index
    }

    pub fn encode(&self, w: &mut Writer) {
        self.header.encode(w);
        w.write_var_int(self.transactions.len() as u64);
        for tx in &self.transactions {
            tx.encode(w);
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> IoResult<Self> {
        let header = Header::decode(r)?;
        let count = r.read_var_int(MAX_TRANSACTIONS_PER_BLOCK)? as usize;
        let mut transactions = Vec::with_capacity(count);
        for _ in 0..count {
            transactions.push(Transaction::decode(r)?);
        }
        Ok(Self {
            header,
            transactions,
        })
    }
}
