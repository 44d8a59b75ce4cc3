//! Transactions as seen by scripts: the fee, validity, and script fields the
//! marshalling layer exposes.

use crate::crypto::hash256;
use crate::hash::{UInt160, UInt256};
use crate::io::{IoResult, Reader, Writer};
use crate::limits::MAX_CONTRACT_SCRIPT_SIZE;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub version: u8,
    pub nonce: u32,
    pub sender: UInt160,
    pub system_fee: i64,
    pub network_fee: i64,
    pub valid_until_block: u32,
    pub script: Vec<u8>,
}

impl Transaction {
    /// Double SHA-256 over the deterministic encoding.
    pub fn hash(&self) -> UInt256 {
        let mut w = Writer::new();
        self.encode(&mut w);
        hash256(w.bytes())
    }

    pub fn encode(&self, w: &mut Writer) {
        w.write_u8(self.version);
        w.write_u32_le(self.nonce);
        w.write_bytes(&self.sender.to_le_bytes());
        w.write_i64_le(self.system_fee);
        w.write_i64_le(self.network_fee);
        w.write_u32_le(self.valid_until_block);
        w.write_var_bytes(&self.script);
    }

    pub fn decode(r: &mut Reader<'_>) -> IoResult<Self> {
        Ok(Self {
            version: r.read_u8()?,
            nonce: r.read_u32_le()?,
            sender: UInt160::from_le(r.read_bytes(UInt160::LEN)?.try_into().unwrap()),
            system_fee: r.read_i64_le()?,
            network_fee: r.read_i64_le()?,
            valid_until_block: r.read_u32_le()?,
            script: r.read_var_bytes(MAX_CONTRACT_SCRIPT_SIZE)?.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let tx = Transaction {
            version: 0,
            nonce: 0xDEADBEEF,
            sender: UInt160::from_be_bytes(&[3u8; 20]).unwrap(),
            system_fee: 42,
            network_fee: 7,
            valid_until_block: 1000,
            script: vec![0x51, 0x52, 0x93],
        };
        let mut w = Writer::new();
        tx.encode(&mut w);
        let bytes = w.into_bytes();
        let decoded = Transaction::decode(&mut Reader::new(&bytes)).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.hash(), tx.hash());
    }

    #[test]
    fn hash_depends_on_script() {
        let mut tx = Transaction::default();
        let h1 = tx.hash();
        tx.script = vec![1];
        assert_ne!(tx.hash(), h1);
    }
}
