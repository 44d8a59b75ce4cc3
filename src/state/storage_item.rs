//! A single contract-owned storage entry.

use crate::io::{IoResult, Reader, Writer};
use crate::limits::MAX_ITEM_SIZE;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageItem {
    pub value: Vec<u8>,
    /// Once set, the value can never change and the item cannot be deleted.
    pub is_const: bool,
}

impl StorageItem {
    pub fn new(value: Vec<u8>) -> Self {
        Self {
            value,
            is_const: false,
        }
    }

    pub fn encode(&self, w: &mut Writer) {
        w.write_bool(self.is_const);
        w.write_var_bytes(&self.value);
    }

    pub fn decode(r: &mut Reader<'_>) -> IoResult<Self> {
        Ok(Self {
            is_const: r.read_bool()?,
            value: r.read_var_bytes(MAX_ITEM_SIZE)?.to_vec(),
        })
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_keeps_const_flag() {
        let item = StorageItem {
            value: vec![1, 2, 3],
            is_const: true,
        };
        let parsed = StorageItem::from_bytes(&item.to_bytes()).unwrap();
        assert_eq!(parsed, item);
    }
}
