//! Read-only view of the chain consumed by interop handlers.

use crate::hash::UInt256;
use crate::ledger::{Block, Header};

/// What the interop layer needs to know about the chain. The node's
/// blockchain service implements this; handlers never write through it.
pub trait ChainView {
    /// Index of the current tip.
    fn block_height(&self) -> u32;

    /// Hash of the current tip.
    fn current_block_hash(&self) -> UInt256;

    /// Hash of the header at `index`, if one exists.
    fn header_hash(&self, index: u32) -> Option<UInt256>;

    fn get_header(&self, hash: &UInt256) -> Option<Header>;

    fn get_block(&self, hash: &UInt256) -> Option<Block>;
}
