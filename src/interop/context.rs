//! Per-invocation execution context.

use std::collections::HashMap;

use crate::chain::ChainView;
use crate::dao::Dao;
use crate::hash::UInt160;
use crate::interop::Trigger;
use crate::ledger::{Block, Transaction};
use crate::limits::{MAX_TRACEABLE_BLOCKS, STORAGE_PRICE};
use crate::state::NotificationEvent;

/// What carries the script being executed.
#[derive(Debug, Clone)]
pub enum ScriptContainer {
    Transaction(Transaction),
    Block(Block),
}

/// Everything one top-level script invocation may observe or mutate.
///
/// The context owns the DAO overlay for the invocation: persist it on halt,
/// drop the context on fault and every mutation and notification vanishes
/// together.
pub struct Context<'a> {
    pub chain: &'a dyn ChainView,
    pub dao: Dao,
    /// Block being persisted or verified, when there is one.
    pub block: Option<Block>,
    pub trigger: Trigger,
    pub container: Option<ScriptContainer>,
    /// Accumulated notifications, in emission order. Grows monotonically.
    pub notifications: Vec<NotificationEvent>,
    /// Per-target invocation counters for this context.
    pub invocations: HashMap<UInt160, u32>,
    max_traceable_blocks: u32,
    storage_price: i64,
}

impl<'a> Context<'a> {
    pub fn new(chain: &'a dyn ChainView, dao: Dao, trigger: Trigger) -> Self {
        Self {
            chain,
            dao,
            block: None,
            trigger,
            container: None,
            notifications: Vec::new(),
            invocations: HashMap::new(),
            max_traceable_blocks: MAX_TRACEABLE_BLOCKS,
            storage_price: STORAGE_PRICE,
        }
    }

    pub fn max_traceable_blocks(&self) -> u32 {
        self.max_traceable_blocks
    }

    pub fn set_max_traceable_blocks(&mut self, blocks: u32) {
        self.max_traceable_blocks = blocks;
    }

    pub fn storage_price(&self) -> i64 {
        self.storage_price
    }

    pub fn set_storage_price(&mut self, price: i64) {
        self.storage_price = price;
    }

    /// Whether the block at `index` is still addressable from the tip:
    /// `index <= tip && index + max_traceable_blocks > tip`.
    pub fn is_traceable(&self, index: u32) -> bool {
        let height = self.chain.block_height() as u64;
        index as u64 <= height && index as u64 + self.max_traceable_blocks as u64 > height
    }
}
