//! Protocol constants shared by all nodes.
//!
//! These values are consensus-relevant: every node must apply the same bounds
//! or executions diverge.

/// Maximum length of a key for contract storage items.
pub const MAX_STORAGE_KEY_LEN: usize = 1024;

/// Default number of blocks before the current chain height we are able to
/// give information about. Overridable per execution context via protocol
/// configuration.
pub const MAX_TRACEABLE_BLOCKS: u32 = 200_000;

/// GAS charged per byte of storage growth.
pub const STORAGE_PRICE: i64 = 100_000;

/// Maximum size of a contract script accepted by deployment and the loader.
pub const MAX_CONTRACT_SCRIPT_SIZE: usize = 1 << 20;

/// Maximum size of a serialized contract manifest.
pub const MAX_MANIFEST_SIZE: usize = u16::MAX as usize;

/// Maximum number of items a canonically serialized stack item may contain.
pub const MAX_SERIALIZED_ITEMS: usize = 2048;

/// Maximum byte size of a single serialized stack item.
pub const MAX_ITEM_SIZE: usize = 1024 * 1024;

/// Maximum nesting depth the canonical stack-item codec accepts.
pub const MAX_SERIALIZATION_DEPTH: usize = 10;
