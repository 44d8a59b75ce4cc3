//! Ledger records addressed by the interop layer.

mod block;
mod transaction;

pub use block::{Block, Header};
pub use transaction::Transaction;
