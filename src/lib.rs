//! Interop service layer for a NEO-compatible full node.
//!
//! Smart-contract bytecode running inside the NeoVM reaches the node through
//! syscalls. This crate implements the host side of that boundary: ledger
//! lookups bounded by the traceability window, contract-owned storage with gas
//! metering and constant-item protection, contract deployment and
//! manifest-checked cross-contract dispatch, and the runtime services
//! (notifications, logs, time, invocation counters).
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      script bytecode                       │
//! │                    (SYSCALL <id> ...)                      │
//! └──────────────────────────┬─────────────────────────────────┘
//!                            │ evaluation stack
//! ┌──────────────────────────▼─────────────────────────────────┐
//! │  InteropRegistry: id → (handler, price, required flags)    │
//! │  ┌────────────┐ ┌─────────┐ ┌──────────┐ ┌──────────────┐  │
//! │  │ Blockchain │ │ Storage │ │ Contract │ │   Runtime    │  │
//! │  └────────────┘ └─────────┘ └──────────┘ └──────────────┘  │
//! └──────────────────────────┬─────────────────────────────────┘
//!                            │ Context (one per invocation)
//! ┌──────────────────────────▼─────────────────────────────────┐
//! │   ChainView (read-only)  +  Dao (transactional overlay)    │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers never mutate the ledger directly: every write goes through the
//! [`dao::Dao`] overlay owned by the invocation's [`interop::Context`], which
//! is persisted on halt and dropped on fault.

pub mod chain;
pub mod crypto;
pub mod dao;
pub mod error;
pub mod hash;
pub mod interop;
pub mod io;
pub mod ledger;
pub mod limits;
pub mod manifest;
pub mod state;
pub mod storage;
pub mod vm;

pub use crate::error::InteropError;
pub use crate::hash::{UInt160, UInt256};
pub use crate::interop::{Context, InteropRegistry, Trigger};
pub use crate::vm::{CallFlags, StackItem, Vm, VmError};
