//! Fault taxonomy of the interop layer.
//!
//! Every variant here faults the VM. Absence is deliberately *not* an error:
//! missing blocks, transactions, contracts, and storage items surface to
//! scripts as Null or `-1` sentinels so that state can be probed defensively.

use thiserror::Error;

use crate::vm::VmError;

#[derive(Debug, Error)]
pub enum InteropError {
    /// Malformed bytes where a hash, number, or public key was expected.
    #[error("argument decoding failed: {0}")]
    Decode(String),

    /// Index or size outside protocol bounds.
    #[error("argument out of bounds: {0}")]
    Bounds(String),

    /// Operation forbidden for the current caller or handle.
    #[error("permission denied: {0}")]
    Permission(String),

    /// State transition that would break ledger consistency.
    #[error("consistency violation: {0}")]
    Consistency(String),

    /// A call target that must exist did not.
    #[error("contract not found")]
    ContractNotFound,

    /// Gas budget exhausted; the metered effect was not applied.
    #[error("gas limit exceeded")]
    GasExceeded,

    #[error(transparent)]
    Vm(#[from] VmError),
}

impl InteropError {
    pub fn decode<S: Into<String>>(message: S) -> Self {
        InteropError::Decode(message.into())
    }

    pub fn bounds<S: Into<String>>(message: S) -> Self {
        InteropError::Bounds(message.into())
    }

    pub fn permission<S: Into<String>>(message: S) -> Self {
        InteropError::Permission(message.into())
    }

    pub fn consistency<S: Into<String>>(message: S) -> Self {
        InteropError::Consistency(message.into())
    }
}

pub type InteropResult<T> = Result<T, InteropError>;
