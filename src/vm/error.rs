//! Error types for the VM substrate.

use thiserror::Error;

use crate::vm::CallFlags;

/// Faults raised by the evaluation stack, the instruction loop, or syscall
/// dispatch. Any of these moves the engine into the faulted state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("evaluation stack underflow")]
    StackUnderflow,

    #[error("invalid opcode 0x{0:02x}")]
    InvalidOpcode(u8),

    #[error("cannot convert {from} to {to}")]
    InvalidConversion {
        from: &'static str,
        to: &'static str,
    },

    #[error("script size {size} exceeds limit {max}")]
    ScriptTooLarge { size: usize, max: usize },

    #[error("truncated instruction operand at offset {0}")]
    TruncatedOperand(usize),

    #[error("gas limit exceeded")]
    GasExhausted,

    #[error("no execution context loaded")]
    NoContext,

    #[error("invocation stack has no frame {0}")]
    BadFrame(usize),

    #[error("number out of range")]
    IntegerOverflow,

    #[error("missing required call flags {0:?}")]
    MissingCallFlags(CallFlags),

    #[error("syscall 0x{id:08x} is not registered")]
    UnknownSyscall { id: u32 },

    #[error("interop service error: {service}: {error}")]
    InteropService { service: String, error: String },

    #[error("opcode 0x{0:02x} is a verification template terminator and cannot execute")]
    NotExecutable(u8),
}

pub type VmResult<T> = Result<T, VmError>;
