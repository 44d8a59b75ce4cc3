//! Interop primitives and their dispatch.
//!
//! Handlers are plain functions over `(&mut Context, &mut Vm)`. The VM never
//! calls them directly: [`execute`] drives the instruction loop and routes
//! every SYSCALL through [`dispatch`], which resolves the descriptor, checks
//! the frame's call flags, charges the fixed price, and finally runs the
//! handler. Any handler failure faults the VM; the caller is expected to drop
//! the [`Context`] (and with it the DAO overlay and notifications) on fault
//! and persist it on halt.

pub mod blockchain;
pub mod contract;
pub mod context;
pub mod iterator;
pub mod registry;
pub mod runtime;
pub mod storage;
pub mod trigger;

pub use context::{Context, ScriptContainer};
pub use registry::{syscall_id, InteropDescriptor, InteropHandler, InteropRegistry};
pub use storage::StorageContext;
pub use trigger::Trigger;

use crate::vm::{Vm, VmError, VmResult};

/// Resolves and runs one syscall against the current frame.
pub fn dispatch(
    registry: &InteropRegistry,
    ctx: &mut Context<'_>,
    vm: &mut Vm,
    id: u32,
) -> VmResult<()> {
    let descriptor = *registry.get(id).ok_or(VmError::UnknownSyscall { id })?;
    if !vm
        .current_call_flags()
        .contains(descriptor.required_call_flags)
    {
        return Err(VmError::MissingCallFlags(descriptor.required_call_flags));
    }
    if descriptor.price > 0 && !vm.add_gas(descriptor.price) {
        return Err(VmError::GasExhausted);
    }
    (descriptor.handler)(ctx, vm).map_err(|err| VmError::InteropService {
        service: descriptor.name.to_string(),
        error: err.to_string(),
    })
}

/// Runs the loaded scripts to completion, dispatching syscalls through the
/// registry. On error the engine is left faulted and the context must be
/// discarded.
pub fn execute(
    registry: &InteropRegistry,
    ctx: &mut Context<'_>,
    vm: &mut Vm,
) -> VmResult<()> {
    vm.run(|vm, id| dispatch(registry, ctx, vm, id))
}
