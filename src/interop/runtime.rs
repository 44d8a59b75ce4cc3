//! Runtime services: platform identity, triggers, time, notifications, logs,
//! counters, and script-hash introspection.

use crate::error::{InteropError, InteropResult};
use crate::hash::UInt160;
use crate::interop::{Context, ScriptContainer};
use crate::state::NotificationEvent;
use crate::vm::serializer;
use crate::vm::{StackItem, Vm, VmError};

/// `System.Runtime.Platform`.
pub fn platform(_ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    vm.estack().push(StackItem::from_byte_string(b"NEO".to_vec()));
    Ok(())
}

/// `System.Runtime.GetTrigger`.
pub fn get_trigger(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    vm.estack().push(StackItem::from_int(ctx.trigger.as_byte()));
    Ok(())
}

/// `System.Runtime.GetScriptContainer`.
pub fn get_script_container(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    match &ctx.container {
        Some(ScriptContainer::Transaction(tx)) => {
            vm.estack().push(StackItem::from_interface(tx.clone()));
        }
        Some(ScriptContainer::Block(block)) => {
            vm.estack().push(StackItem::from_interface(block.clone()));
        }
        None => vm.estack().push(StackItem::null()),
    }
    Ok(())
}

/// `System.Runtime.GetExecutingScriptHash`.
pub fn get_executing_script_hash(_ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    push_context_hash(vm, 0)
}

/// `System.Runtime.GetCallingScriptHash`.
pub fn get_calling_script_hash(_ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    push_context_hash(vm, 1)
}

/// `System.Runtime.GetEntryScriptHash`.
pub fn get_entry_script_hash(_ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let entry = vm
        .istack_len()
        .checked_sub(1)
        .ok_or(VmError::NoContext)?;
    push_context_hash(vm, entry)
}

fn push_context_hash(vm: &mut Vm, pos: usize) -> InteropResult<()> {
    let hash = vm.context_script_hash(pos)?;
    vm.estack()
        .push(StackItem::from_byte_string(hash.to_be_bytes().to_vec()));
    Ok(())
}

/// `System.Runtime.GetTime`: the attached block's timestamp, or the chain
/// head's when the context carries no block.
pub fn get_time(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let timestamp = match &ctx.block {
        Some(block) => block.header.timestamp,
        None => {
            let head = ctx.chain.current_block_hash();
            ctx.chain
                .get_header(&head)
                .ok_or_else(|| InteropError::consistency("no header for the current block"))?
                .timestamp
        }
    };
    vm.estack().push(StackItem::from_int(timestamp));
    Ok(())
}

/// `System.Runtime.Notify`.
///
/// The payload has to be serializable, otherwise it is either recursive or
/// carries interop items unusable outside the VM. Such payloads are replaced
/// with a diagnostic byte string instead of faulting the transaction; the
/// substitution is consensus-observable and kept for mainnet compatibility.
pub fn notify(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let item = vm.estack().pop()?;
    let item = match serializer::serialize(&item) {
        Ok(_) => item,
        Err(err) => {
            StackItem::from_byte_string(format!("bad notification: {err}").into_bytes())
        }
    };
    let script_hash = vm.current_script_hash().ok_or(VmError::NoContext)?;
    ctx.notifications.push(NotificationEvent {
        script_hash,
        name: String::new(),
        item,
    });
    Ok(())
}

/// `System.Runtime.Log`: a structured node-side log record; never fails.
pub fn log(_ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let message = vm.estack().pop()?.as_bytes().unwrap_or_default();
    let script = vm.current_script_hash().unwrap_or_default();
    tracing::info!(
        script = %script,
        message = %String::from_utf8_lossy(&message),
        "runtime log"
    );
    Ok(())
}

/// `System.Runtime.GetNotifications`: accumulated events in emission order,
/// optionally filtered by a 20-byte emitter hash. A Null filter means all.
pub fn get_notifications(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let filter_item = vm.estack().pop()?;
    let filter = if filter_item.is_null() {
        None
    } else {
        let bytes = filter_item.as_bytes()?;
        Some(UInt160::from_be_bytes(&bytes).map_err(|e| InteropError::decode(e.to_string()))?)
    };
    let events: Vec<StackItem> = ctx
        .notifications
        .iter()
        .filter(|event| filter.map_or(true, |hash| event.script_hash == hash))
        .map(NotificationEvent::to_stack_item)
        .collect();
    vm.estack().push(StackItem::from_array(events));
    Ok(())
}

/// `System.Runtime.GetInvocationCounter`.
///
/// The executing script must have been dispatched to at least once; a zero
/// counter means the bookkeeping is corrupt and faults.
pub fn get_invocation_counter(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let hash = vm.current_script_hash().ok_or(VmError::NoContext)?;
    match ctx.invocations.get(&hash) {
        Some(&count) if count > 0 => {
            vm.estack().push(StackItem::from_int(count));
            Ok(())
        }
        _ => Err(InteropError::consistency(
            "invocation counter is missing for the executing script",
        )),
    }
}

/// `System.Runtime.GasLeft`.
pub fn gas_left(_ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let left = vm.gas_left();
    vm.estack().push(StackItem::from_int(left));
    Ok(())
}
