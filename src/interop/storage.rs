//! Contract storage operations.
//!
//! Storage is namespaced by the contract's stable id, never by its script
//! hash, so that updates preserve every item. A [`StorageContext`] is the
//! capability binding that namespace to a read/write mode; scripts hold it
//! as an opaque interop item.

use std::rc::Rc;

use crate::error::{InteropError, InteropResult};
use crate::interop::iterator::StorageIterator;
use crate::interop::Context;
use crate::limits::MAX_STORAGE_KEY_LEN;
use crate::state::StorageItem;
use crate::vm::{StackItem, Vm, VmError};

/// The capability for one contract's storage namespace.
///
/// The id is immutable; the read-only flag may only ever flip false→true,
/// and doing so allocates a new record rather than mutating the handle a
/// script may still hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageContext {
    pub id: i32,
    pub read_only: bool,
}

impl StorageContext {
    pub fn new(id: i32, read_only: bool) -> Self {
        Self { id, read_only }
    }

    /// A derived read-only handle; `self` is untouched.
    pub fn as_read_only(&self) -> Self {
        Self {
            id: self.id,
            read_only: true,
        }
    }
}

fn pop_storage_context(vm: &mut Vm) -> InteropResult<Rc<StorageContext>> {
    let item = vm.estack().pop()?;
    item.as_interface::<StorageContext>().ok_or_else(|| {
        InteropError::decode(format!("{} is not a storage context", item.type_name()))
    })
}

/// `System.Storage.GetContext`.
pub fn get_context(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let hash = vm.current_script_hash().ok_or(VmError::NoContext)?;
    let contract = ctx
        .dao
        .get_contract_state(&hash)
        .ok_or_else(|| InteropError::consistency("no contract state for the executing script"))?;
    if !contract.has_storage() {
        return Err(InteropError::permission(
            "contract is not allowed to use storage",
        ));
    }
    vm.estack()
        .push(StackItem::from_interface(StorageContext::new(contract.id, false)));
    Ok(())
}

/// `System.Storage.GetReadOnlyContext`.
pub fn get_read_only_context(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let hash = vm.current_script_hash().ok_or(VmError::NoContext)?;
    let contract = ctx
        .dao
        .get_contract_state(&hash)
        .ok_or_else(|| InteropError::consistency("no contract state for the executing script"))?;
    if !contract.has_storage() {
        // A contract without storage gets no handle, but the call succeeds.
        return Ok(());
    }
    vm.estack()
        .push(StackItem::from_interface(StorageContext::new(contract.id, true)));
    Ok(())
}

/// `System.Storage.AsReadOnly`.
pub fn as_read_only(_ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let item = vm.estack().pop()?;
    let stc = item.as_interface::<StorageContext>().ok_or_else(|| {
        InteropError::decode(format!("{} is not a storage context", item.type_name()))
    })?;
    if stc.read_only {
        vm.estack().push(item);
    } else {
        vm.estack()
            .push(StackItem::from_interface(stc.as_read_only()));
    }
    Ok(())
}

/// `System.Storage.Get`.
pub fn get(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let stc = pop_storage_context(vm)?;
    let key = vm.estack().pop()?.as_bytes()?;
    match ctx.dao.get_storage_item(stc.id, &key) {
        Some(item) => vm.estack().push(StackItem::from_byte_string(item.value)),
        None => vm.estack().push(StackItem::null()),
    }
    Ok(())
}

fn put_with_context_and_flags(
    ctx: &mut Context<'_>,
    vm: &mut Vm,
    stc: &StorageContext,
    key: &[u8],
    value: &[u8],
    is_const: bool,
) -> InteropResult<()> {
    if key.len() > MAX_STORAGE_KEY_LEN {
        return Err(InteropError::bounds("key is too big"));
    }
    if stc.read_only {
        return Err(InteropError::permission("storage context is read only"));
    }
    let existing = ctx.dao.get_storage_item(stc.id, key).unwrap_or_default();
    if existing.is_const {
        return Err(InteropError::permission(
            "storage item exists and is constant",
        ));
    }
    let size_inc = if value.len() > existing.value.len() {
        value.len() - existing.value.len()
    } else {
        1
    };
    if !vm.add_gas(size_inc as i64 * ctx.storage_price()) {
        return Err(InteropError::GasExceeded);
    }
    ctx.dao.put_storage_item(
        stc.id,
        key,
        &StorageItem {
            value: value.to_vec(),
            is_const,
        },
    );
    Ok(())
}

fn put_internal(ctx: &mut Context<'_>, vm: &mut Vm, with_flags: bool) -> InteropResult<()> {
    let stc = pop_storage_context(vm)?;
    let key = vm.estack().pop()?.as_bytes()?;
    let value = vm.estack().pop()?.as_bytes()?;
    let flags = if with_flags {
        vm.estack().pop()?.as_i64()?
    } else {
        0
    };
    put_with_context_and_flags(ctx, vm, &stc, &key, &value, flags & 1 == 1)
}

/// `System.Storage.Put`.
pub fn put(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    put_internal(ctx, vm, false)
}

/// `System.Storage.PutEx`. Flag bit 0 marks the written item constant.
pub fn put_ex(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    put_internal(ctx, vm, true)
}

/// `System.Storage.Delete`. Removing a missing key succeeds.
pub fn delete(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let stc = pop_storage_context(vm)?;
    if stc.read_only {
        return Err(InteropError::permission("storage context is read only"));
    }
    let key = vm.estack().pop()?.as_bytes()?;
    if let Some(item) = ctx.dao.get_storage_item(stc.id, &key) {
        if item.is_const {
            return Err(InteropError::permission("storage item is constant"));
        }
    }
    ctx.dao.delete_storage_item(stc.id, &key);
    Ok(())
}

/// `System.Storage.Find`: iterator over the handle's namespace, restricted
/// to keys starting with the popped prefix, in key order.
pub fn find(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let stc = pop_storage_context(vm)?;
    let prefix = vm.estack().pop()?.as_bytes()?;
    let entries = ctx
        .dao
        .storage_items(stc.id)
        .into_iter()
        .filter(|(key, _)| key.starts_with(&prefix))
        .map(|(key, item)| (key, item.value))
        .collect();
    vm.estack()
        .push(StackItem::from_interface(StorageIterator::new(entries)));
    Ok(())
}
