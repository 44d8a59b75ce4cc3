//! Contract lifecycle and cross-contract dispatch.

use crate::crypto::{hash160, validate_public_key};
use crate::error::{InteropError, InteropResult};
use crate::hash::UInt160;
use crate::interop::Context;
use crate::limits::{MAX_CONTRACT_SCRIPT_SIZE, MAX_MANIFEST_SIZE};
use crate::manifest::ContractManifest;
use crate::state::ContractState;
use crate::vm::standard::{create_signature_redeem_script, is_standard_contract};
use crate::vm::{CallFlags, StackItem, Vm, VmError};

/// `System.Contract.Create`.
pub fn create(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let script = vm.estack().pop()?.as_bytes()?;
    let manifest_bytes = vm.estack().pop()?.as_bytes()?;
    if script.is_empty() || script.len() > MAX_CONTRACT_SCRIPT_SIZE {
        return Err(InteropError::bounds("invalid script size"));
    }
    if manifest_bytes.is_empty() || manifest_bytes.len() > MAX_MANIFEST_SIZE {
        return Err(InteropError::bounds("invalid manifest size"));
    }
    let gas = (script.len() + manifest_bytes.len()) as i64 * ctx.storage_price();
    if !vm.add_gas(gas) {
        return Err(InteropError::GasExceeded);
    }

    let manifest = ContractManifest::from_json_bytes(&manifest_bytes)
        .map_err(|e| InteropError::decode(e.to_string()))?;
    let hash = hash160(&script);
    if !manifest.is_valid(&hash) {
        return Err(InteropError::consistency(
            "manifest does not match the script hash",
        ));
    }
    if ctx.dao.get_contract_state(&hash).is_some() {
        return Err(InteropError::consistency("contract already exists"));
    }

    let id = ctx.dao.next_contract_id();
    let cs = ContractState::new(id, script, manifest);
    ctx.dao.put_contract_state(&cs);
    vm.estack().push(cs.to_stack_item());
    Ok(())
}

/// Null or an empty byte string means "field not supplied".
fn optional_bytes(item: StackItem) -> InteropResult<Option<Vec<u8>>> {
    if item.is_null() {
        return Ok(None);
    }
    let bytes = item.as_bytes()?;
    Ok(if bytes.is_empty() { None } else { Some(bytes) })
}

/// `System.Contract.Update`.
///
/// Only the deployed contract itself can update; the stable id and, when no
/// new script is supplied, the script are preserved. Old and new records are
/// swapped atomically within the DAO overlay.
pub fn update(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let script = optional_bytes(vm.estack().pop()?)?;
    let manifest_bytes = optional_bytes(vm.estack().pop()?)?;
    if script.is_none() && manifest_bytes.is_none() {
        return Err(InteropError::bounds("neither script nor manifest supplied"));
    }

    let current = vm.current_script_hash().ok_or(VmError::NoContext)?;
    let mut contract = ctx.dao.get_contract_state(&current).ok_or_else(|| {
        InteropError::permission("update is allowed only for the deployed contract itself")
    })?;
    let old_hash = contract.script_hash();

    if let Some(script) = script {
        if script.len() > MAX_CONTRACT_SCRIPT_SIZE {
            return Err(InteropError::bounds("invalid script size"));
        }
        if script == contract.script {
            return Err(InteropError::consistency("the script is the same"));
        }
        let new_hash = hash160(&script);
        if ctx.dao.get_contract_state(&new_hash).is_some() {
            return Err(InteropError::consistency("contract already exists"));
        }
        if !vm.add_gas(script.len() as i64 * ctx.storage_price()) {
            return Err(InteropError::GasExceeded);
        }
        // The manifest follows the script: rebind its ABI to the new hash.
        let mut manifest = contract.manifest.clone();
        manifest.abi.hash = new_hash;
        contract = ContractState::new(contract.id, script, manifest);
    }

    if let Some(manifest_bytes) = manifest_bytes {
        if manifest_bytes.len() > MAX_MANIFEST_SIZE {
            return Err(InteropError::bounds("invalid manifest size"));
        }
        if !vm.add_gas(manifest_bytes.len() as i64 * ctx.storage_price()) {
            return Err(InteropError::GasExceeded);
        }
        let manifest = ContractManifest::from_json_bytes(&manifest_bytes)
            .map_err(|e| InteropError::decode(e.to_string()))?;
        if !manifest.is_valid(&contract.script_hash()) {
            return Err(InteropError::consistency(
                "manifest does not match the script hash",
            ));
        }
        contract = ContractState::new(contract.id, contract.script, manifest);
        if !contract.has_storage() && !ctx.dao.storage_items(contract.id).is_empty() {
            return Err(InteropError::consistency(
                "the manifest drops storage while storage items exist",
            ));
        }
    }

    ctx.dao.delete_contract_state(&old_hash);
    ctx.dao.put_contract_state(&contract);
    Ok(())
}

/// `System.Contract.Destroy`.
///
/// Missing contract is a silent no-op: "if I exist, delete me".
pub fn destroy(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let hash = vm.current_script_hash().ok_or(VmError::NoContext)?;
    let Some(contract) = ctx.dao.get_contract_state(&hash) else {
        return Ok(());
    };
    ctx.dao.delete_contract_state(&hash);
    for (key, _) in ctx.dao.storage_items(contract.id) {
        ctx.dao.delete_storage_item(contract.id, &key);
    }
    Ok(())
}

/// `System.Contract.Call`.
pub fn call(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let hash = vm.estack().pop()?.as_bytes()?;
    let method = vm.estack().pop()?;
    let args = vm.estack().pop()?;
    call_internal(ctx, vm, &hash, method, args, CallFlags::ALL)
}

/// `System.Contract.CallEx`: like `Call` with an explicit flag request.
pub fn call_ex(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let hash = vm.estack().pop()?.as_bytes()?;
    let method = vm.estack().pop()?;
    let args = vm.estack().pop()?;
    let bits = vm.estack().pop()?.as_i64()?;
    let flags = u8::try_from(bits)
        .ok()
        .and_then(CallFlags::from_bits)
        .ok_or_else(|| InteropError::decode(format!("invalid call flags {bits}")))?;
    call_internal(ctx, vm, &hash, method, args, flags)
}

fn call_internal(
    ctx: &mut Context<'_>,
    vm: &mut Vm,
    hash: &[u8],
    method: StackItem,
    args: StackItem,
    requested: CallFlags,
) -> InteropResult<()> {
    let target =
        UInt160::from_be_bytes(hash).map_err(|_| InteropError::decode("invalid contract hash"))?;
    let cs = ctx
        .dao
        .get_contract_state(&target)
        .ok_or(InteropError::ContractNotFound)?;
    let method_bytes = method.as_bytes()?;

    // Deployed callers are bound by their manifest ACL; bare scripts
    // (e.g. transaction entry scripts) are not.
    if let Some(current) = vm.current_script_hash() {
        if let Some(caller) = ctx.dao.get_contract_state(&current) {
            let method_name = String::from_utf8_lossy(&method_bytes);
            if !caller.manifest.can_call(&cs.manifest, &method_name) {
                return Err(InteropError::permission("disallowed method call"));
            }
        }
    }

    *ctx.invocations.entry(target).or_default() += 1;

    let flags = vm.current_call_flags() & requested;
    vm.load_script_with_hash(cs.script.clone(), target, flags)?;
    // The callee's dispatcher pops the method from the top, then the args.
    // No return value is pushed here; whatever the callee leaves is the
    // result.
    vm.estack().push(args);
    vm.estack().push(method);
    Ok(())
}

/// `System.Contract.IsStandard`.
///
/// Unknown hashes report true: they may well be witness-derived signature
/// contracts that are simply not deployed.
pub fn is_standard(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let bytes = vm.estack().pop()?.as_bytes()?;
    let hash = UInt160::from_be_bytes(&bytes).map_err(|e| InteropError::decode(e.to_string()))?;
    let result = match ctx.dao.get_contract_state(&hash) {
        None => true,
        Some(cs) => is_standard_contract(&cs.script),
    };
    vm.estack().push(StackItem::from_bool(result));
    Ok(())
}

/// `System.Contract.CreateStandardAccount`.
pub fn create_standard_account(_ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let bytes = vm.estack().pop()?.as_bytes()?;
    let key = validate_public_key(&bytes).map_err(|e| InteropError::decode(e.to_string()))?;
    let script = create_signature_redeem_script(&key);
    vm.estack()
        .push(StackItem::from_byte_string(hash160(&script).to_be_bytes().to_vec()));
    Ok(())
}

/// `System.Contract.GetCallFlags`.
pub fn get_call_flags(_ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let flags = vm.current_call_flags();
    vm.estack().push(StackItem::from_int(flags.bits()));
    Ok(())
}
