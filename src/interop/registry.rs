//! The syscall table.
//!
//! Every interop primitive is registered under a stable numeric identifier —
//! the first four little-endian bytes of the SHA-256 of its ASCII name —
//! together with its fixed price and the call flags a frame must hold to use
//! it. The table is identical on every node; diverging here forks the chain.

use std::collections::HashMap;

use crate::crypto::sha256;
use crate::error::InteropResult;
use crate::interop::{blockchain, contract, iterator, runtime, storage, Context};
use crate::vm::{CallFlags, Vm};

/// Canonical syscall names.
pub mod names {
    pub const BLOCKCHAIN_GET_BLOCK: &str = "System.Blockchain.GetBlock";
    pub const BLOCKCHAIN_GET_CONTRACT: &str = "System.Blockchain.GetContract";
    pub const BLOCKCHAIN_GET_HEIGHT: &str = "System.Blockchain.GetHeight";
    pub const BLOCKCHAIN_GET_TRANSACTION: &str = "System.Blockchain.GetTransaction";
    pub const BLOCKCHAIN_GET_TRANSACTION_FROM_BLOCK: &str =
        "System.Blockchain.GetTransactionFromBlock";
    pub const BLOCKCHAIN_GET_TRANSACTION_HEIGHT: &str = "System.Blockchain.GetTransactionHeight";

    pub const CONTRACT_CALL: &str = "System.Contract.Call";
    pub const CONTRACT_CALL_EX: &str = "System.Contract.CallEx";
    pub const CONTRACT_CREATE: &str = "System.Contract.Create";
    pub const CONTRACT_CREATE_STANDARD_ACCOUNT: &str = "System.Contract.CreateStandardAccount";
    pub const CONTRACT_DESTROY: &str = "System.Contract.Destroy";
    pub const CONTRACT_GET_CALL_FLAGS: &str = "System.Contract.GetCallFlags";
    pub const CONTRACT_IS_STANDARD: &str = "System.Contract.IsStandard";
    pub const CONTRACT_UPDATE: &str = "System.Contract.Update";

    pub const ITERATOR_KEY: &str = "System.Iterator.Key";
    pub const ITERATOR_NEXT: &str = "System.Iterator.Next";
    pub const ITERATOR_VALUE: &str = "System.Iterator.Value";

    pub const RUNTIME_GAS_LEFT: &str = "System.Runtime.GasLeft";
    pub const RUNTIME_GET_CALLING_SCRIPT_HASH: &str = "System.Runtime.GetCallingScriptHash";
    pub const RUNTIME_GET_ENTRY_SCRIPT_HASH: &str = "System.Runtime.GetEntryScriptHash";
    pub const RUNTIME_GET_EXECUTING_SCRIPT_HASH: &str = "System.Runtime.GetExecutingScriptHash";
    pub const RUNTIME_GET_INVOCATION_COUNTER: &str = "System.Runtime.GetInvocationCounter";
    pub const RUNTIME_GET_NOTIFICATIONS: &str = "System.Runtime.GetNotifications";
    pub const RUNTIME_GET_SCRIPT_CONTAINER: &str = "System.Runtime.GetScriptContainer";
    pub const RUNTIME_GET_TIME: &str = "System.Runtime.GetTime";
    pub const RUNTIME_GET_TRIGGER: &str = "System.Runtime.GetTrigger";
    pub const RUNTIME_LOG: &str = "System.Runtime.Log";
    pub const RUNTIME_NOTIFY: &str = "System.Runtime.Notify";
    pub const RUNTIME_PLATFORM: &str = "System.Runtime.Platform";

    pub const STORAGE_AS_READ_ONLY: &str = "System.Storage.AsReadOnly";
    pub const STORAGE_DELETE: &str = "System.Storage.Delete";
    pub const STORAGE_FIND: &str = "System.Storage.Find";
    pub const STORAGE_GET: &str = "System.Storage.Get";
    pub const STORAGE_GET_CONTEXT: &str = "System.Storage.GetContext";
    pub const STORAGE_GET_READ_ONLY_CONTEXT: &str = "System.Storage.GetReadOnlyContext";
    pub const STORAGE_PUT: &str = "System.Storage.Put";
    pub const STORAGE_PUT_EX: &str = "System.Storage.PutEx";
}

/// Identifier a SYSCALL instruction carries for the named primitive.
pub fn syscall_id(name: &str) -> u32 {
    let digest = sha256(name.as_bytes());
    u32::from_le_bytes(digest[..4].try_into().unwrap())
}

pub type InteropHandler = fn(&mut Context<'_>, &mut Vm) -> InteropResult<()>;

/// One syscall table entry.
#[derive(Clone, Copy)]
pub struct InteropDescriptor {
    pub name: &'static str,
    pub handler: InteropHandler,
    /// Fixed price charged before the handler runs.
    pub price: i64,
    /// Flags the current frame must hold.
    pub required_call_flags: CallFlags,
}

/// The fixed syscall-id → descriptor mapping.
pub struct InteropRegistry {
    descriptors: HashMap<u32, InteropDescriptor>,
}

impl Default for InteropRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InteropRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            descriptors: HashMap::new(),
        };
        registry.register_defaults();
        registry
    }

    pub fn get(&self, id: u32) -> Option<&InteropDescriptor> {
        self.descriptors.get(&id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&InteropDescriptor> {
        self.descriptors.get(&syscall_id(name))
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    fn register(
        &mut self,
        name: &'static str,
        handler: InteropHandler,
        price: i64,
        required_call_flags: CallFlags,
    ) {
        let id = syscall_id(name);
        let previous = self.descriptors.insert(
            id,
            InteropDescriptor {
                name,
                handler,
                price,
                required_call_flags,
            },
        );
        debug_assert!(previous.is_none(), "syscall id collision for {name}");
    }

    fn register_defaults(&mut self) {
        use names::*;

        const READ: CallFlags = CallFlags::READ_STATES;
        const WRITE: CallFlags = CallFlags::WRITE_STATES;
        const NONE: CallFlags = CallFlags::NONE;

        self.register(BLOCKCHAIN_GET_BLOCK, blockchain::get_block, 1 << 15, READ);
        self.register(BLOCKCHAIN_GET_CONTRACT, blockchain::get_contract, 1 << 15, READ);
        self.register(BLOCKCHAIN_GET_HEIGHT, blockchain::get_height, 1 << 4, READ);
        self.register(
            BLOCKCHAIN_GET_TRANSACTION,
            blockchain::get_transaction,
            1 << 15,
            READ,
        );
        self.register(
            BLOCKCHAIN_GET_TRANSACTION_FROM_BLOCK,
            blockchain::get_transaction_from_block,
            1 << 15,
            READ,
        );
        self.register(
            BLOCKCHAIN_GET_TRANSACTION_HEIGHT,
            blockchain::get_transaction_height,
            1 << 15,
            READ,
        );

        self.register(CONTRACT_CALL, contract::call, 1 << 15, CallFlags::ALLOW_CALL);
        self.register(CONTRACT_CALL_EX, contract::call_ex, 1 << 15, CallFlags::ALLOW_CALL);
        self.register(CONTRACT_CREATE, contract::create, 0, WRITE);
        self.register(
            CONTRACT_CREATE_STANDARD_ACCOUNT,
            contract::create_standard_account,
            1 << 8,
            NONE,
        );
        self.register(CONTRACT_DESTROY, contract::destroy, 1 << 15, WRITE);
        self.register(CONTRACT_GET_CALL_FLAGS, contract::get_call_flags, 1 << 10, NONE);
        self.register(CONTRACT_IS_STANDARD, contract::is_standard, 1 << 10, READ);
        self.register(CONTRACT_UPDATE, contract::update, 0, WRITE);

        self.register(ITERATOR_KEY, iterator::key, 1 << 4, NONE);
        self.register(ITERATOR_NEXT, iterator::next, 1 << 15, NONE);
        self.register(ITERATOR_VALUE, iterator::value, 1 << 4, NONE);

        self.register(RUNTIME_GAS_LEFT, runtime::gas_left, 1 << 4, NONE);
        self.register(
            RUNTIME_GET_CALLING_SCRIPT_HASH,
            runtime::get_calling_script_hash,
            1 << 4,
            NONE,
        );
        self.register(
            RUNTIME_GET_ENTRY_SCRIPT_HASH,
            runtime::get_entry_script_hash,
            1 << 4,
            NONE,
        );
        self.register(
            RUNTIME_GET_EXECUTING_SCRIPT_HASH,
            runtime::get_executing_script_hash,
            1 << 4,
            NONE,
        );
        self.register(
            RUNTIME_GET_INVOCATION_COUNTER,
            runtime::get_invocation_counter,
            1 << 4,
            NONE,
        );
        self.register(
            RUNTIME_GET_NOTIFICATIONS,
            runtime::get_notifications,
            1 << 8,
            NONE,
        );
        self.register(
            RUNTIME_GET_SCRIPT_CONTAINER,
            runtime::get_script_container,
            1 << 3,
            NONE,
        );
        self.register(RUNTIME_GET_TIME, runtime::get_time, 1 << 3, NONE);
        self.register(RUNTIME_GET_TRIGGER, runtime::get_trigger, 1 << 3, NONE);
        self.register(RUNTIME_LOG, runtime::log, 1 << 15, CallFlags::ALLOW_NOTIFY);
        self.register(RUNTIME_NOTIFY, runtime::notify, 1 << 15, CallFlags::ALLOW_NOTIFY);
        self.register(RUNTIME_PLATFORM, runtime::platform, 1 << 3, NONE);

        self.register(STORAGE_AS_READ_ONLY, storage::as_read_only, 1 << 4, READ);
        self.register(STORAGE_DELETE, storage::delete, 1 << 15, WRITE);
        self.register(STORAGE_FIND, storage::find, 1 << 15, READ);
        self.register(STORAGE_GET, storage::get, 1 << 15, READ);
        self.register(STORAGE_GET_CONTEXT, storage::get_context, 1 << 4, READ);
        self.register(
            STORAGE_GET_READ_ONLY_CONTEXT,
            storage::get_read_only_context,
            1 << 4,
            READ,
        );
        self.register(STORAGE_PUT, storage::put, 1 << 15, WRITE);
        self.register(STORAGE_PUT_EX, storage::put_ex, 1 << 15, WRITE);
    }
}
