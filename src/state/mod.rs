//! State records owned by the ledger: deployed contracts, their storage
//! items, and the notifications accumulated during execution.

mod contract_state;
mod notification;
mod storage_item;

pub use contract_state::ContractState;
pub use notification::NotificationEvent;
pub use storage_item::StorageItem;
