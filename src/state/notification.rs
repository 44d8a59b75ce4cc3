//! Notification events emitted by scripts through `System.Runtime.Notify`.

use crate::hash::UInt160;
use crate::vm::StackItem;

/// One emitted notification. Events accumulate in emission order within an
/// execution context and are never removed; a fault discards the whole
/// context, events included.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationEvent {
    /// Script hash of the emitting contract.
    pub script_hash: UInt160,
    pub name: String,
    /// Payload; always serializable under the canonical codec by the time it
    /// is stored here.
    pub item: StackItem,
}

impl NotificationEvent {
    /// Triple form pushed by `System.Runtime.GetNotifications`.
    pub fn to_stack_item(&self) -> StackItem {
        StackItem::from_array(vec![
            StackItem::from_byte_string(self.script_hash.to_be_bytes().to_vec()),
            StackItem::from_byte_string(self.name.as_bytes().to_vec()),
            self.item.clone(),
        ])
    }
}
