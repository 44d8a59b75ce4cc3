//! Iterator stack items produced by `System.Storage.Find`.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{InteropError, InteropResult};
use crate::interop::Context;
use crate::vm::{StackItem, Vm};

/// A snapshot iterator over one contract's storage entries. Positioned
/// before the first entry; `Next` must succeed before `Key`/`Value` yield
/// anything.
#[derive(Debug)]
pub struct StorageIterator {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
    position: Cell<Option<usize>>,
}

impl StorageIterator {
    pub fn new(entries: Vec<(Vec<u8>, Vec<u8>)>) -> Self {
        Self {
            entries,
            position: Cell::new(None),
        }
    }

    pub fn advance(&self) -> bool {
        let next = match self.position.get() {
            None => 0,
            Some(i) => i + 1,
        };
        if next < self.entries.len() {
            self.position.set(Some(next));
            true
        } else {
            false
        }
    }

    pub fn key(&self) -> Option<&[u8]> {
        self.position
            .get()
            .and_then(|i| self.entries.get(i))
            .map(|(k, _)| k.as_slice())
    }

    pub fn value(&self) -> Option<&[u8]> {
        self.position
            .get()
            .and_then(|i| self.entries.get(i))
            .map(|(_, v)| v.as_slice())
    }
}

fn pop_iterator(vm: &mut Vm) -> InteropResult<Rc<StorageIterator>> {
    let item = vm.estack().pop()?;
    item.as_interface::<StorageIterator>()
        .ok_or_else(|| InteropError::decode(format!("{} is not an iterator", item.type_name())))
}

/// `System.Iterator.Next`.
pub fn next(_ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let it = pop_iterator(vm)?;
    vm.estack().push(StackItem::from_bool(it.advance()));
    Ok(())
}

/// `System.Iterator.Key`.
pub fn key(_ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let it = pop_iterator(vm)?;
    let key = it
        .key()
        .ok_or_else(|| InteropError::bounds("iterator is not positioned on an entry"))?;
    vm.estack().push(StackItem::from_byte_string(key.to_vec()));
    Ok(())
}

/// `System.Iterator.Value`.
pub fn value(_ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let it = pop_iterator(vm)?;
    let value = it
        .value()
        .ok_or_else(|| InteropError::bounds("iterator is not positioned on an entry"))?;
    vm.estack().push(StackItem::from_byte_string(value.to_vec()));
    Ok(())
}
