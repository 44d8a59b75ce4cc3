//! Ledger lookups exposed to scripts.
//!
//! Every lookup is bounded by the traceability window: targets outside it
//! surface as Null (or `-1` for heights), never as faults, so scripts can
//! probe state safely. Only malformed arguments fault.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

use crate::error::{InteropError, InteropResult};
use crate::hash::{UInt160, UInt256};
use crate::interop::Context;
use crate::ledger::{Block, Transaction};
use crate::vm::{StackItem, Vm};

/// Resolves a script-supplied element to a block hash. Elements of five
/// bytes or fewer are unsigned header indexes; anything longer must be a
/// 32-byte big-endian hash. Returns `None` for an index past the known
/// headers.
fn block_hash_from_element(
    ctx: &Context<'_>,
    element: &StackItem,
) -> InteropResult<Option<UInt256>> {
    let bytes = element.as_bytes()?;
    if bytes.len() <= 5 {
        let index = element.as_int()?;
        if index.is_negative() || index > BigInt::from(u32::MAX) {
            return Err(InteropError::bounds("bad block index"));
        }
        let index = index.to_u32().expect("bounded above");
        Ok(ctx.chain.header_hash(index))
    } else {
        UInt256::from_be_bytes(&bytes)
            .map(Some)
            .map_err(|e| InteropError::decode(e.to_string()))
    }
}

/// Positional 8-item encoding of a block.
pub(crate) fn block_to_stack_item(block: &Block) -> StackItem {
    StackItem::from_array(vec![
        StackItem::from_byte_string(block.hash().to_be_bytes().to_vec()),
        StackItem::from_int(block.header.version),
        StackItem::from_byte_string(block.header.prev_hash.to_be_bytes().to_vec()),
        StackItem::from_byte_string(block.header.merkle_root.to_be_bytes().to_vec()),
        StackItem::from_int(block.header.timestamp),
        StackItem::from_int(block.header.index),
        StackItem::from_byte_string(block.header.next_consensus.to_be_bytes().to_vec()),
        StackItem::from_int(block.transactions.len() as u64),
    ])
}

/// Positional 8-item encoding of a transaction.
pub(crate) fn transaction_to_stack_item(tx: &Transaction) -> StackItem {
    StackItem::from_array(vec![
        StackItem::from_byte_string(tx.hash().to_be_bytes().to_vec()),
        StackItem::from_int(tx.version),
        StackItem::from_int(tx.nonce),
        StackItem::from_byte_string(tx.sender.to_be_bytes().to_vec()),
        StackItem::from_int(tx.system_fee),
        StackItem::from_int(tx.network_fee),
        StackItem::from_int(tx.valid_until_block),
        StackItem::from_byte_string(tx.script.clone()),
    ])
}

/// `System.Blockchain.GetHeight`.
pub fn get_height(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    vm.estack().push(StackItem::from_int(ctx.chain.block_height()));
    Ok(())
}

/// `System.Blockchain.GetBlock`.
pub fn get_block(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let element = vm.estack().pop()?;
    let block = block_hash_from_element(ctx, &element)?
        .and_then(|hash| ctx.chain.get_block(&hash));
    match block {
        Some(block) if ctx.is_traceable(block.index()) => {
            vm.estack().push(block_to_stack_item(&block));
        }
        _ => vm.estack().push(StackItem::null()),
    }
    Ok(())
}

fn pop_transaction(ctx: &Context<'_>, vm: &mut Vm) -> InteropResult<Option<(Transaction, u32)>> {
    let bytes = vm.estack().pop()?.as_bytes()?;
    Ok(UInt256::from_be_bytes(&bytes)
        .ok()
        .and_then(|hash| ctx.dao.get_transaction(&hash)))
}

/// `System.Blockchain.GetTransaction`.
pub fn get_transaction(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    match pop_transaction(ctx, vm)? {
        Some((tx, height)) if ctx.is_traceable(height) => {
            vm.estack().push(transaction_to_stack_item(&tx));
        }
        _ => vm.estack().push(StackItem::null()),
    }
    Ok(())
}

/// `System.Blockchain.GetTransactionHeight`.
pub fn get_transaction_height(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    match pop_transaction(ctx, vm)? {
        Some((_, height)) if ctx.is_traceable(height) => {
            vm.estack().push(StackItem::from_int(height));
        }
        _ => vm.estack().push(StackItem::from_int(-1)),
    }
    Ok(())
}

/// `System.Blockchain.GetTransactionFromBlock`.
///
/// Pops the block (hash or index) first; the transaction index is consumed
/// only when the block resolves.
pub fn get_transaction_from_block(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let element = vm.estack().pop()?;
    let block = block_hash_from_element(ctx, &element)?
        .and_then(|hash| ctx.dao.get_block(&hash));
    let block = match block {
        Some(block) if ctx.is_traceable(block.index()) => block,
        _ => {
            vm.estack().push(StackItem::null());
            return Ok(());
        }
    };
    let index = vm.estack().pop()?.as_i64()?;
    if index < 0 || index as usize >= block.transactions.len() {
        return Err(InteropError::bounds("wrong transaction index"));
    }
    let tx = &block.transactions[index as usize];
    vm.estack()
        .push(StackItem::from_byte_string(tx.hash().to_be_bytes().to_vec()));
    Ok(())
}

/// `System.Blockchain.GetContract`.
pub fn get_contract(ctx: &mut Context<'_>, vm: &mut Vm) -> InteropResult<()> {
    let bytes = vm.estack().pop()?.as_bytes()?;
    let hash = UInt160::from_be_bytes(&bytes).map_err(|e| InteropError::decode(e.to_string()))?;
    match ctx.dao.get_contract_state(&hash) {
        Some(cs) => vm.estack().push(cs.to_stack_item()),
        None => vm.estack().push(StackItem::null()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::UInt160;
    use crate::ledger::Header;

    #[test]
    fn block_item_shape() {
        let block = Block {
            header: Header {
                version: 0,
                prev_hash: UInt256::from_be_bytes(&[1u8; 32]).unwrap(),
                merkle_root: UInt256::from_be_bytes(&[2u8; 32]).unwrap(),
                timestamp: 42,
                index: 7,
                next_consensus: UInt160::from_be_bytes(&[3u8; 20]).unwrap(),
            },
            transactions: vec![Transaction::default(); 2],
        };
        let items = block_to_stack_item(&block).as_array().unwrap();
        assert_eq!(items.len(), 8);
        assert_eq!(items[0].as_bytes().unwrap(), block.hash().to_be_bytes());
        assert_eq!(items[5].as_i64().unwrap(), 7);
        assert_eq!(items[7].as_i64().unwrap(), 2);
    }

    #[test]
    fn transaction_item_shape() {
        let tx = Transaction {
            version: 1,
            nonce: 2,
            sender: UInt160::from_be_bytes(&[9u8; 20]).unwrap(),
            system_fee: 3,
            network_fee: 4,
            valid_until_block: 5,
            script: vec![0x61],
        };
        let items = transaction_to_stack_item(&tx).as_array().unwrap();
        assert_eq!(items.len(), 8);
        assert_eq!(items[0].as_bytes().unwrap(), tx.hash().to_be_bytes());
        assert_eq!(items[3].as_bytes().unwrap(), tx.sender.to_be_bytes());
        assert_eq!(items[7].as_bytes().unwrap(), tx.script);
    }
}
