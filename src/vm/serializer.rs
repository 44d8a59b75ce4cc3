//! Canonical stack-item codec.
//!
//! Notifications and nested storage values must serialize identically on
//! every node: the encoding is type-tagged, length-prefixed, and
//! deterministic. Interop items are host capabilities and never serialize; a
//! compound item that reaches itself through references is rejected rather
//! than recursed into.

use std::rc::Rc;

use thiserror::Error;

use crate::io::{IoError, Reader, Writer};
use crate::limits::{MAX_ITEM_SIZE, MAX_SERIALIZATION_DEPTH, MAX_SERIALIZED_ITEMS};
use crate::vm::stack_item::{bigint_from_bytes, bigint_to_bytes, StackItem};

const MAX_INTEGER_SIZE: usize = 32;

/// Type tags of the wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum Tag {
    Any = 0x00,
    Boolean = 0x20,
    Integer = 0x21,
    ByteString = 0x28,
    Array = 0x40,
    Map = 0x48,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SerializationError {
    #[error("interop items cannot be serialized")]
    InteropItem,
    #[error("item contains a reference to itself")]
    CircularReference,
    #[error("nesting exceeds depth limit {0}")]
    TooDeep(usize),
    #[error("too many items")]
    TooManyItems,
    #[error("serialized item exceeds {0} bytes")]
    TooLarge(usize),
    #[error("integer exceeds {MAX_INTEGER_SIZE} bytes")]
    IntegerTooLarge,
    #[error("map keys must be primitive, got {0}")]
    InvalidMapKey(&'static str),
    #[error("unknown type tag 0x{0:02x}")]
    UnknownTag(u8),
    #[error("trailing bytes after item")]
    TrailingData,
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Serializes `item` into its canonical byte form.
pub fn serialize(item: &StackItem) -> Result<Vec<u8>, SerializationError> {
    let mut writer = Writer::new();
    let mut seen: Vec<*const ()> = Vec::new();
    let mut count = 0usize;
    write_item(item, &mut writer, &mut seen, &mut count, 0)?;
    if writer.len() > MAX_ITEM_SIZE {
        return Err(SerializationError::TooLarge(MAX_ITEM_SIZE));
    }
    Ok(writer.into_bytes())
}

fn write_item(
    item: &StackItem,
    w: &mut Writer,
    seen: &mut Vec<*const ()>,
    count: &mut usize,
    depth: usize,
) -> Result<(), SerializationError> {
    if depth > MAX_SERIALIZATION_DEPTH {
        return Err(SerializationError::TooDeep(MAX_SERIALIZATION_DEPTH));
    }
    *count += 1;
    if *count > MAX_SERIALIZED_ITEMS {
        return Err(SerializationError::TooManyItems);
    }

    match item {
        StackItem::Null => w.write_u8(Tag::Any as u8),
        StackItem::Boolean(v) => {
            w.write_u8(Tag::Boolean as u8);
            w.write_bool(*v);
        }
        StackItem::Integer(n) => {
            let bytes = bigint_to_bytes(n);
            if bytes.len() > MAX_INTEGER_SIZE {
                return Err(SerializationError::IntegerTooLarge);
            }
            w.write_u8(Tag::Integer as u8);
            w.write_var_bytes(&bytes);
        }
        StackItem::ByteString(bytes) => {
            w.write_u8(Tag::ByteString as u8);
            w.write_var_bytes(bytes);
        }
        StackItem::Array(items) => {
            let ptr = Rc::as_ptr(items) as *const ();
            if seen.contains(&ptr) {
                return Err(SerializationError::CircularReference);
            }
            seen.push(ptr);
            let items = items.borrow();
            w.write_u8(Tag::Array as u8);
            w.write_var_int(items.len() as u64);
            for element in items.iter() {
                write_item(element, w, seen, count, depth + 1)?;
            }
            seen.pop();
        }
        StackItem::Map(entries) => {
            let ptr = Rc::as_ptr(entries) as *const ();
            if seen.contains(&ptr) {
                return Err(SerializationError::CircularReference);
            }
            seen.push(ptr);
            let entries = entries.borrow();
            w.write_u8(Tag::Map as u8);
            w.write_var_int(entries.len() as u64);
            for (key, value) in entries.iter() {
                if !matches!(
                    key,
                    StackItem::Boolean(_) | StackItem::Integer(_) | StackItem::ByteString(_)
                ) {
                    return Err(SerializationError::InvalidMapKey(key.type_name()));
                }
                write_item(key, w, seen, count, depth + 1)?;
                write_item(value, w, seen, count, depth + 1)?;
            }
            seen.pop();
        }
        StackItem::Interop(_) => return Err(SerializationError::InteropItem),
    }
    Ok(())
}

/// Decodes a canonical byte form back into a stack item.
pub fn deserialize(data: &[u8]) -> Result<StackItem, SerializationError> {
    let mut reader = Reader::new(data);
    let mut count = 0usize;
    let item = read_item(&mut reader, &mut count, 0)?;
    if reader.remaining() != 0 {
        return Err(SerializationError::TrailingData);
    }
    Ok(item)
}

fn read_item(
    r: &mut Reader<'_>,
    count: &mut usize,
    depth: usize,
) -> Result<StackItem, SerializationError> {
    if depth > MAX_SERIALIZATION_DEPTH {
        return Err(SerializationError::TooDeep(MAX_SERIALIZATION_DEPTH));
    }
    *count += 1;
    if *count > MAX_SERIALIZED_ITEMS {
        return Err(SerializationError::TooManyItems);
    }

    let tag = r.read_u8()?;
    let item = match tag {
        x if x == Tag::Any as u8 => StackItem::Null,
        x if x == Tag::Boolean as u8 => StackItem::from_bool(r.read_bool()?),
        x if x == Tag::Integer as u8 => {
            let bytes = r.read_var_bytes(MAX_INTEGER_SIZE)?;
            StackItem::Integer(bigint_from_bytes(bytes))
        }
        x if x == Tag::ByteString as u8 => {
            StackItem::from_byte_string(r.read_var_bytes(MAX_ITEM_SIZE)?.to_vec())
        }
        x if x == Tag::Array as u8 => {
            let len = r.read_var_int(MAX_SERIALIZED_ITEMS as u64)? as usize;
            let mut items = Vec::with_capacity(len.min(MAX_SERIALIZED_ITEMS));
            for _ in 0..len {
                items.push(read_item(r, count, depth + 1)?);
            }
            StackItem::from_array(items)
        }
        x if x == Tag::Map as u8 => {
            let len = r.read_var_int(MAX_SERIALIZED_ITEMS as u64)? as usize;
            let mut entries = Vec::with_capacity(len.min(MAX_SERIALIZED_ITEMS));
            for _ in 0..len {
                let key = read_item(r, count, depth + 1)?;
                let value = read_item(r, count, depth + 1)?;
                entries.push((key, value));
            }
            match StackItem::new_map() {
                StackItem::Map(map) => {
                    *map.borrow_mut() = entries;
                    StackItem::Map(map)
                }
                _ => unreachable!(),
            }
        }
        other => return Err(SerializationError::UnknownTag(other)),
    };
    Ok(item)
}
