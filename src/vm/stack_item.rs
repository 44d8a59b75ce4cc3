//! Typed values on the VM evaluation stack.
//!
//! Arrays and maps are reference types: clones share the underlying storage,
//! so a compound item can alias or even contain itself. The canonical codec
//! is responsible for detecting such cycles.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::vm::error::{VmError, VmResult};

pub type ArrayRef = Rc<RefCell<Vec<StackItem>>>;
pub type MapRef = Rc<RefCell<Vec<(StackItem, StackItem)>>>;

/// A value on the evaluation stack.
#[derive(Clone)]
pub enum StackItem {
    Null,
    Boolean(bool),
    Integer(BigInt),
    ByteString(Vec<u8>),
    Array(ArrayRef),
    Map(MapRef),
    /// Host object handed to scripts as an opaque capability.
    Interop(Rc<dyn Any>),
}

impl StackItem {
    pub fn null() -> Self {
        StackItem::Null
    }

    pub fn from_bool(v: bool) -> Self {
        StackItem::Boolean(v)
    }

    pub fn from_int<T: Into<BigInt>>(v: T) -> Self {
        StackItem::Integer(v.into())
    }

    pub fn from_byte_string<T: Into<Vec<u8>>>(v: T) -> Self {
        StackItem::ByteString(v.into())
    }

    pub fn from_array(items: Vec<StackItem>) -> Self {
        StackItem::Array(Rc::new(RefCell::new(items)))
    }

    pub fn new_map() -> Self {
        StackItem::Map(Rc::new(RefCell::new(Vec::new())))
    }

    /// Wraps a host object as an opaque interop item.
    pub fn from_interface<T: Any>(value: T) -> Self {
        StackItem::Interop(Rc::new(value))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            StackItem::Null => "Null",
            StackItem::Boolean(_) => "Boolean",
            StackItem::Integer(_) => "Integer",
            StackItem::ByteString(_) => "ByteString",
            StackItem::Array(_) => "Array",
            StackItem::Map(_) => "Map",
            StackItem::Interop(_) => "InteropInterface",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, StackItem::Null)
    }

    /// Byte form of the item. Integers use the minimal signed little-endian
    /// encoding with zero as the empty string.
    pub fn as_bytes(&self) -> VmResult<Vec<u8>> {
        match self {
            StackItem::ByteString(b) => Ok(b.clone()),
            StackItem::Integer(n) => Ok(bigint_to_bytes(n)),
            StackItem::Boolean(v) => Ok(if *v { vec![1] } else { vec![0] }),
            other => Err(VmError::InvalidConversion {
                from: other.type_name(),
                to: "ByteString",
            }),
        }
    }

    pub fn as_int(&self) -> VmResult<BigInt> {
        match self {
            StackItem::Integer(n) => Ok(n.clone()),
            StackItem::ByteString(b) => Ok(bigint_from_bytes(b)),
            StackItem::Boolean(v) => Ok(BigInt::from(*v as u8)),
            other => Err(VmError::InvalidConversion {
                from: other.type_name(),
                to: "Integer",
            }),
        }
    }

    pub fn as_i64(&self) -> VmResult<i64> {
        self.as_int()?.to_i64().ok_or(VmError::IntegerOverflow)
    }

    pub fn as_bool(&self) -> VmResult<bool> {
        match self {
            StackItem::Null => Ok(false),
            StackItem::Boolean(v) => Ok(*v),
            StackItem::Integer(n) => Ok(!n.is_zero()),
            StackItem::ByteString(b) => Ok(b.iter().any(|x| *x != 0)),
            StackItem::Array(_) | StackItem::Map(_) | StackItem::Interop(_) => Ok(true),
        }
    }

    pub fn as_array(&self) -> VmResult<Vec<StackItem>> {
        match self {
            StackItem::Array(items) => Ok(items.borrow().clone()),
            other => Err(VmError::InvalidConversion {
                from: other.type_name(),
                to: "Array",
            }),
        }
    }

    pub fn array_ref(&self) -> VmResult<ArrayRef> {
        match self {
            StackItem::Array(items) => Ok(Rc::clone(items)),
            other => Err(VmError::InvalidConversion {
                from: other.type_name(),
                to: "Array",
            }),
        }
    }

    /// Downcasts an interop item to the concrete host type it wraps.
    pub fn as_interface<T: Any>(&self) -> Option<Rc<T>> {
        match self {
            StackItem::Interop(rc) => Rc::clone(rc).downcast::<T>().ok(),
            _ => None,
        }
    }
}

/// Minimal signed little-endian encoding; zero encodes as the empty string.
pub fn bigint_to_bytes(n: &BigInt) -> Vec<u8> {
    if n.is_zero() {
        Vec::new()
    } else {
        n.to_signed_bytes_le()
    }
}

pub fn bigint_from_bytes(bytes: &[u8]) -> BigInt {
    if bytes.is_empty() {
        BigInt::zero()
    } else {
        BigInt::from_signed_bytes_le(bytes)
    }
}

impl PartialEq for StackItem {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StackItem::Null, StackItem::Null) => true,
            (StackItem::Boolean(a), StackItem::Boolean(b)) => a == b,
            (StackItem::Integer(a), StackItem::Integer(b)) => a == b,
            (StackItem::ByteString(a), StackItem::ByteString(b)) => a == b,
            (StackItem::Array(a), StackItem::Array(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (StackItem::Map(a), StackItem::Map(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (StackItem::Interop(a), StackItem::Interop(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for StackItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackItem::Null => write!(f, "Null"),
            StackItem::Boolean(v) => write!(f, "Boolean({v})"),
            StackItem::Integer(n) => write!(f, "Integer({n})"),
            StackItem::ByteString(b) => write!(f, "ByteString(0x{})", hex::encode(b)),
            StackItem::Array(items) => match items.try_borrow() {
                Ok(items) => f.debug_list().entries(items.iter()).finish(),
                Err(_) => write!(f, "Array(<borrowed>)"),
            },
            StackItem::Map(entries) => match entries.try_borrow() {
                Ok(entries) => f.debug_map().entries(entries.iter().map(|(k, v)| (k, v))).finish(),
                Err(_) => write!(f, "Map(<borrowed>)"),
            },
            StackItem::Interop(_) => write!(f, "InteropInterface"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_bytes_are_minimal() {
        assert_eq!(bigint_to_bytes(&BigInt::from(0)), Vec::<u8>::new());
        assert_eq!(bigint_to_bytes(&BigInt::from(1)), vec![1]);
        assert_eq!(bigint_to_bytes(&BigInt::from(-1)), vec![0xFF]);
        assert_eq!(bigint_from_bytes(&[]), BigInt::from(0));
        let n = BigInt::from(0x1234_5678i64);
        assert_eq!(bigint_from_bytes(&bigint_to_bytes(&n)), n);
    }

    #[test]
    fn conversions() {
        assert_eq!(
            StackItem::from_byte_string(vec![5]).as_int().unwrap(),
            BigInt::from(5)
        );
        assert!(StackItem::null().as_bytes().is_err());
        assert!(!StackItem::null().as_bool().unwrap());
        assert!(StackItem::from_array(vec![]).as_bool().unwrap());
        assert!(StackItem::from_byte_string(vec![0, 0]).as_bool().is_ok_and(|b| !b));
    }

    #[test]
    fn arrays_share_storage() {
        let a = StackItem::from_array(vec![StackItem::from_int(1)]);
        let b = a.clone();
        if let StackItem::Array(items) = &a {
            items.borrow_mut().push(StackItem::from_int(2));
        }
        assert_eq!(b.as_array().unwrap().len(), 2);
    }

    #[test]
    fn interop_downcast() {
        #[derive(Debug, PartialEq)]
        struct Token(u32);
        let item = StackItem::from_interface(Token(7));
        assert_eq!(item.as_interface::<Token>().unwrap().0, 7);
        assert!(item.as_interface::<String>().is_none());
    }
}
