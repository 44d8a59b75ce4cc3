//! A set that is either an explicit list or the wildcard `*`.

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Wildcard-or-list container used for permitted methods and trusts.
/// `None` means "anything".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardContainer<T> {
    value: Option<Vec<T>>,
}

impl<T: PartialEq> WildcardContainer<T> {
    pub fn wildcard() -> Self {
        Self { value: None }
    }

    pub fn list(items: Vec<T>) -> Self {
        Self { value: Some(items) }
    }

    pub fn is_wildcard(&self) -> bool {
        self.value.is_none()
    }

    pub fn contains(&self, item: &T) -> bool {
        match &self.value {
            None => true,
            Some(items) => items.contains(item),
        }
    }

    pub fn values(&self) -> &[T] {
        self.value.as_deref().unwrap_or(&[])
    }
}

impl<T: Serialize> Serialize for WildcardContainer<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.value {
            None => serializer.serialize_str("*"),
            Some(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for WildcardContainer<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ContainerVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for ContainerVisitor<T> {
            type Value = WildcardContainer<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"*\" or an array")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                if v == "*" {
                    Ok(WildcardContainer { value: None })
                } else {
                    Err(E::custom("only \"*\" is accepted as a wildcard"))
                }
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(WildcardContainer { value: Some(items) })
            }
        }

        deserializer.deserialize_any(ContainerVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_contains_everything() {
        let c: WildcardContainer<String> = WildcardContainer::wildcard();
        assert!(c.contains(&"anything".to_string()));
    }

    #[test]
    fn list_is_exact() {
        let c = WildcardContainer::list(vec!["add".to_string()]);
        assert!(c.contains(&"add".to_string()));
        assert!(!c.contains(&"secret".to_string()));
    }

    #[test]
    fn json_forms() {
        let wild: WildcardContainer<String> = WildcardContainer::wildcard();
        assert_eq!(serde_json::to_string(&wild).unwrap(), "\"*\"");
        let parsed: WildcardContainer<String> = serde_json::from_str("\"*\"").unwrap();
        assert!(parsed.is_wildcard());

        let list = WildcardContainer::list(vec!["a".to_string()]);
        assert_eq!(serde_json::to_string(&list).unwrap(), "[\"a\"]");
        let parsed: WildcardContainer<String> = serde_json::from_str("[\"a\",\"b\"]").unwrap();
        assert_eq!(parsed.values().len(), 2);
    }
}
