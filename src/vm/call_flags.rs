//! Permission flags limiting what an execution frame may do.
//!
//! Flags propagate by intersection down the call stack: a callee can never
//! hold a permission its caller lacks.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Represents the operations allowed while a contract frame executes.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CallFlags: u8 {
        /// No flag is set.
        const NONE = 0b0000_0000;
        /// The frame is allowed to read chain and contract state.
        const READ_STATES = 0b0000_0001;
        /// The frame is allowed to write contract state.
        const WRITE_STATES = 0b0000_0010;
        /// The frame is allowed to invoke another contract.
        const ALLOW_CALL = 0b0000_0100;
        /// The frame is allowed to publish notifications.
        const ALLOW_NOTIFY = 0b0000_1000;
    }
}

impl CallFlags {
    /// Combination of `READ_STATES` and `WRITE_STATES`.
    pub const STATES: Self = Self::READ_STATES.union(Self::WRITE_STATES);
    /// Combination of `READ_STATES` and `ALLOW_CALL`.
    pub const READ_ONLY: Self = Self::READ_STATES.union(Self::ALLOW_CALL);
    /// All available permissions.
    pub const ALL: Self = Self::STATES
        .union(Self::ALLOW_CALL)
        .union(Self::ALLOW_NOTIFY);
}

impl Serialize for CallFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for CallFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Self::from_bits(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid CallFlags value: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_narrows() {
        let caller = CallFlags::READ_ONLY;
        let requested = CallFlags::ALL;
        assert_eq!(caller & requested, CallFlags::READ_ONLY);
        assert!(!(caller & requested).contains(CallFlags::WRITE_STATES));
    }

    #[test]
    fn all_contains_every_flag() {
        for flag in [
            CallFlags::READ_STATES,
            CallFlags::WRITE_STATES,
            CallFlags::ALLOW_CALL,
            CallFlags::ALLOW_NOTIFY,
        ] {
            assert!(CallFlags::ALL.contains(flag));
        }
    }
}
