//! Component instance identity.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier for one live component instance.
///
/// Minted once per instance lifetime and never reused.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Mint a fresh, globally unique id.
    pub fn mint() -> Self {
        Self(nanoid::nanoid!())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InstanceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for InstanceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId({})", self.0)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-instance mutable storage the host exposes for stashing the minted id.
///
/// `key` is the configured instance identifier, so several tools can share
/// the same instance options without clobbering each other.
pub trait InstanceSlot {
    fn get(&self, key: &str) -> Option<InstanceId>;
    fn set(&mut self, key: &str, id: InstanceId);
}

impl InstanceSlot for HashMap<String, InstanceId> {
    fn get(&self, key: &str) -> Option<InstanceId> {
        HashMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, id: InstanceId) {
        self.insert(key.to_string(), id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_ids_are_unique() {
        let a = InstanceId::mint();
        let b = InstanceId::mint();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 21);
    }

    #[test]
    fn test_map_slot_roundtrip() {
        let mut slot: HashMap<String, InstanceId> = HashMap::new();
        assert!(InstanceSlot::get(&slot, "uid").is_none());
        slot.set("uid", InstanceId::from("abc"));
        assert_eq!(InstanceSlot::get(&slot, "uid"), Some(InstanceId::from("abc")));
        assert!(InstanceSlot::get(&slot, "other").is_none());
    }
}
