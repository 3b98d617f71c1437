//! Opaque ID newtypes for network entities.
//!
//! Each ID is a thin `u32` wrapper. IDs are assigned by the owning
//! [`Network`](crate::Network) and stay stable for its lifetime; they are
//! never reused.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a node. Raw value 0 is the null sentinel;
    /// live nodes are numbered from 1.
    NodeId
);

define_id!(
    /// Opaque, copyable ID for a DFF or latch.
    DffId
);

define_id!(
    /// Opaque, copyable ID for a port.
    PortId
);

define_id!(
    /// Opaque, copyable ID for an entry in the expression pool.
    ExprId
);

define_id!(
    /// Opaque, copyable ID for an entry in the truth-table pool.
    FuncId
);

impl NodeId {
    /// The "absent" sentinel: never refers to a live node.
    pub const NULL: NodeId = NodeId(0);

    /// Returns `true` for the null sentinel.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn null_sentinel() {
        assert!(NodeId::NULL.is_null());
        assert!(!NodeId::from_raw(1).is_null());
    }

    #[test]
    fn id_equality() {
        let a = NodeId::from_raw(7);
        let b = NodeId::from_raw(7);
        let c = NodeId::from_raw(8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(DffId::from_raw(1));
        set.insert(DffId::from_raw(2));
        set.insert(DffId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = PortId::from_raw(99);
        let json = serde_json::to_string(&id).unwrap();
        let restored: PortId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }

    #[test]
    fn all_id_types_construct() {
        let _ = NodeId::from_raw(1);
        let _ = DffId::from_raw(0);
        let _ = PortId::from_raw(0);
        let _ = ExprId::from_raw(0);
        let _ = FuncId::from_raw(0);
    }
}
