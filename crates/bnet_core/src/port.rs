//! Named port groups.

use crate::ids::{NodeId, PortId};
use serde::{Deserialize, Serialize};

/// The direction of one port bit.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PortDir {
    /// The bit drives the network (a primary input).
    Input,
    /// The bit is driven by the network (a primary output).
    Output,
}

/// A named group of bits; each bit is a terminal node and bits may mix
/// directions.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Port {
    pub(crate) id: PortId,
    pub(crate) name: String,
    pub(crate) bits: Vec<NodeId>,
}

impl Port {
    /// Returns the port ID.
    pub fn id(&self) -> PortId {
        self.id
    }

    /// Returns the port name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of bits.
    pub fn bit_width(&self) -> usize {
        self.bits.len()
    }

    /// Returns the node carrying bit `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    pub fn bit(&self, pos: usize) -> NodeId {
        self.bits[pos]
    }

    /// Returns all bit nodes in order.
    pub fn bits(&self) -> &[NodeId] {
        &self.bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let port = Port {
            id: PortId::from_raw(3),
            name: "data".to_string(),
            bits: vec![NodeId::from_raw(1), NodeId::from_raw(2)],
        };
        assert_eq!(port.id(), PortId::from_raw(3));
        assert_eq!(port.name(), "data");
        assert_eq!(port.bit_width(), 2);
        assert_eq!(port.bit(1), NodeId::from_raw(2));
        assert_eq!(port.bits().len(), 2);
    }
}
