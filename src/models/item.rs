use serde::{Deserialize, Serialize};
use std::fmt;

/// A single tracked item: the document key in the inventory collection
/// plus its stored quantity.
///
/// Quantity is always at least 1. An item whose quantity would reach 0 is
/// deleted from the store instead, so a zero-quantity item never exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: u64,
}

impl InventoryItem {
    pub fn new(name: impl Into<String>, quantity: u64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

impl fmt::Display for InventoryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  x{}", self.name, self.quantity)
    }
}
