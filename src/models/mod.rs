mod item;

pub use item::InventoryItem;
