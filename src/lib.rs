//! Stockpile
//!
//! An inventory tracker whose state lives in a remote document store. The
//! synchronizer in [`inventory`] keeps a local snapshot mirroring one
//! collection of the store and applies add/remove mutations to both; the
//! [`store`] module defines the store boundary and its HTTP client, and
//! [`server`] is the matching document store served by the
//! `stockpile-server` binary.

pub mod commands;
pub mod config;
pub mod inventory;
pub mod models;
pub mod server;
pub mod store;

pub use config::{Config, ConfigError};
pub use inventory::{filter, Inventory, InventoryError};
pub use models::InventoryItem;
pub use store::{Document, DocumentStore, HttpStore, MemoryStore, StoreError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
