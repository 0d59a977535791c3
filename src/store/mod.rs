//! Remote document store interface.
//!
//! The inventory synchronizer talks to its backing store through the
//! [`DocumentStore`] trait: per-key get/set/delete plus a full-collection
//! listing. [`HttpStore`] is the production implementation speaking to a
//! stockpile-server instance; [`MemoryStore`] backs the tests.

mod http;
mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Field map of a stored document.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A document as returned by a full-collection listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub key: String,
    pub fields: Fields,
}

/// Errors produced by document store implementations.
#[derive(Debug)]
pub enum StoreError {
    /// A read from the remote store failed.
    Read(String),
    /// A write to the remote store failed.
    Write(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Read(e) => write!(f, "Store read failed: {}", e),
            StoreError::Write(e) => write!(f, "Store write failed: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// A key-document store holding one collection per name.
///
/// The store's own consistency model governs concurrent writers; callers
/// get no transactions and no compare-and-swap, only last-write-wins on
/// whole documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists every document in a collection.
    ///
    /// The order of the returned documents is whatever the store provides.
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Fetches a single document's fields, or `None` if the key is absent.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Fields>, StoreError>;

    /// Creates or replaces a document (upsert).
    async fn set(&self, collection: &str, key: &str, fields: Fields) -> Result<(), StoreError>;

    /// Deletes a document. Deleting an absent key is not an error.
    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError>;
}

/// Builds the fields map for an inventory document.
pub fn quantity_fields(quantity: u64) -> Fields {
    let mut fields = Fields::new();
    fields.insert("quantity".to_string(), serde_json::json!(quantity));
    fields
}
