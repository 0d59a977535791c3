//! Inventory synchronizer.
//!
//! Holds the local snapshot of the inventory collection and applies
//! increment/decrement mutations against the remote store. The snapshot is
//! a full copy of the collection as of the last successful refresh; it is
//! replaced wholesale after every mutation, never patched in place.
//!
//! Add and remove issue a read followed by a conditional write. The two
//! calls are not a transaction, so concurrent clients can lose an update
//! between them (last write wins on the quantity field). That race is an
//! accepted limitation of the store protocol, not something this module
//! mitigates.

use tokio::sync::watch;

use crate::models::InventoryItem;
use crate::store::{quantity_fields, DocumentStore, Fields, StoreError};

/// Errors from inventory operations.
#[derive(Debug)]
pub enum InventoryError {
    /// The remote store failed.
    Store(StoreError),
    /// The item name is empty or not usable as a document key.
    InvalidName(String),
    /// A stored document has no usable quantity field.
    MalformedDocument(String),
}

impl std::fmt::Display for InventoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InventoryError::Store(e) => write!(f, "{}", e),
            InventoryError::InvalidName(name) => write!(f, "Invalid item name: '{}'", name),
            InventoryError::MalformedDocument(key) => {
                write!(f, "Document '{}' has no valid quantity field", key)
            }
        }
    }
}

impl std::error::Error for InventoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InventoryError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for InventoryError {
    fn from(e: StoreError) -> Self {
        InventoryError::Store(e)
    }
}

/// Validates an item name for use as a document key.
///
/// Names are trimmed, must be non-empty, and must not contain path
/// separators or dot sequences (keys become path components server-side).
fn validate_name(name: &str) -> Result<&str, InventoryError> {
    let name = name.trim();
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.starts_with('.')
    {
        return Err(InventoryError::InvalidName(name.to_string()));
    }
    Ok(name)
}

/// Reads the quantity field out of a document.
///
/// A missing, non-integer, or zero quantity means the document was not
/// written by this protocol; surface it rather than guessing.
fn quantity_of(key: &str, fields: &Fields) -> Result<u64, InventoryError> {
    fields
        .get("quantity")
        .and_then(serde_json::Value::as_u64)
        .filter(|q| *q >= 1)
        .ok_or_else(|| InventoryError::MalformedDocument(key.to_string()))
}

/// Returns the items whose name contains `query` as a case-insensitive
/// substring, preserving their relative order.
///
/// An empty query matches everything.
pub fn filter(items: &[InventoryItem], query: &str) -> Vec<InventoryItem> {
    let query = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// The inventory synchronizer.
///
/// Owns the snapshot for one collection of one store. Mutations go through
/// [`add_item`](Inventory::add_item) / [`remove_item`](Inventory::remove_item),
/// each of which finishes with a full [`refresh`](Inventory::refresh);
/// observers receive every replacement snapshot through
/// [`subscribe`](Inventory::subscribe).
pub struct Inventory<S> {
    store: S,
    collection: String,
    snapshot: Vec<InventoryItem>,
    watch_tx: watch::Sender<Vec<InventoryItem>>,
}

impl<S: DocumentStore> Inventory<S> {
    /// Creates a synchronizer over the given store and collection.
    ///
    /// The snapshot starts empty; call [`refresh`](Inventory::refresh) to
    /// populate it.
    pub fn new(store: S, collection: impl Into<String>) -> Self {
        let (watch_tx, _) = watch::channel(Vec::new());
        Self {
            store,
            collection: collection.into(),
            snapshot: Vec::new(),
            watch_tx,
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> &[InventoryItem] {
        &self.snapshot
    }

    /// Subscribes to snapshot changes.
    ///
    /// The receiver always holds the latest published snapshot; it is only
    /// notified when a refresh produced different contents.
    pub fn subscribe(&self) -> watch::Receiver<Vec<InventoryItem>> {
        self.watch_tx.subscribe()
    }

    /// Rebuilds the snapshot from a fresh full listing of the store.
    ///
    /// On failure the prior snapshot is left untouched and no notification
    /// is sent.
    pub async fn refresh(&mut self) -> Result<(), InventoryError> {
        let docs = self.store.list_all(&self.collection).await?;

        let mut items = Vec::with_capacity(docs.len());
        for doc in docs {
            let quantity = quantity_of(&doc.key, &doc.fields)?;
            items.push(InventoryItem {
                name: doc.key,
                quantity,
            });
        }

        tracing::debug!(count = items.len(), "snapshot replaced");
        self.snapshot = items;

        // Subscribers only care when the contents differ, not about every
        // refresh round trip.
        let snapshot = &self.snapshot;
        self.watch_tx.send_if_modified(|current| {
            if *current != *snapshot {
                *current = snapshot.clone();
                true
            } else {
                false
            }
        });

        Ok(())
    }

    /// Adds one unit of `name`: creates the document with quantity 1 if
    /// absent, otherwise increments the stored quantity. Ends with a
    /// refresh.
    pub async fn add_item(&mut self, name: &str) -> Result<(), InventoryError> {
        let name = validate_name(name)?;

        let quantity = match self.store.get(&self.collection, name).await? {
            Some(fields) => quantity_of(name, &fields)? + 1,
            None => 1,
        };

        self.store
            .set(&self.collection, name, quantity_fields(quantity))
            .await?;

        self.refresh().await
    }

    /// Removes one unit of `name`: deletes the document at quantity 1,
    /// otherwise decrements. Removing an absent key is a no-op. Ends with
    /// a refresh either way.
    pub async fn remove_item(&mut self, name: &str) -> Result<(), InventoryError> {
        let name = validate_name(name)?;

        match self.store.get(&self.collection, name).await? {
            None => {}
            Some(fields) => {
                let quantity = quantity_of(name, &fields)?;
                if quantity == 1 {
                    self.store.delete(&self.collection, name).await?;
                } else {
                    self.store
                        .set(&self.collection, name, quantity_fields(quantity - 1))
                        .await?;
                }
            }
        }

        self.refresh().await
    }
}
