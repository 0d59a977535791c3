//! Server-side modules for the stockpile document store.

pub mod routes;
pub mod storage;

pub use routes::router;
pub use storage::{FileStorage, StorageError};
