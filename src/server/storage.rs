//! Server-side document storage.
//!
//! Documents are stored one JSON file per key:
//! ```text
//! <DATA_DIR>/
//!   <collection>/
//!     apple.json
//!     oat milk.json
//! ```
//!
//! Writes go through a temp file and rename, so readers never observe a
//! partially written document.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::store::{Document, Fields};

/// Errors that can occur during server storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error reading or writing a file.
    Io(PathBuf, io::Error),
    /// A stored file is not valid JSON.
    Parse(PathBuf, String),
    /// Invalid collection or document name (e.g. contains path separators).
    InvalidName(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StorageError::Parse(path, e) => {
                write!(f, "Failed to parse document {}: {}", path.display(), e)
            }
            StorageError::InvalidName(name) => {
                write!(f, "Invalid name: {}", name)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(_, e) => Some(e),
            _ => None,
        }
    }
}

/// File-backed storage for JSON documents, one collection per directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    /// Creates a new storage instance rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Validates a collection or document name to prevent path traversal.
    fn validate_name(name: &str) -> Result<(), StorageError> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
            || name.starts_with('.')
        {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(())
    }

    /// Returns the path for a collection's directory.
    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.data_dir.join(collection)
    }

    /// Returns the full path for a document.
    fn doc_path(&self, collection: &str, key: &str) -> PathBuf {
        self.collection_dir(collection).join(format!("{}.json", key))
    }

    /// Lists every document in a collection, sorted by key.
    ///
    /// A collection that has never been written to is empty, not an error.
    /// Directory iteration order is not stable, so entries are sorted.
    pub fn list_all(&self, collection: &str) -> Result<Vec<Document>, StorageError> {
        Self::validate_name(collection)?;

        let dir = self.collection_dir(collection);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Io(dir, e)),
        };

        let mut docs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::Io(dir.clone(), e))?;
            let path = entry.path();

            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let fields = Self::read_fields(&path)?;
            docs.push(Document {
                key: key.to_string(),
                fields,
            });
        }

        docs.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(docs)
    }

    /// Loads a single document's fields.
    ///
    /// Returns `Ok(None)` if the document doesn't exist.
    pub fn load(&self, collection: &str, key: &str) -> Result<Option<Fields>, StorageError> {
        Self::validate_name(collection)?;
        Self::validate_name(key)?;

        let path = self.doc_path(collection, key);
        match fs::read(&path) {
            Ok(bytes) => {
                let fields = serde_json::from_slice(&bytes)
                    .map_err(|e| StorageError::Parse(path, e.to_string()))?;
                Ok(Some(fields))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(path, e)),
        }
    }

    /// Saves a document, creating the collection directory if needed.
    ///
    /// The write goes to a temp file first and is renamed into place
    /// (atomic on most filesystems).
    pub fn save(&self, collection: &str, key: &str, fields: &Fields) -> Result<(), StorageError> {
        Self::validate_name(collection)?;
        Self::validate_name(key)?;

        let dir = self.collection_dir(collection);
        let path = self.doc_path(collection, key);

        fs::create_dir_all(&dir).map_err(|e| StorageError::Io(dir.clone(), e))?;

        let bytes = serde_json::to_vec_pretty(fields)
            .map_err(|e| StorageError::Parse(path.clone(), e.to_string()))?;

        let temp_path = path.with_extension("json.tmp");

        let mut file =
            File::create(&temp_path).map_err(|e| StorageError::Io(temp_path.clone(), e))?;
        file.write_all(&bytes)
            .map_err(|e| StorageError::Io(temp_path.clone(), e))?;
        file.sync_all()
            .map_err(|e| StorageError::Io(temp_path.clone(), e))?;

        fs::rename(&temp_path, &path).map_err(|e| StorageError::Io(path, e))?;

        Ok(())
    }

    /// Deletes a document. Returns whether it existed.
    pub fn delete(&self, collection: &str, key: &str) -> Result<bool, StorageError> {
        Self::validate_name(collection)?;
        Self::validate_name(key)?;

        let path = self.doc_path(collection, key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(path, e)),
        }
    }

    fn read_fields(path: &Path) -> Result<Fields, StorageError> {
        let bytes = fs::read(path).map_err(|e| StorageError::Io(path.to_path_buf(), e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Parse(path.to_path_buf(), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::quantity_fields;
    use tempfile::TempDir;

    fn setup() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        (storage, temp_dir)
    }

    #[test]
    fn test_validate_name() {
        // Valid
        assert!(FileStorage::validate_name("inventory").is_ok());
        assert!(FileStorage::validate_name("oat milk").is_ok());
        assert!(FileStorage::validate_name("item_123").is_ok());

        // Invalid
        assert!(FileStorage::validate_name("").is_err());
        assert!(FileStorage::validate_name("../evil").is_err());
        assert!(FileStorage::validate_name("foo/bar").is_err());
        assert!(FileStorage::validate_name("foo\\bar").is_err());
        assert!(FileStorage::validate_name(".hidden").is_err());
    }

    #[test]
    fn test_load_nonexistent_returns_none() {
        let (storage, _temp) = setup();
        assert!(storage.load("inventory", "apple").unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (storage, _temp) = setup();

        storage
            .save("inventory", "apple", &quantity_fields(3))
            .unwrap();

        let fields = storage.load("inventory", "apple").unwrap().unwrap();
        assert_eq!(fields.get("quantity"), Some(&serde_json::json!(3)));
    }

    #[test]
    fn test_list_all_missing_collection_is_empty() {
        let (storage, _temp) = setup();
        assert!(storage.list_all("inventory").unwrap().is_empty());
    }

    #[test]
    fn test_list_all_sorted_by_key() {
        let (storage, _temp) = setup();

        storage
            .save("inventory", "banana", &quantity_fields(1))
            .unwrap();
        storage
            .save("inventory", "apple", &quantity_fields(2))
            .unwrap();

        let docs = storage.list_all("inventory").unwrap();
        let keys: Vec<&str> = docs.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["apple", "banana"]);
    }

    #[test]
    fn test_collections_are_isolated() {
        let (storage, _temp) = setup();

        storage
            .save("inventory", "apple", &quantity_fields(1))
            .unwrap();
        storage
            .save("pantry", "apple", &quantity_fields(9))
            .unwrap();

        let inv = storage.load("inventory", "apple").unwrap().unwrap();
        let pan = storage.load("pantry", "apple").unwrap().unwrap();
        assert_eq!(inv.get("quantity"), Some(&serde_json::json!(1)));
        assert_eq!(pan.get("quantity"), Some(&serde_json::json!(9)));
    }

    #[test]
    fn test_delete() {
        let (storage, _temp) = setup();

        storage
            .save("inventory", "apple", &quantity_fields(1))
            .unwrap();

        assert!(storage.delete("inventory", "apple").unwrap());
        assert!(storage.load("inventory", "apple").unwrap().is_none());

        // Second delete is a no-op.
        assert!(!storage.delete("inventory", "apple").unwrap());
    }

    #[test]
    fn test_overwrite_existing() {
        let (storage, _temp) = setup();

        storage
            .save("inventory", "apple", &quantity_fields(1))
            .unwrap();
        storage
            .save("inventory", "apple", &quantity_fields(2))
            .unwrap();

        let fields = storage.load("inventory", "apple").unwrap().unwrap();
        assert_eq!(fields.get("quantity"), Some(&serde_json::json!(2)));
    }

    #[test]
    fn test_directory_structure() {
        let (storage, temp) = setup();

        storage
            .save("inventory", "apple", &quantity_fields(1))
            .unwrap();

        assert!(temp.path().join("inventory").join("apple.json").exists());
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let (storage, temp) = setup();

        let dir = temp.path().join("inventory");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("bad.json"), b"not json").unwrap();

        assert!(matches!(
            storage.load("inventory", "bad"),
            Err(StorageError::Parse(_, _))
        ));
        assert!(matches!(
            storage.list_all("inventory"),
            Err(StorageError::Parse(_, _))
        ));
    }

    #[test]
    fn test_invalid_names_rejected() {
        let (storage, _temp) = setup();

        assert!(matches!(
            storage.load("../evil", "apple"),
            Err(StorageError::InvalidName(_))
        ));
        assert!(matches!(
            storage.save("inventory", "a/b", &quantity_fields(1)),
            Err(StorageError::InvalidName(_))
        ));
    }

    #[test]
    fn test_non_json_files_ignored_in_listing() {
        let (storage, temp) = setup();

        storage
            .save("inventory", "apple", &quantity_fields(1))
            .unwrap();
        fs::write(temp.path().join("inventory").join("notes.txt"), b"x").unwrap();

        let docs = storage.list_all("inventory").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].key, "apple");
    }
}
