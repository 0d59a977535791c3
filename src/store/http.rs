//! HTTP document store client.
//!
//! Speaks the stockpile-server REST protocol: JSON documents addressed by
//! `/collections/{collection}/documents/{key}`. Read failures and write
//! failures are mapped onto the two `StoreError` variants so callers never
//! see transport details.

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{Document, DocumentStore, Fields, StoreError};

/// Document store client backed by a stockpile-server instance.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStore {
    /// Creates a client for the given server URL.
    ///
    /// A bare `host:port` is treated as `http://host:port`.
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url = server_url.into();
        let base_url = if server_url.starts_with("http://") || server_url.starts_with("https://") {
            server_url
        } else {
            format!("http://{}", server_url)
        };

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Returns the server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a collection's document listing.
    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/collections/{}/documents",
            self.base_url,
            urlencoding::encode(collection)
        )
    }

    /// URL of a single document.
    fn document_url(&self, collection: &str, key: &str) -> String {
        format!(
            "{}/collections/{}/documents/{}",
            self.base_url,
            urlencoding::encode(collection),
            urlencoding::encode(key)
        )
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let url = self.collection_url(collection);
        tracing::debug!(%url, "listing collection");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Read(format!(
                "server returned status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Fields>, StoreError> {
        let url = self.document_url(collection, key);
        tracing::debug!(%url, "fetching document");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(StoreError::Read(format!(
                "server returned status {}",
                response.status()
            )));
        }

        let fields = response
            .json()
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;

        Ok(Some(fields))
    }

    async fn set(&self, collection: &str, key: &str, fields: Fields) -> Result<(), StoreError> {
        let url = self.document_url(collection, key);
        tracing::debug!(%url, "writing document");

        let response = self
            .client
            .put(&url)
            .json(&fields)
            .send()
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Write(format!(
                "server returned status {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let url = self.document_url(collection, key);
        tracing::debug!(%url, "deleting document");

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;

        // Deleting an absent document is a no-op, not an error.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        if !response.status().is_success() {
            return Err(StoreError::Write(format!(
                "server returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}
