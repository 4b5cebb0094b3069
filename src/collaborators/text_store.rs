//! Remote text store contract and the client-side cache in front of it.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::TextStoreError;

/// One user's annotation text.
///
/// Example JSON:
/// ```json
/// { "username": "ana", "text": "hello", "position": [0.2, 1.0, 0.0] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    pub username: String,
    pub text: String,
    /// Placement relative to the anchor; laid out automatically when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f32; 3]>,
}

impl TextRecord {
    pub fn new(username: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            text: text.into(),
            position: None,
        }
    }
}

/// Bulk access to the text records of every user.
pub trait TextSource: Send + Sync {
    fn fetch_all_text(&self) -> Result<Vec<TextRecord>, TextStoreError>;
}

/// Fetches records from an HTTP endpoint returning a JSON array of [`TextRecord`].
pub struct HttpTextSource {
    url: String,
}

impl HttpTextSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl TextSource for HttpTextSource {
    fn fetch_all_text(&self) -> Result<Vec<TextRecord>, TextStoreError> {
        let response = ureq::get(&self.url)
            .set("User-Agent", "anchornotes-text-store")
            .call()
            .map_err(|e| TextStoreError::Request(e.to_string()))?;

        response
            .into_json::<Vec<TextRecord>>()
            .map_err(|e| TextStoreError::Decode(e.to_string()))
    }
}

/// Reads records from a local JSON file. A missing file means no records.
pub struct FileTextSource {
    path: PathBuf,
}

impl FileTextSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TextSource for FileTextSource {
    fn fetch_all_text(&self) -> Result<Vec<TextRecord>, TextStoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let json = std::fs::read_to_string(&self.path)
            .map_err(|e| TextStoreError::Request(format!("{:?}: {}", self.path, e)))?;
        serde_json::from_str(&json).map_err(|e| TextStoreError::Decode(e.to_string()))
    }
}

/// Lazily caches the bulk fetch so per-user lookups hit the source once.
///
/// A failed fetch is not cached; the next lookup tries again.
pub struct TextStoreClient {
    source: Arc<dyn TextSource>,
    cache: Mutex<Option<Arc<Vec<TextRecord>>>>,
}

impl TextStoreClient {
    pub fn new(source: Arc<dyn TextSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(None),
        }
    }

    /// All records, fetching them on first use.
    pub fn all_text(&self) -> Result<Arc<Vec<TextRecord>>, TextStoreError> {
        // Holding the lock across the fetch keeps concurrent cold lookups to one request
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(records) = cache.as_ref() {
            return Ok(records.clone());
        }

        let records = Arc::new(self.source.fetch_all_text()?);
        debug!("Cached {} text records", records.len());
        *cache = Some(records.clone());
        Ok(records)
    }

    pub fn get_user_text(&self, username: &str) -> Result<Option<String>, TextStoreError> {
        let records = self.all_text()?;
        Ok(records
            .iter()
            .find(|record| record.username == username)
            .map(|record| record.text.clone()))
    }

    /// Drop the cached records so the next lookup refetches.
    pub fn invalidate(&self) {
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *cache = None;
    }
}

/// Resource handle to the cached text store, supplied by the host.
#[derive(Resource, Clone)]
pub struct TextStore(pub Arc<TextStoreClient>);

impl TextStore {
    pub fn new(source: impl TextSource + 'static) -> Self {
        Self(Arc::new(TextStoreClient::new(Arc::new(source))))
    }
}
