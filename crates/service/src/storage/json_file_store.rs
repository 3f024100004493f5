use std::path::{Path, PathBuf};

use async_trait::async_trait;
use configs::OnCorruptData;
use serde_json::Value;
use tokio::fs;
use tracing::{error, warn};

use super::{CollectionStore, Document};
use crate::errors::ServiceError;

/// JSON file-backed document store.
///
/// Every `load` reads and parses the whole file and every `save` rewrites it
/// with a single write. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    file_path: PathBuf,
    key: String,
    on_corrupt: OnCorruptData,
}

impl JsonFileStore {
    /// Store for `path`, keyed by the file name without its extension.
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let file_path = path.into();
        let key = configs::collection_key_for(&file_path).ok_or_else(|| {
            ServiceError::Validation(format!("cannot derive a collection key from {}", file_path.display()))
        })?;
        Ok(Self { file_path, key, on_corrupt: OnCorruptData::default() })
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_corrupt_policy(mut self, policy: OnCorruptData) -> Self {
        self.on_corrupt = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn recover(&self, reason: String) -> Result<Document, ServiceError> {
        match self.on_corrupt {
            OnCorruptData::ResetToEmpty => {
                error!(file = %self.file_path.display(), %reason, "error reading file; serving empty collection");
                Ok(Document::empty(&self.key))
            }
            OnCorruptData::Fail => {
                error!(file = %self.file_path.display(), %reason, "error reading file");
                Err(ServiceError::Storage(format!("{}: {reason}", self.file_path.display())))
            }
        }
    }
}

#[async_trait]
impl CollectionStore for JsonFileStore {
    fn collection_key(&self) -> &str {
        &self.key
    }

    async fn load(&self) -> Result<Document, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(file = %self.file_path.display(), "data file missing; treating as empty collection");
                return Ok(Document::empty(&self.key));
            }
            Err(e) => return self.recover(format!("read failed: {e}")),
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => Document::from_value(value, &self.key)
                .or_else(|other| self.recover(format!("top-level value is not an object or array: {other}"))),
            Err(e) => self.recover(format!("invalid JSON: {e}")),
        }
    }

    async fn save(&self, doc: &Document) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(doc).map_err(|e| ServiceError::storage("serialize", e))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::storage(&self.file_path.display().to_string(), e))
    }
}
