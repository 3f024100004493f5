use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CollectionStore, Document};
use crate::errors::ServiceError;

/// In-memory document store. Starts as `{ key: [] }`.
#[derive(Debug)]
pub struct MemoryStore {
    key: String,
    doc: RwLock<Document>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let doc = Document::empty(&key);
        Self::with_document(key, doc)
    }

    /// Seed the store with an arbitrary document.
    pub fn with_document(key: impl Into<String>, doc: Document) -> Self {
        Self { key: key.into(), doc: RwLock::new(doc), fail_writes: AtomicBool::new(false) }
    }

    /// Make every subsequent `save` fail, as a full disk would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> Document {
        self.doc.read().await.clone()
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    fn collection_key(&self) -> &str {
        &self.key
    }

    async fn load(&self) -> Result<Document, ServiceError> {
        Ok(self.doc.read().await.clone())
    }

    async fn save(&self, doc: &Document) -> Result<(), ServiceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ServiceError::Storage("memory store is read-only".into()));
        }
        *self.doc.write().await = doc.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_store_load_save() -> Result<(), anyhow::Error> {
        let store = MemoryStore::new("assets_master");
        assert_eq!(store.load().await?.into_value(), json!({"assets_master": []}));

        let mut doc = store.load().await?;
        doc.collection_or_init("assets_master")?.push(json!({"id": 1}));
        store.save(&doc).await?;
        assert_eq!(store.snapshot().await, doc);

        store.set_fail_writes(true);
        assert!(store.save(&Document::empty("assets_master")).await.is_err());
        assert_eq!(store.load().await?, doc);
        Ok(())
    }
}
