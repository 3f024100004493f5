use std::sync::Arc;

use chrono::{DateTime, Utc};
use configs::{StorageBackend, StorageConfig};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use super::domain::{self, Asset, Fields};
use crate::errors::ServiceError;
use crate::storage::{CollectionStore, Document, JsonFileStore, MemoryStore};

/// CRUD over one collection. Each call is a full load-modify-save cycle
/// against the store; mutations are serialized by a per-collection lock.
pub struct AssetService {
    store: Arc<dyn CollectionStore>,
    lock: RwLock<()>,
    propagate_write_errors: bool,
    clock: fn() -> DateTime<Utc>,
}

impl AssetService {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self { store, lock: RwLock::new(()), propagate_write_errors: false, clock: Utc::now }
    }

    /// Build the service and its store from configuration.
    pub fn from_config(cfg: &StorageConfig) -> Result<Self, ServiceError> {
        let key = cfg.key();
        let store: Arc<dyn CollectionStore> = match cfg.backend {
            StorageBackend::File => Arc::new(
                JsonFileStore::new(cfg.data_file.clone())?
                    .with_key(key)
                    .with_corrupt_policy(cfg.on_corrupt_data),
            ),
            StorageBackend::Memory => Arc::new(MemoryStore::new(key)),
        };
        Ok(Self::new(store).propagate_write_errors(cfg.propagate_write_errors))
    }

    /// When set, a failed save turns the request into an error instead of being logged and ignored.
    pub fn propagate_write_errors(mut self, on: bool) -> Self {
        self.propagate_write_errors = on;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn collection_key(&self) -> &str {
        self.store.collection_key()
    }

    /// The whole document, exactly as stored.
    pub async fn list(&self) -> Result<Document, ServiceError> {
        let _guard = self.lock.read().await;
        self.store.load().await
    }

    pub async fn create(&self, fields: Fields) -> Result<Asset, ServiceError> {
        let _guard = self.lock.write().await;
        let key = self.collection_key();
        let mut doc = self.store.load().await?;
        let items = doc.collection_or_init(key)?;

        let now = (self.clock)();
        let id = next_free_id(items, now.timestamp_millis());
        let asset = Asset::create(fields, id, now);
        items.push(asset.clone().into_value());

        self.persist(&doc).await?;
        info!(collection = %key, id, "asset created");
        Ok(asset)
    }

    /// Replace the record matching `raw_id`; fields absent from `fields` are dropped.
    pub async fn update(&self, raw_id: &str, fields: Fields) -> Result<Asset, ServiceError> {
        let _guard = self.lock.write().await;
        let key = self.collection_key();
        let mut doc = self.store.load().await?;
        let items = doc.collection_mut(key)?.ok_or_else(ServiceError::no_collection)?;

        let id = domain::parse_id(raw_id);
        let slot = items
            .iter_mut()
            .find(|record| id.is_some() && domain::record_id(record) == id)
            .ok_or_else(ServiceError::asset_not_found)?;

        let now = not_before((self.clock)(), slot.get(domain::UPDATED_AT).and_then(Value::as_str));
        let asset = Asset::replace(slot, fields, now);
        *slot = asset.clone().into_value();

        self.persist(&doc).await?;
        info!(collection = %key, id = ?id, "asset updated");
        Ok(asset)
    }

    /// Remove every record matching `raw_id`.
    pub async fn delete(&self, raw_id: &str) -> Result<(), ServiceError> {
        let _guard = self.lock.write().await;
        let key = self.collection_key();
        let mut doc = self.store.load().await?;
        let items = doc.collection_mut(key)?.ok_or_else(ServiceError::no_collection)?;

        let id = domain::parse_id(raw_id);
        let before = items.len();
        items.retain(|record| id.is_none() || domain::record_id(record) != id);
        if items.len() == before {
            return Err(ServiceError::asset_not_found());
        }
        let removed = before - items.len();

        self.persist(&doc).await?;
        info!(collection = %key, id = ?id, removed, "asset deleted");
        Ok(())
    }

    async fn persist(&self, doc: &Document) -> Result<(), ServiceError> {
        match self.store.save(doc).await {
            Ok(()) => {
                debug!(collection = %self.collection_key(), "document saved");
                Ok(())
            }
            Err(e) if self.propagate_write_errors => {
                error!(collection = %self.collection_key(), error = %e, "error writing document");
                Err(e)
            }
            Err(e) => {
                error!(collection = %self.collection_key(), error = %e, "error writing document; change not persisted");
                Ok(())
            }
        }
    }
}

/// `candidate`, bumped past any id already present in `items`.
fn next_free_id(items: &[Value], candidate: i64) -> i64 {
    let mut id = candidate.max(1);
    while items.iter().any(|record| domain::record_id(record) == Some(id)) {
        id += 1;
    }
    id
}

/// `now`, unless the previous timestamp is later (clock stepped backwards).
fn not_before(now: DateTime<Utc>, previous: Option<&str>) -> DateTime<Utc> {
    match previous.and_then(domain::parse_timestamp) {
        Some(prev) if prev > now => prev,
        _ => now,
    }
}
