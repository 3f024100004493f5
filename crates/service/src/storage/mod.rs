//! Storage abstractions for the service layer
//!
//! A `CollectionStore` loads and saves one whole `Document` at a time. The
//! service never keeps records in memory between calls, so swapping the
//! file-backed store for the in-memory one changes nothing above this seam.

pub mod document;
pub mod json_file_store;
pub mod memory_store;

use async_trait::async_trait;

use crate::errors::ServiceError;

pub use document::Document;
pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;

/// Load/save access to the document holding a single named collection.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Key under which the collection lives inside the document.
    fn collection_key(&self) -> &str;

    /// Read the full document.
    async fn load(&self) -> Result<Document, ServiceError>;

    /// Replace the full document.
    async fn save(&self, doc: &Document) -> Result<(), ServiceError>;
}
