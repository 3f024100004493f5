use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// The backing store could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),
    /// The document was readable but the collection has the wrong shape.
    #[error("corrupt collection: {0}")]
    Corrupt(String),
}

impl ServiceError {
    /// The document has no collection under the configured key.
    pub fn no_collection() -> Self { Self::NotFound("No assets found".into()) }

    /// The collection exists but holds no record with the requested id.
    pub fn asset_not_found() -> Self { Self::NotFound("Asset not found".into()) }

    pub fn storage(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Storage(format!("{context}: {err}"))
    }
}
