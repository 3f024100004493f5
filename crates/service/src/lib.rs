//! Service layer for the asset store.
//! - `storage` owns persistence behind the `CollectionStore` seam.
//! - `assets` holds the CRUD rules applied on top of a store.
//! - Errors are reported through `errors::ServiceError`.

pub mod errors;
pub mod storage;
pub mod assets;
