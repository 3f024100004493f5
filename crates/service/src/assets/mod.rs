//! Asset records and the CRUD rules applied to them.

pub mod domain;
pub mod service;

pub use domain::{Asset, Fields};
pub use service::AssetService;
