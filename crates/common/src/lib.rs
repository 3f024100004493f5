//! Shared helpers for the asset store binaries and crates:
//! logging setup, runtime environment checks, and small wire types.

pub mod env;
pub mod types;
pub mod utils;
