//! Environment/runtime helpers
//!
//! Sanity checks run once at startup, before the first request touches disk.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the directory holding `data_file` exists.
///
/// A missing data file is fine (the store treats it as an empty collection),
/// but a missing parent directory would make every write fail.
pub async fn ensure_data_dir(data_file: &Path) -> anyhow::Result<()> {
    let parent = match data_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(()),
    };
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;

    if tokio::fs::metadata(data_file).await.is_err() {
        warn!(data_file = %data_file.display(), "data file not found; starting with an empty collection");
    } else {
        info!(data_file = %data_file.display(), "using existing data file");
    }
    Ok(())
}
