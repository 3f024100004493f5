use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;

/// Default size limit for request bodies (50 MB).
pub const DEFAULT_BODY_LIMIT: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(4),
            body_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 3000 }
fn default_body_limit() -> usize { DEFAULT_BODY_LIMIT }

/// Which `CollectionStore` implementation backs the service.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

/// What to do when the data file exists but cannot be read or parsed.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OnCorruptData {
    /// Log the problem and serve an empty collection.
    #[default]
    ResetToEmpty,
    /// Surface a storage error to the caller.
    Fail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Key of the collection inside the document; derived from `data_file` when unset.
    #[serde(default)]
    pub collection_key: Option<String>,
    #[serde(default)]
    pub on_corrupt_data: OnCorruptData,
    #[serde(default)]
    pub propagate_write_errors: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_file: default_data_file(),
            collection_key: None,
            on_corrupt_data: OnCorruptData::default(),
            propagate_write_errors: false,
        }
    }
}

fn default_data_file() -> PathBuf { PathBuf::from("assets_master.json") }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_log_format() -> String { "compact".into() }

/// Collection key implied by a data file path: its file name without extension.
pub fn collection_key_for(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

/// Parse `path` as TOML. A missing file yields the defaults; a malformed one is an error.
pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => return Err(anyhow!("cannot read config {path}: {e}")),
    };
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env_overrides(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply `PORT`, `SERVER_HOST`, `ASSETS_FILE` and `TOKIO_WORKER_THREADS`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(file) = lookup("ASSETS_FILE").filter(|f| !f.trim().is_empty()) {
            self.storage.data_file = PathBuf::from(file);
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.normalize()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.body_limit_bytes == 0 {
            return Err(anyhow!("server.body_limit_bytes must be positive"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(anyhow!("storage.data_file must not be empty"));
        }
        let key = match self.collection_key.take().filter(|k| !k.trim().is_empty()) {
            Some(k) => k,
            None => collection_key_for(&self.data_file)
                .ok_or_else(|| anyhow!("cannot derive a collection key from {}", self.data_file.display()))?,
        };
        self.collection_key = Some(key);
        Ok(())
    }

    /// Collection key after normalization.
    pub fn key(&self) -> String {
        self.collection_key
            .clone()
            .or_else(|| collection_key_for(&self.data_file))
            .unwrap_or_else(|| "assets_master".to_string())
    }
}
