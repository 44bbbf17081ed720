//! Cache store implementations
//!
//! `MemoryCacheStore` keeps records for the lifetime of the process,
//! `FileCacheStore` persists them to a JSON file with atomic writes.

use super::types::CacheRecord;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Key/value store for completion records.
///
/// `put` overwrites: writing the same record twice leaves the store in
/// the same state as writing it once.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read the record stored under `key`
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>>;

    /// Store a record under its canonical key
    async fn put(&self, record: CacheRecord) -> Result<()>;

    /// Remove one record, returning whether it existed
    async fn remove(&self, key: &str) -> Result<bool>;

    /// Remove every record
    async fn clear(&self) -> Result<()>;

    /// Number of stored records
    async fn len(&self) -> Result<usize>;

    /// All stored records, ordered by key
    async fn records(&self) -> Result<Vec<CacheRecord>>;

    /// Whether the store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

fn sorted(records: &HashMap<String, CacheRecord>) -> Vec<CacheRecord> {
    let ordered: BTreeMap<_, _> = records.iter().collect();
    ordered.into_values().cloned().collect()
}

// ============================================================================
// Memory Store
// ============================================================================

/// In-memory cache store
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStore {
    records: Arc<RwLock<HashMap<String, CacheRecord>>>,
}

impl MemoryCacheStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn put(&self, record: CacheRecord) -> Result<()> {
        self.records.write().await.insert(record.store_key(), record);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.records.write().await.remove(key).is_some())
    }

    async fn clear(&self) -> Result<()> {
        self.records.write().await.clear();
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }

    async fn records(&self) -> Result<Vec<CacheRecord>> {
        Ok(sorted(&*self.records.read().await))
    }
}

// ============================================================================
// File Store
// ============================================================================

/// JSON-file cache store.
///
/// The file is loaded on open and rewritten after every mutation. Writes go
/// to a temp file first and are renamed into place. The write lock is held
/// across the save so concurrent writers never interleave.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    path: PathBuf,
    records: Arc<RwLock<HashMap<String, CacheRecord>>>,
}

impl FileCacheStore {
    /// Open a store at `path`, loading existing records if the file exists
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| Error::cache(format!("Failed to read cache file: {e}")))?;
            parse_records(&contents)?
        } else {
            HashMap::new()
        };

        debug!(path = %path.display(), records = records.len(), "Opened cache file");

        Ok(Self {
            path,
            records: Arc::new(RwLock::new(records)),
        })
    }

    /// Get the cache file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, records: &HashMap<String, CacheRecord>) -> Result<()> {
        let contents = serde_json::to_string_pretty(&sorted(records))
            .map_err(|e| Error::cache(format!("Failed to serialize cache: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::cache(format!("Failed to create cache directory: {e}")))?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::cache(format!("Failed to write cache file: {e}")))?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::cache(format!("Failed to rename cache file: {e}")))?;

        Ok(())
    }
}

fn parse_records(contents: &str) -> Result<HashMap<String, CacheRecord>> {
    if contents.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let records: Vec<CacheRecord> = serde_json::from_str(contents)
        .map_err(|e| Error::cache(format!("Failed to parse cache file: {e}")))?;
    Ok(records
        .into_iter()
        .map(|record| (record.store_key(), record))
        .collect())
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CacheRecord>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn put(&self, record: CacheRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(record.store_key(), record);
        self.save(&records).await
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut records = self.records.write().await;
        let existed = records.remove(key).is_some();
        if existed {
            self.save(&records).await?;
        }
        Ok(existed)
    }

    async fn clear(&self) -> Result<()> {
        let mut records = self.records.write().await;
        records.clear();
        self.save(&records).await
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }

    async fn records(&self) -> Result<Vec<CacheRecord>> {
        Ok(sorted(&*self.records.read().await))
    }
}
