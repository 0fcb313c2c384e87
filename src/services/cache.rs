use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::domain::Program;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// In-memory cache for the provider directory
///
/// Deals are always fetched fresh because their status and worksheet drive
/// the run. The provider directory changes slowly, so directory listings are
/// kept for a short TTL instead of hitting the backend on every run.
pub struct CacheManager {
    entries: moka::future::Cache<String, Vec<u8>>,
}

impl CacheManager {
    /// Create a new cache manager
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let entries = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { entries }
    }

    /// Get a value from the cache
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.entries.get(key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in the cache
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.entries.insert(key.to_string(), bytes).await;

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Drop a single entry
    pub async fn delete(&self, key: &str) {
        self.entries.invalidate(key).await;
    }

    /// Drop everything, for directory refreshes
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.entries.entry_count(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entry_count: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a provider directory listing
    pub fn providers(program: Option<Program>, active_only: bool) -> String {
        format!(
            "providers:{}:{}",
            program.map(|p| p.as_str()).unwrap_or("all"),
            active_only
        )
    }
}
