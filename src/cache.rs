//! Composite score caching keyed by content digest
//!
//! Scoring the same text with the same weights is deterministic, so results
//! are cached under a SHA256 digest of the engine version, the text, and the
//! weight vector. Entries expire after a TTL; expired entries behave exactly
//! like misses.

use crate::{CompositeScore, ScoringWeights, ENGINE_VERSION};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

const CACHE_VERSION: u32 = 1;
const CACHE_FILENAME: &str = ".prosemeter-cache.json";

/// Compute the cache key for a text/weights pair.
///
/// The engine version participates so that heuristic changes invalidate old
/// entries. Weights are formatted with fixed precision so that `20.0` and
/// `20.00` hash identically.
pub fn cache_key(text: &str, weights: &ScoringWeights) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ENGINE_VERSION.to_le_bytes());
    hasher.update(text.as_bytes());
    hasher.update(
        format!(
            "{:.4}:{:.4}:{:.4}:{:.4}:{:.4}",
            weights.readability,
            weights.writing_quality,
            weights.seo,
            weights.english_proficiency,
            weights.ai_detection
        )
        .as_bytes(),
    );
    hex::encode(hasher.finalize())
}

/// Storage backend for composite scores.
///
/// `get` must never fail visibly; a backend that cannot answer returns `None`.
/// `set` may fail, and callers are expected to log and move on.
pub trait ScoreCache: Send + Sync {
    fn get(&self, key: &str) -> Option<CompositeScore>;
    fn set(&self, key: &str, score: &CompositeScore, ttl: Duration) -> Result<()>;
}

/// In-process cache with per-entry deadlines. Expired entries are pruned on
/// access.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (CompositeScore, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScoreCache for MemoryCache {
    fn get(&self, key: &str) -> Option<CompositeScore> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        entries.retain(|_, (_, deadline)| *deadline > now);
        entries.get(key).map(|(score, _)| score.clone())
    }

    fn set(&self, key: &str, score: &CompositeScore, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), (score.clone(), Instant::now() + ttl));
        Ok(())
    }
}

/// Cache that never stores anything; used when caching is turned off.
pub struct NullCache;

impl ScoreCache for NullCache {
    fn get(&self, _key: &str) -> Option<CompositeScore> {
        None
    }

    fn set(&self, _key: &str, _score: &CompositeScore, _ttl: Duration) -> Result<()> {
        Ok(())
    }
}

/// Entry persisted to the cache file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileCacheEntry {
    score: CompositeScore,
    /// Unix timestamp when the entry was written
    cached_at: i64,
    ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileCacheData {
    version: u32,
    entries: HashMap<String, FileCacheEntry>,
}

impl Default for FileCacheData {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION,
            entries: HashMap::new(),
        }
    }
}

struct FileCacheInner {
    data: FileCacheData,
    dirty: bool,
}

/// JSON-file-backed cache. Writes through on every `set`; a corrupt or
/// version-mismatched file on disk is treated as empty.
pub struct FileCache {
    cache_path: PathBuf,
    inner: Mutex<FileCacheInner>,
    enabled: bool,
}

impl FileCache {
    pub fn new(cache_dir: &Path) -> Self {
        let cache_path = cache_dir.join(CACHE_FILENAME);
        let data = Self::load(&cache_path).unwrap_or_default();

        Self {
            cache_path,
            inner: Mutex::new(FileCacheInner { data, dirty: false }),
            enabled: true,
        }
    }

    /// A no-op file cache
    pub fn disabled() -> Self {
        Self {
            cache_path: PathBuf::new(),
            inner: Mutex::new(FileCacheInner {
                data: FileCacheData::default(),
                dirty: false,
            }),
            enabled: false,
        }
    }

    fn load(path: &Path) -> Option<FileCacheData> {
        let content = fs::read_to_string(path).ok()?;
        let data: FileCacheData = serde_json::from_str(&content).ok()?;

        if data.version != CACHE_VERSION {
            return None;
        }

        Some(data)
    }

    fn save_locked(&self, inner: &mut FileCacheInner) -> Result<()> {
        if !self.enabled || !inner.dirty {
            return Ok(());
        }

        let content =
            serde_json::to_string_pretty(&inner.data).context("Failed to serialize cache")?;
        fs::write(&self.cache_path, content)
            .with_context(|| format!("Failed to write cache to {}", self.cache_path.display()))?;
        inner.dirty = false;

        Ok(())
    }

    /// Flush pending writes to disk.
    pub fn save(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        self.save_locked(&mut inner)
    }

    /// Drop entries whose TTL has elapsed.
    pub fn prune_expired(&self) {
        if !self.enabled {
            return;
        }
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let now = chrono::Utc::now().timestamp();
        let before = inner.data.entries.len();
        inner
            .data
            .entries
            .retain(|_, e| now - e.cached_at < e.ttl_secs as i64);
        if inner.data.entries.len() != before {
            inner.dirty = true;
        }
    }

    pub fn entry_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .data
            .entries
            .len()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.data.entries.clear();
        inner.dirty = true;
    }
}

impl ScoreCache for FileCache {
    fn get(&self, key: &str) -> Option<CompositeScore> {
        if !self.enabled {
            return None;
        }

        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = inner.data.entries.get(key)?;

        let age = chrono::Utc::now().timestamp() - entry.cached_at;
        if age >= entry.ttl_secs as i64 {
            return None;
        }

        Some(entry.score.clone())
    }

    fn set(&self, key: &str, score: &CompositeScore, ttl: Duration) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.data.entries.insert(
            key.to_string(),
            FileCacheEntry {
                score: score.clone(),
                cached_at: chrono::Utc::now().timestamp(),
                ttl_secs: ttl.as_secs(),
            },
        );
        inner.dirty = true;
        self.save_locked(&mut inner)
    }
}
