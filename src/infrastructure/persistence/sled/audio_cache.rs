//! Sled-based LRU Audio Cache Implementation
//!
//! 未配置路径时使用临时库（进程退出即删除），与内存缓存的生命周期一致。

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::application::ports::{AudioCachePort, CacheError, CacheStats};
use crate::domain::story::StoryId;

/// Sled 缓存配置
#[derive(Debug, Clone)]
pub struct SledCacheConfig {
    /// 数据库路径，None 表示临时库
    pub db_path: Option<String>,
    /// 最大缓存大小（字节）
    pub max_size_bytes: u64,
}

impl Default for SledCacheConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            max_size_bytes: 256 * 1024 * 1024, // 256MB
        }
    }
}

/// 内部缓存条目
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InternalCacheEntry {
    audio_data: Vec<u8>,
    size_bytes: u64,
    /// 访问序号（LRU）
    last_accessed: u64,
    created_at: i64,
}

fn db_error(e: sled::Error) -> CacheError {
    CacheError::DatabaseError(e.to_string())
}

fn decode(bytes: &[u8]) -> Result<InternalCacheEntry, CacheError> {
    bincode::deserialize(bytes).map_err(|e| CacheError::SerializationError(e.to_string()))
}

fn encode(entry: &InternalCacheEntry) -> Result<Vec<u8>, CacheError> {
    bincode::serialize(entry).map_err(|e| CacheError::SerializationError(e.to_string()))
}

/// Sled 音频缓存
pub struct SledAudioCache {
    db: Db,
    max_size_bytes: u64,
    current_size: AtomicU64,
    tick: AtomicU64,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    write_lock: Mutex<()>,
}

impl SledAudioCache {
    /// 创建新的缓存实例
    pub fn new(config: &SledCacheConfig) -> Result<Self, CacheError> {
        let db = match &config.db_path {
            Some(path) => sled::open(path).map_err(db_error)?,
            None => sled::Config::new().temporary(true).open().map_err(db_error)?,
        };

        // 恢复已有条目的大小和最大访问序号
        let mut current_size = 0u64;
        let mut max_tick = 0u64;
        for item in db.iter() {
            let (_, value) = item.map_err(db_error)?;
            if let Ok(entry) = decode(&value) {
                current_size += entry.size_bytes;
                max_tick = max_tick.max(entry.last_accessed);
            }
        }

        tracing::info!(
            db_path = config.db_path.as_deref().unwrap_or("<temporary>"),
            max_size_bytes = config.max_size_bytes,
            current_size = current_size,
            "SledAudioCache initialized"
        );

        Ok(Self {
            db,
            max_size_bytes: config.max_size_bytes,
            current_size: AtomicU64::new(current_size),
            tick: AtomicU64::new(max_tick + 1),
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        })
    }

    /// 打开持久化缓存
    pub fn open<P: AsRef<Path>>(path: P, max_size_bytes: u64) -> Result<Self, CacheError> {
        let config = SledCacheConfig {
            db_path: Some(path.as_ref().to_string_lossy().to_string()),
            max_size_bytes,
        };
        Self::new(&config)
    }

    /// 临时缓存
    pub fn temporary(max_size_bytes: u64) -> Result<Self, CacheError> {
        Self::new(&SledCacheConfig {
            db_path: None,
            max_size_bytes,
        })
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn next_tick(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::Relaxed)
    }

    /// LRU 淘汰，缓存为空时返回 false
    fn evict_lru(&self) -> Result<bool, CacheError> {
        let mut oldest: Option<(sled::IVec, InternalCacheEntry)> = None;

        for item in self.db.iter() {
            let (key, value) = item.map_err(db_error)?;
            if let Ok(entry) = decode(&value) {
                let is_older = oldest
                    .as_ref()
                    .map(|(_, e)| entry.last_accessed < e.last_accessed)
                    .unwrap_or(true);

                if is_older {
                    oldest = Some((key, entry));
                }
            }
        }

        let Some((key, entry)) = oldest else {
            return Ok(false);
        };

        self.db.remove(&key).map_err(db_error)?;
        self.current_size.fetch_sub(entry.size_bytes, Ordering::Relaxed);
        tracing::debug!(size_bytes = entry.size_bytes, "LRU evicted cache entry");

        Ok(true)
    }

    /// 刷新数据库
    pub fn flush(&self) -> Result<(), CacheError> {
        self.db.flush().map_err(db_error)?;
        Ok(())
    }
}

#[async_trait]
impl AudioCachePort for SledAudioCache {
    async fn put(&self, story_id: StoryId, audio_data: Vec<u8>) -> Result<(), CacheError> {
        let size = audio_data.len() as u64;
        if size > self.max_size_bytes {
            return Err(CacheError::EntryTooLarge {
                size,
                limit: self.max_size_bytes,
            });
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let key = story_id.as_uuid().as_bytes().to_vec();

        if let Some(previous) = self.db.remove(&key).map_err(db_error)? {
            if let Ok(previous) = decode(&previous) {
                self.current_size.fetch_sub(previous.size_bytes, Ordering::Relaxed);
            }
        }

        // 淘汰以腾出空间
        while self.current_size.load(Ordering::Relaxed) + size > self.max_size_bytes {
            if !self.evict_lru()? {
                break;
            }
        }

        let entry = InternalCacheEntry {
            audio_data,
            size_bytes: size,
            last_accessed: self.next_tick(),
            created_at: Utc::now().timestamp(),
        };

        self.db.insert(key, encode(&entry)?).map_err(db_error)?;
        self.current_size.fetch_add(size, Ordering::Relaxed);

        tracing::debug!(story_id = %story_id, size_bytes = size, "Audio cached");

        Ok(())
    }

    async fn get(&self, story_id: StoryId) -> Result<Option<Vec<u8>>, CacheError> {
        let key = story_id.as_uuid().as_bytes().to_vec();

        match self.db.get(&key).map_err(db_error)? {
            Some(data) => {
                let mut entry = decode(&data)?;

                // LRU touch；条目在此期间被删除时不重新写回
                entry.last_accessed = self.next_tick();
                let _ = self
                    .db
                    .compare_and_swap(&key, Some(data), Some(encode(&entry)?))
                    .map_err(db_error)?;

                self.hit_count.fetch_add(1, Ordering::Relaxed);
                Ok(Some(entry.audio_data))
            }
            None => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn remove(&self, story_id: StoryId) -> Result<bool, CacheError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let key = story_id.as_uuid().as_bytes().to_vec();

        match self.db.remove(&key).map_err(db_error)? {
            Some(data) => {
                if let Ok(entry) = decode(&data) {
                    self.current_size.fetch_sub(entry.size_bytes, Ordering::Relaxed);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.db.len(),
            total_size_bytes: self.current_size.load(Ordering::Relaxed),
            max_size_bytes: self.max_size_bytes,
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
        }
    }
}
