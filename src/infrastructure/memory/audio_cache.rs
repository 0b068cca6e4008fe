//! In-Memory LRU Audio Cache
//!
//! DashMap 存储 story_id -> 音频字节，按访问序号做 LRU 淘汰，总字节数受上限约束。

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::application::ports::{AudioCachePort, CacheError, CacheStats};
use crate::domain::story::StoryId;

#[derive(Debug, Clone)]
struct CacheEntry {
    audio_data: Arc<Vec<u8>>,
    last_accessed: u64,
}

/// 内存音频缓存
pub struct InMemoryAudioCache {
    entries: DashMap<StoryId, CacheEntry>,
    max_size_bytes: u64,
    current_size: AtomicU64,
    /// 单调递增的访问序号
    tick: AtomicU64,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    /// 串行化写入，保证容量统计一致
    write_lock: Mutex<()>,
}

impl InMemoryAudioCache {
    pub fn new(max_size_bytes: u64) -> Self {
        tracing::info!(max_size_bytes, "InMemoryAudioCache initialized");

        Self {
            entries: DashMap::new(),
            max_size_bytes,
            current_size: AtomicU64::new(0),
            tick: AtomicU64::new(0),
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn next_tick(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::Relaxed)
    }

    /// 淘汰最久未访问的条目（跳过 `keep`），没有可淘汰条目时返回 false
    fn evict_lru(&self, keep: &StoryId) -> bool {
        let oldest = self
            .entries
            .iter()
            .filter(|entry| entry.key() != keep)
            .min_by_key(|entry| entry.value().last_accessed)
            .map(|entry| *entry.key());

        match oldest.and_then(|story_id| self.entries.remove(&story_id)) {
            Some((story_id, entry)) => {
                let size = entry.audio_data.len() as u64;
                self.current_size.fetch_sub(size, Ordering::Relaxed);
                tracing::debug!(story_id = %story_id, size_bytes = size, "LRU evicted cache entry");
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl AudioCachePort for InMemoryAudioCache {
    async fn put(&self, story_id: StoryId, audio_data: Vec<u8>) -> Result<(), CacheError> {
        let size = audio_data.len() as u64;
        if size > self.max_size_bytes {
            return Err(CacheError::EntryTooLarge {
                size,
                limit: self.max_size_bytes,
            });
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        // 旧条目保留到替换完成，读者不会看到空窗
        let replaced = self
            .entries
            .get(&story_id)
            .map(|entry| entry.audio_data.len() as u64)
            .unwrap_or(0);

        while self.current_size.load(Ordering::Relaxed) - replaced + size > self.max_size_bytes {
            if !self.evict_lru(&story_id) {
                break;
            }
        }

        let previous = self.entries.insert(
            story_id,
            CacheEntry {
                audio_data: Arc::new(audio_data),
                last_accessed: self.next_tick(),
            },
        );
        self.current_size.fetch_add(size, Ordering::Relaxed);
        if let Some(previous) = previous {
            self.current_size
                .fetch_sub(previous.audio_data.len() as u64, Ordering::Relaxed);
        }

        tracing::debug!(story_id = %story_id, size_bytes = size, "Audio cached");

        Ok(())
    }

    async fn get(&self, story_id: StoryId) -> Result<Option<Vec<u8>>, CacheError> {
        match self.entries.get_mut(&story_id) {
            Some(mut entry) => {
                entry.last_accessed = self.next_tick();
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                Ok(Some(entry.audio_data.as_ref().clone()))
            }
            None => {
                self.miss_count.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    async fn remove(&self, story_id: StoryId) -> Result<bool, CacheError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        match self.entries.remove(&story_id) {
            Some((_, entry)) => {
                self.current_size
                    .fetch_sub(entry.audio_data.len() as u64, Ordering::Relaxed);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            total_size_bytes: self.current_size.load(Ordering::Relaxed),
            max_size_bytes: self.max_size_bytes,
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
        }
    }
}
