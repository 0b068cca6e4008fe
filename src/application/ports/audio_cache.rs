//! Audio Cache Port - 音频缓存管理
//!
//! story_id -> 音频字节 的进程级缓存，具体实现有内存 LRU 和 Sled LRU 两种。
//! 缓存未命中时由调用方重新合成（read-through），见 [`AudioCacheExt::get_or_compute`]。

use async_trait::async_trait;
use std::future::Future;
use thiserror::Error;

use crate::domain::story::StoryId;

/// Audio Cache 错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Entry of {size} bytes exceeds cache limit of {limit} bytes")]
    EntryTooLarge { size: u64, limit: u64 },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// 缓存统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub total_size_bytes: u64,
    pub max_size_bytes: u64,
    pub hit_count: u64,
    pub miss_count: u64,
}

/// Audio Cache Port
///
/// - 写入是单次原子插入，读者不会看到写了一半的条目
/// - 超出容量时按最近访问时间淘汰（LRU）
#[async_trait]
pub trait AudioCachePort: Send + Sync {
    /// 存储音频数据
    async fn put(&self, story_id: StoryId, audio_data: Vec<u8>) -> Result<(), CacheError>;

    /// 获取音频数据，同时更新访问时间（LRU touch）
    async fn get(&self, story_id: StoryId) -> Result<Option<Vec<u8>>, CacheError>;

    /// 删除缓存条目，返回是否存在
    async fn remove(&self, story_id: StoryId) -> Result<bool, CacheError>;

    /// 获取缓存统计信息
    async fn stats(&self) -> CacheStats;
}

/// read-through 扩展
#[async_trait]
pub trait AudioCacheExt: AudioCachePort {
    /// 命中直接返回；未命中时执行 `compute`，成功结果写入缓存后返回。
    /// `compute` 失败时不写缓存，错误原样返回；写缓存失败只记录日志。
    async fn get_or_compute<F, Fut, E>(&self, story_id: StoryId, compute: F) -> Result<Vec<u8>, E>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Vec<u8>, E>> + Send,
        E: From<CacheError> + Send,
    {
        if let Some(audio) = self.get(story_id).await? {
            return Ok(audio);
        }

        let audio = compute().await?;
        if let Err(e) = self.put(story_id, audio.clone()).await {
            tracing::warn!(story_id = %story_id, error = %e, "Failed to cache computed audio");
        }
        Ok(audio)
    }
}

impl<T: AudioCachePort + ?Sized> AudioCacheExt for T {}
