//! Voice Store Port - 音色持久化出站端口
//!
//! 维护文件布局不变量:
//! 一个 VoiceId 对应 <voices_dir>/<voice_id>/ 目录，
//! 目录内包含 reference.<ext>、可选的 embedding.bin、以及 voice.json

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::voice::{Voice, VoiceId};

/// 音色存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Voice not found: {0}")]
    NotFound(String),

    #[error("Invalid sidecar: {0}")]
    InvalidSidecar(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

/// Voice Store Port
///
/// 音色目录与 voice.json sidecar 的持久化接口
#[async_trait]
pub trait VoiceStorePort: Send + Sync {
    /// 音色目录路径
    fn voice_dir(&self, id: &VoiceId) -> PathBuf;

    /// 将参考音频复制进音色目录，返回副本路径
    async fn import_reference(
        &self,
        id: &VoiceId,
        source: &Path,
    ) -> Result<PathBuf, StoreError>;

    /// 写入引擎工件（embedding 字节），返回工件路径
    async fn write_embedding(&self, id: &VoiceId, data: &[u8]) -> Result<PathBuf, StoreError>;

    /// 写入 voice.json sidecar
    async fn save(&self, voice: &Voice) -> Result<(), StoreError>;

    /// 按 ID 加载音色
    async fn load(&self, id: &VoiceId) -> Result<Voice, StoreError>;

    /// 从任意音色目录加载（目录内必须有 voice.json）
    async fn load_dir(&self, dir: &Path) -> Result<Voice, StoreError>;

    /// 列出所有音色
    async fn list(&self) -> Result<Vec<Voice>, StoreError>;

    /// 删除音色目录及其全部工件
    async fn delete(&self, id: &VoiceId) -> Result<(), StoreError>;

    /// 音色是否存在
    async fn exists(&self, id: &VoiceId) -> bool;
}
