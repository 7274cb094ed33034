//! Base TTS Port - 基础 TTS 引擎抽象
//!
//! 音色转换链（openvoice）先用基础 TTS 生成中性语音，
//! 再转换为目标音色。基础 TTS 是外部协作方。

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 基础 TTS 错误
#[derive(Debug, Error)]
pub enum BaseTtsError {
    #[error("Base TTS process failed: {0}")]
    ProcessFailed(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for BaseTtsError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

/// Base TTS Port
#[async_trait]
pub trait BaseTtsPort: Send + Sync {
    /// 合成中性语音并写入 output_path
    async fn speak(&self, text: &str, language: &str, output_path: &Path)
        -> Result<(), BaseTtsError>;
}
