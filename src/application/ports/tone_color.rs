//! Tone Color Port - 音色转换器抽象
//!
//! 包装外部音色转换模型的两个能力:
//! - 说话人嵌入提取 (speaker embedding)
//! - 音色转换 (tone color conversion)
//!
//! 模型推理完全由外部协作方完成，本端口只搬运路径和字节。

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 音色转换错误
#[derive(Debug, Error)]
pub enum ToneColorError {
    #[error("Converter process failed: {0}")]
    ProcessFailed(String),

    #[error("Invalid converter output: {0}")]
    InvalidOutput(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ToneColorError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

/// Tone Color Port
#[async_trait]
pub trait ToneColorPort: Send + Sync {
    /// 从音频提取说话人嵌入，返回嵌入字节
    ///
    /// vad: 参考音频开启语音活动检测，基础 TTS 产物关闭
    async fn extract_se(&self, audio_path: &Path, vad: bool) -> Result<Vec<u8>, ToneColorError>;

    /// 将 src_audio 的音色从 src_se 转换为 tgt_se，写入 output_path
    async fn convert(
        &self,
        src_audio: &Path,
        src_se: &Path,
        tgt_se: &Path,
        output_path: &Path,
    ) -> Result<(), ToneColorError>;
}
