//! Cloner Engine Port - 克隆引擎抽象
//!
//! 定义声音克隆后端的抽象接口，具体实现在 infrastructure/adapters 层。
//! 引擎不负责元数据持久化，只产出工件和音频字节。

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::voice::{EngineName, Voice};

/// 克隆引擎错误
#[derive(Debug, Error)]
pub enum ClonerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    Service(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Engine not ready: {0}")]
    NotReady(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Engine process failed: {0}")]
    Engine(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ClonerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// 音色提取请求
///
/// audio_path 指向已落入音色目录的参考音频副本
#[derive(Debug, Clone)]
pub struct ExtractRequest {
    pub audio_path: PathBuf,
    /// 参考音频对应的文本（gpt-sovits 零样本克隆必需）
    pub reference_text: Option<String>,
}

/// 音色提取产出
///
/// embedding 为引擎计算的工件字节（openvoice），
/// 为 None 时参考音频本身即工件（gpt-sovits）
#[derive(Debug, Clone, Default)]
pub struct ExtractArtifacts {
    pub embedding: Option<Vec<u8>>,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 要合成的文本内容
    pub text: String,
    /// 目标语言代码（zh / en / ja / ...）
    pub language: String,
    /// 已加载的音色记录
    pub voice: Voice,
}

/// Cloner Engine Port
///
/// 声音克隆后端的抽象接口。每个操作一次阻塞调用，
/// 无重试、无并发协调。
#[async_trait]
pub trait ClonerEnginePort: Send + Sync {
    /// 引擎标识
    fn engine_name(&self) -> EngineName;

    /// 支持的语言代码
    fn supported_languages(&self) -> &'static [&'static str];

    /// 建立就绪状态
    ///
    /// 远程引擎 ping 服务，本地引擎校验 checkpoint 文件。
    /// 失败不一定是错误（服务未启动时返回 Ok 但不就绪）。
    async fn load(&self) -> Result<(), ClonerError>;

    /// 当前是否就绪
    fn is_ready(&self) -> bool;

    /// 从参考音频产出音色工件
    async fn extract(&self, request: ExtractRequest) -> Result<ExtractArtifacts, ClonerError>;

    /// 用音色合成语音，返回音频字节
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, ClonerError>;

    /// 检查语言是否受支持
    fn check_language(&self, language: &str) -> Result<(), ClonerError> {
        if self.supported_languages().contains(&language) {
            Ok(())
        } else {
            Err(ClonerError::UnsupportedLanguage(language.to_string()))
        }
    }
}
