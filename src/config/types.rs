//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 当前使用的克隆引擎: gpt-sovits / openvoice / fake
    #[serde(default = "default_engine")]
    pub engine: String,

    /// GPT-SoVITS 配置
    #[serde(default)]
    pub sovits: SovitsConfig,

    /// OpenVoice 配置
    #[serde(default)]
    pub openvoice: OpenVoiceConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

fn default_engine() -> String {
    "gpt-sovits".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            sovits: SovitsConfig::default(),
            openvoice: OpenVoiceConfig::default(),
            storage: StorageConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// GPT-SoVITS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct SovitsConfig {
    /// API 服务基础 URL
    #[serde(default = "default_sovits_url")]
    pub url: String,

    /// 合成请求超时时间（秒）
    #[serde(default = "default_sovits_timeout")]
    pub timeout_secs: u64,
}

fn default_sovits_url() -> String {
    "http://127.0.0.1:9880".to_string()
}

fn default_sovits_timeout() -> u64 {
    120
}

impl Default for SovitsConfig {
    fn default() -> Self {
        Self {
            url: default_sovits_url(),
            timeout_secs: default_sovits_timeout(),
        }
    }
}

/// OpenVoice 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct OpenVoiceConfig {
    /// checkpoint 目录（含 config.json 与 checkpoint.pth）
    #[serde(default = "default_checkpoint_dir")]
    pub checkpoint_dir: PathBuf,

    /// 音色转换器可执行程序
    #[serde(default = "default_converter_program")]
    pub converter_program: String,

    /// 基础 TTS 可执行程序
    #[serde(default = "default_base_tts_program")]
    pub base_tts_program: String,
}

fn default_checkpoint_dir() -> PathBuf {
    PathBuf::from("checkpoints_v2/converter")
}

fn default_converter_program() -> String {
    "openvoice-converter".to_string()
}

fn default_base_tts_program() -> String {
    "edge-tts".to_string()
}

impl Default for OpenVoiceConfig {
    fn default() -> Self {
        Self {
            checkpoint_dir: default_checkpoint_dir(),
            converter_program: default_converter_program(),
            base_tts_program: default_base_tts_program(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 音色目录存储根目录
    #[serde(default = "default_voices_dir")]
    pub voices_dir: PathBuf,

    /// 合成音频默认输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_voices_dir() -> PathBuf {
    PathBuf::from("data/voices")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/output")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            voices_dir: default_voices_dir(),
            output_dir: default_output_dir(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
