//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;
use crate::domain::voice::EngineName;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `REVOICE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `REVOICE_ENGINE=openvoice`
/// - `REVOICE_SOVITS__URL=http://tts-server:9880`
/// - `REVOICE_STORAGE__VOICES_DIR=/data/voices`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("engine", "gpt-sovits")?
        .set_default("sovits.url", "http://127.0.0.1:9880")?
        .set_default("sovits.timeout_secs", 120)?
        .set_default("openvoice.checkpoint_dir", "checkpoints_v2/converter")?
        .set_default("openvoice.converter_program", "openvoice-converter")?
        .set_default("openvoice.base_tts_program", "edge-tts")?
        .set_default("storage.voices_dir", "data/voices")?
        .set_default("storage.output_dir", "data/output")?
        .set_default("log.level", "info")?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: REVOICE_
    // 层级分隔符: __ (双下划线)
    builder = builder.add_source(
        Environment::with_prefix("REVOICE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证引擎标识
    if EngineName::parse(&config.engine).is_none() {
        return Err(ConfigError::ValidationError(format!(
            "Unknown engine: {} (expected gpt-sovits / openvoice / fake)",
            config.engine
        )));
    }

    // 验证 GPT-SoVITS URL
    if config.sovits.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "GPT-SoVITS URL cannot be empty".to_string(),
        ));
    }

    if config.sovits.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "GPT-SoVITS timeout cannot be 0".to_string(),
        ));
    }

    // 验证存储目录
    if config.storage.voices_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Voices directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Engine: {}", config.engine);
    tracing::info!("GPT-SoVITS URL: {}", config.sovits.url);
    tracing::info!("GPT-SoVITS Timeout: {}s", config.sovits.timeout_secs);
    tracing::info!("OpenVoice Checkpoints: {:?}", config.openvoice.checkpoint_dir);
    tracing::info!("Voices Directory: {:?}", config.storage.voices_dir);
    tracing::info!("Output Directory: {:?}", config.storage.output_dir);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_unknown_engine() {
        let mut config = AppConfig::default();
        config.engine = "espnet".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_sovits_url() {
        let mut config = AppConfig::default();
        config.sovits.url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.sovits.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
