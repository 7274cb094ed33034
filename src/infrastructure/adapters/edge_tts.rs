//! Edge TTS Client - 基础 TTS 引擎
//!
//! 实现 BaseTtsPort trait，调用 edge-tts 命令行生成中性语音:
//! edge-tts --voice <voice> --text <text> --write-media <out>

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use crate::application::ports::{BaseTtsError, BaseTtsPort};

/// 语言到 Edge 神经音色的映射
fn voice_for_language(language: &str) -> &'static str {
    match language {
        "zh" => "zh-CN-XiaoxiaoNeural",
        "en" => "en-US-AriaNeural",
        "ja" => "ja-JP-NanamiNeural",
        "ko" => "ko-KR-SunHiNeural",
        "fr" => "fr-FR-DeniseNeural",
        "de" => "de-DE-KatjaNeural",
        "es" => "es-ES-ElviraNeural",
        _ => "zh-CN-XiaoxiaoNeural",
    }
}

/// Edge TTS 配置
#[derive(Debug, Clone)]
pub struct EdgeTtsConfig {
    /// edge-tts 可执行程序
    pub program: String,
}

impl Default for EdgeTtsConfig {
    fn default() -> Self {
        Self {
            program: "edge-tts".to_string(),
        }
    }
}

/// Edge TTS 客户端
pub struct EdgeTtsClient {
    config: EdgeTtsConfig,
}

impl EdgeTtsClient {
    pub fn new(config: EdgeTtsConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(EdgeTtsConfig::default())
    }
}

#[async_trait]
impl BaseTtsPort for EdgeTtsClient {
    async fn speak(
        &self,
        text: &str,
        language: &str,
        output_path: &Path,
    ) -> Result<(), BaseTtsError> {
        let voice = voice_for_language(language);

        tracing::debug!(voice, text_len = text.len(), "Generating base speech");

        let output = Command::new(&self.config.program)
            .arg("--voice")
            .arg(voice)
            .arg("--text")
            .arg(text)
            .arg("--write-media")
            .arg(output_path)
            .output()
            .await
            .map_err(|e| {
                BaseTtsError::ProcessFailed(format!(
                    "failed to spawn {}: {}",
                    self.config.program, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BaseTtsError::ProcessFailed(format!(
                "{} exited with {}: {}",
                self.config.program,
                output.status,
                stderr.trim()
            )));
        }

        if !output_path.exists() {
            return Err(BaseTtsError::ProcessFailed(format!(
                "{} produced no audio at {}",
                self.config.program,
                output_path.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_map() {
        assert_eq!(voice_for_language("zh"), "zh-CN-XiaoxiaoNeural");
        assert_eq!(voice_for_language("en"), "en-US-AriaNeural");
        assert_eq!(voice_for_language("ja"), "ja-JP-NanamiNeural");
        // 未映射语言回退到中文音色
        assert_eq!(voice_for_language("ru"), "zh-CN-XiaoxiaoNeural");
    }

    #[tokio::test]
    async fn test_missing_program_is_process_error() {
        let client = EdgeTtsClient::new(EdgeTtsConfig {
            program: "/nonexistent/edge-tts-binary".to_string(),
        });
        let err = client
            .speak("hello", "en", Path::new("/tmp/out.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, BaseTtsError::ProcessFailed(_)));
    }
}
