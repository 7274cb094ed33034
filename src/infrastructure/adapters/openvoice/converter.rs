//! Tone Color Converter CLI - 调用外部音色转换器
//!
//! 实现 ToneColorPort trait。嵌入提取和音色转换由外部转换器进程完成，
//! 本适配器只负责进程调用和文件搬运。
//!
//! 外部 CLI 约定:
//! <program> extract-se --checkpoint-dir DIR --audio IN --output OUT.se [--vad]
//! <program> convert    --checkpoint-dir DIR --src IN.wav --src-se A.se \
//!                      --tgt-se B.se --output OUT.wav

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::application::ports::{ToneColorError, ToneColorPort};

/// 转换器 CLI 配置
#[derive(Debug, Clone)]
pub struct ConverterCliConfig {
    /// 转换器可执行程序
    pub program: String,
    /// checkpoint 目录（含 config.json 与 checkpoint.pth）
    pub checkpoint_dir: PathBuf,
}

impl Default for ConverterCliConfig {
    fn default() -> Self {
        Self {
            program: "openvoice-converter".to_string(),
            checkpoint_dir: PathBuf::from("checkpoints_v2/converter"),
        }
    }
}

/// 音色转换器 CLI 适配器
pub struct ConverterCli {
    config: ConverterCliConfig,
}

impl ConverterCli {
    pub fn new(config: ConverterCliConfig) -> Self {
        Self { config }
    }

    async fn run(&self, args: &[&str]) -> Result<(), ToneColorError> {
        let output = Command::new(&self.config.program)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                ToneColorError::ProcessFailed(format!(
                    "failed to spawn {}: {}",
                    self.config.program, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ToneColorError::ProcessFailed(format!(
                "{} exited with {}: {}",
                self.config.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl ToneColorPort for ConverterCli {
    async fn extract_se(&self, audio_path: &Path, vad: bool) -> Result<Vec<u8>, ToneColorError> {
        let out_file = tempfile::NamedTempFile::new()?;
        let out_path = out_file.path().to_path_buf();

        let checkpoint = self.config.checkpoint_dir.to_string_lossy().into_owned();
        let audio = audio_path.to_string_lossy().into_owned();
        let out = out_path.to_string_lossy().into_owned();

        let mut args = vec![
            "extract-se",
            "--checkpoint-dir",
            checkpoint.as_str(),
            "--audio",
            audio.as_str(),
            "--output",
            out.as_str(),
        ];
        if vad {
            args.push("--vad");
        }

        tracing::debug!(audio = %audio_path.display(), vad, "Extracting speaker embedding");
        self.run(&args).await?;

        let data = tokio::fs::read(&out_path).await?;
        if data.is_empty() {
            return Err(ToneColorError::InvalidOutput(format!(
                "converter wrote empty embedding for {}",
                audio_path.display()
            )));
        }
        Ok(data)
    }

    async fn convert(
        &self,
        src_audio: &Path,
        src_se: &Path,
        tgt_se: &Path,
        output_path: &Path,
    ) -> Result<(), ToneColorError> {
        let checkpoint = self.config.checkpoint_dir.to_string_lossy().into_owned();
        let src = src_audio.to_string_lossy().into_owned();
        let src_se = src_se.to_string_lossy().into_owned();
        let tgt_se = tgt_se.to_string_lossy().into_owned();
        let out = output_path.to_string_lossy().into_owned();

        tracing::debug!(
            src = %src_audio.display(),
            output = %output_path.display(),
            "Converting tone color"
        );

        self.run(&[
            "convert",
            "--checkpoint-dir",
            checkpoint.as_str(),
            "--src",
            src.as_str(),
            "--src-se",
            src_se.as_str(),
            "--tgt-se",
            tgt_se.as_str(),
            "--output",
            out.as_str(),
        ])
        .await?;

        if !output_path.exists() {
            return Err(ToneColorError::InvalidOutput(format!(
                "converter produced no output at {}",
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
    fn test_config_default() {
        let config = ConverterCliConfig::default();
        assert_eq!(config.program, "openvoice-converter");
        assert_eq!(
            config.checkpoint_dir,
            PathBuf::from("checkpoints_v2/converter")
        );
    }

    #[tokio::test]
    async fn test_missing_program_is_process_error() {
        let cli = ConverterCli::new(ConverterCliConfig {
            program: "/nonexistent/converter-binary".to_string(),
            checkpoint_dir: PathBuf::from("/tmp"),
        });
        let err = cli
            .extract_se(Path::new("/tmp/ref.wav"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ToneColorError::ProcessFailed(_)));
    }
}
