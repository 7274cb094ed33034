//! OpenVoice Engine - 本地音色转换链
//!
//! 实现 ClonerEnginePort trait。工作流程:
//! 1. extract: 从参考音频提取说话人嵌入
//! 2. synthesize: 基础 TTS 生成中性语音 -> 提取源嵌入 -> 转换为目标音色
//!
//! 推理全部委托给 ToneColorPort / BaseTtsPort 背后的外部协作方，
//! 本引擎只做 checkpoint 校验、临时文件流转和字节搬运。

use async_trait::async_trait;
use serde_json::{json, Map};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::application::ports::{
    BaseTtsPort, ClonerEnginePort, ClonerError, ExtractArtifacts, ExtractRequest,
    SynthesisRequest, ToneColorPort,
};
use crate::domain::voice::EngineName;

/// OpenVoice 引擎配置
#[derive(Debug, Clone)]
pub struct OpenVoiceEngineConfig {
    /// checkpoint 目录（含 config.json 与 checkpoint.pth）
    pub checkpoint_dir: PathBuf,
}

impl Default for OpenVoiceEngineConfig {
    fn default() -> Self {
        Self {
            checkpoint_dir: PathBuf::from("checkpoints_v2/converter"),
        }
    }
}

/// OpenVoice 引擎
pub struct OpenVoiceEngine {
    config: OpenVoiceEngineConfig,
    tone_color: Arc<dyn ToneColorPort>,
    base_tts: Arc<dyn BaseTtsPort>,
    ready: AtomicBool,
}

impl OpenVoiceEngine {
    pub fn new(
        config: OpenVoiceEngineConfig,
        tone_color: Arc<dyn ToneColorPort>,
        base_tts: Arc<dyn BaseTtsPort>,
    ) -> Self {
        Self {
            config,
            tone_color,
            base_tts,
            ready: AtomicBool::new(false),
        }
    }

    fn ensure_ready(&self) -> Result<(), ClonerError> {
        if self.ready.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ClonerError::NotReady(
                "OpenVoice model not loaded, call load() first".to_string(),
            ))
        }
    }
}

#[async_trait]
impl ClonerEnginePort for OpenVoiceEngine {
    fn engine_name(&self) -> EngineName {
        EngineName::OpenVoice
    }

    fn supported_languages(&self) -> &'static [&'static str] {
        &[
            "zh", "en", "es", "fr", "de", "it", "pt", "pl", "tr", "ru", "nl", "cs", "ar", "ja",
            "hu", "ko",
        ]
    }

    /// 校验 checkpoint 文件后标记就绪
    async fn load(&self) -> Result<(), ClonerError> {
        let config_path = self.config.checkpoint_dir.join("config.json");
        let ckpt_path = self.config.checkpoint_dir.join("checkpoint.pth");

        if !config_path.exists() {
            return Err(ClonerError::Engine(format!(
                "model config not found: {}, download from https://huggingface.co/myshell-ai/OpenVoiceV2",
                config_path.display()
            )));
        }
        if !ckpt_path.exists() {
            return Err(ClonerError::Engine(format!(
                "model checkpoint not found: {}",
                ckpt_path.display()
            )));
        }

        self.ready.store(true, Ordering::SeqCst);
        tracing::info!(
            checkpoint_dir = %self.config.checkpoint_dir.display(),
            "OpenVoice model ready"
        );
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// 从参考音频提取说话人嵌入（vad 开启）
    async fn extract(&self, request: ExtractRequest) -> Result<ExtractArtifacts, ClonerError> {
        self.ensure_ready()?;

        tracing::info!(audio = %request.audio_path.display(), "Extracting tone color");

        let embedding = self
            .tone_color
            .extract_se(&request.audio_path, true)
            .await
            .map_err(|e| ClonerError::Engine(e.to_string()))?;

        let mut metadata = Map::new();
        metadata.insert("embedding_size".to_string(), json!(embedding.len()));

        Ok(ExtractArtifacts {
            embedding: Some(embedding),
            metadata,
        })
    }

    /// 基础 TTS -> 源嵌入提取 -> 音色转换
    ///
    /// 中间产物放在 TempDir，退出时自动清理
    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, ClonerError> {
        self.ensure_ready()?;
        self.check_language(&request.language)?;

        let tgt_se = request.voice.embedding_path();
        if !tgt_se.exists() {
            return Err(ClonerError::Engine(format!(
                "voice embedding missing: {}",
                tgt_se.display()
            )));
        }

        let workdir = tempfile::tempdir()?;

        // 步骤1: 基础 TTS 生成中性语音
        let base_audio = workdir.path().join("base.wav");
        self.base_tts
            .speak(&request.text, &request.language, &base_audio)
            .await
            .map_err(|e| ClonerError::Engine(e.to_string()))?;

        // 步骤2: 提取基础语音的源嵌入（vad 关闭）
        let src_se_bytes = self
            .tone_color
            .extract_se(&base_audio, false)
            .await
            .map_err(|e| ClonerError::Engine(e.to_string()))?;
        let src_se = workdir.path().join("src.se");
        tokio::fs::write(&src_se, &src_se_bytes).await?;

        // 步骤3: 转换为目标音色
        let converted = workdir.path().join("converted.wav");
        self.tone_color
            .convert(&base_audio, &src_se, tgt_se, &converted)
            .await
            .map_err(|e| ClonerError::Engine(e.to_string()))?;

        let audio = tokio::fs::read(&converted).await?;

        tracing::info!(
            voice_id = %request.voice.id(),
            audio_size = audio.len(),
            "Tone color conversion completed"
        );

        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{BaseTtsError, ToneColorError};
    use crate::domain::voice::{AudioRef, Voice, VoiceId, VoiceName};
    use std::path::Path;
    use tempfile::tempdir;

    struct StubToneColor;

    #[async_trait]
    impl ToneColorPort for StubToneColor {
        async fn extract_se(&self, _: &Path, vad: bool) -> Result<Vec<u8>, ToneColorError> {
            Ok(if vad { vec![1u8; 8] } else { vec![2u8; 8] })
        }

        async fn convert(
            &self,
            src_audio: &Path,
            src_se: &Path,
            tgt_se: &Path,
            output_path: &Path,
        ) -> Result<(), ToneColorError> {
            assert!(src_audio.exists());
            assert!(src_se.exists());
            assert!(tgt_se.exists());
            std::fs::write(output_path, b"converted-wav")?;
            Ok(())
        }
    }

    struct StubBaseTts;

    #[async_trait]
    impl BaseTtsPort for StubBaseTts {
        async fn speak(&self, _: &str, _: &str, output_path: &Path) -> Result<(), BaseTtsError> {
            std::fs::write(output_path, b"base-wav")?;
            Ok(())
        }
    }

    fn ready_engine(checkpoint_dir: PathBuf) -> OpenVoiceEngine {
        OpenVoiceEngine::new(
            OpenVoiceEngineConfig { checkpoint_dir },
            Arc::new(StubToneColor),
            Arc::new(StubBaseTts),
        )
    }

    fn checkpoint_fixture() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), b"{}").unwrap();
        std::fs::write(dir.path().join("checkpoint.pth"), b"ckpt").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_fails_without_checkpoint() {
        let dir = tempdir().unwrap();
        let engine = ready_engine(dir.path().to_path_buf());
        let err = engine.load().await.unwrap_err();
        assert!(matches!(err, ClonerError::Engine(_)));
        assert!(!engine.is_ready());
    }

    #[tokio::test]
    async fn test_extract_requires_load() {
        let ckpt = checkpoint_fixture();
        let engine = ready_engine(ckpt.path().to_path_buf());
        let err = engine
            .extract(ExtractRequest {
                audio_path: PathBuf::from("/tmp/ref.wav"),
                reference_text: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClonerError::NotReady(_)));
    }

    #[tokio::test]
    async fn test_extract_produces_embedding() {
        let ckpt = checkpoint_fixture();
        let engine = ready_engine(ckpt.path().to_path_buf());
        engine.load().await.unwrap();

        let artifacts = engine
            .extract(ExtractRequest {
                audio_path: PathBuf::from("/tmp/ref.wav"),
                reference_text: None,
            })
            .await
            .unwrap();

        assert_eq!(artifacts.embedding.as_deref(), Some(&[1u8; 8][..]));
        assert_eq!(artifacts.metadata.get("embedding_size").unwrap(), 8);
    }

    #[tokio::test]
    async fn test_synthesize_chain() {
        let ckpt = checkpoint_fixture();
        let voices = tempdir().unwrap();

        // 已持久化的目标音色
        let ref_path = voices.path().join("reference.wav");
        let se_path = voices.path().join("embedding.bin");
        std::fs::write(&ref_path, b"ref").unwrap();
        std::fs::write(&se_path, [1u8; 8]).unwrap();

        let mut voice = Voice::new(
            VoiceId::new(),
            VoiceName::new("demo").unwrap(),
            AudioRef::from_path(ref_path).unwrap(),
            EngineName::OpenVoice,
        );
        voice.set_embedding_path(se_path);

        let engine = ready_engine(ckpt.path().to_path_buf());
        engine.load().await.unwrap();

        let audio = engine
            .synthesize(SynthesisRequest {
                text: "hello".to_string(),
                language: "en".to_string(),
                voice,
            })
            .await
            .unwrap();

        assert_eq!(audio, b"converted-wav");
    }

    #[tokio::test]
    async fn test_synthesize_rejects_unsupported_language() {
        let ckpt = checkpoint_fixture();
        let engine = ready_engine(ckpt.path().to_path_buf());
        engine.load().await.unwrap();

        let voice = Voice::new(
            VoiceId::new(),
            VoiceName::new("demo").unwrap(),
            AudioRef::from_path(PathBuf::from("/tmp/ref.wav")).unwrap(),
            EngineName::OpenVoice,
        );

        let err = engine
            .synthesize(SynthesisRequest {
                text: "hello".to_string(),
                language: "xx".to_string(),
                voice,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClonerError::UnsupportedLanguage(_)));
    }
}
