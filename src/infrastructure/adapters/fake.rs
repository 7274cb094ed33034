//! Fake Cloner Engine - 用于测试的克隆引擎
//!
//! 不调用任何外部服务，合成时返回生成的静音 wav

use async_trait::async_trait;
use serde_json::{json, Map};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::application::ports::{
    ClonerEnginePort, ClonerError, ExtractArtifacts, ExtractRequest, SynthesisRequest,
};
use crate::domain::voice::EngineName;

/// Fake 引擎配置
#[derive(Debug, Clone)]
pub struct FakeClonerConfig {
    /// 生成音频的时长（毫秒）
    pub duration_ms: u64,
    /// 采样率
    pub sample_rate: u32,
}

impl Default for FakeClonerConfig {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            sample_rate: 22050,
        }
    }
}

/// Fake 克隆引擎
///
/// extract 返回固定嵌入，synthesize 返回静音 wav
pub struct FakeClonerEngine {
    config: FakeClonerConfig,
    ready: AtomicBool,
}

impl FakeClonerEngine {
    pub fn new(config: FakeClonerConfig) -> Self {
        Self {
            config,
            ready: AtomicBool::new(false),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeClonerConfig::default())
    }

    fn silent_wav(&self) -> Result<Vec<u8>, ClonerError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.config.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let samples = (self.config.sample_rate as u64 * self.config.duration_ms / 1000) as usize;

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| ClonerError::Engine(e.to_string()))?;
            for _ in 0..samples {
                writer
                    .write_sample(0i16)
                    .map_err(|e| ClonerError::Engine(e.to_string()))?;
            }
            writer
                .finalize()
                .map_err(|e| ClonerError::Engine(e.to_string()))?;
        }
        Ok(cursor.into_inner())
    }
}

#[async_trait]
impl ClonerEnginePort for FakeClonerEngine {
    fn engine_name(&self) -> EngineName {
        EngineName::Fake
    }

    fn supported_languages(&self) -> &'static [&'static str] {
        &["zh", "en", "ja", "ko", "fr", "de", "es"]
    }

    async fn load(&self) -> Result<(), ClonerError> {
        self.ready.store(true, Ordering::SeqCst);
        tracing::info!("FakeClonerEngine ready");
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn extract(&self, request: ExtractRequest) -> Result<ExtractArtifacts, ClonerError> {
        tracing::debug!(
            audio = %request.audio_path.display(),
            "FakeClonerEngine: returning fixed embedding"
        );

        let mut metadata = Map::new();
        metadata.insert("fake".to_string(), json!(true));

        Ok(ExtractArtifacts {
            embedding: Some(vec![0u8; 256]),
            metadata,
        })
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, ClonerError> {
        if !self.is_ready() {
            return Err(ClonerError::NotReady("fake engine not loaded".to_string()));
        }
        self.check_language(&request.language)?;

        tracing::debug!(
            text_len = request.text.len(),
            voice_id = %request.voice.id(),
            "FakeClonerEngine: returning silent audio"
        );

        self.silent_wav()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::{AudioRef, Voice, VoiceId, VoiceName};
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_fake_synthesize_is_valid_wav() {
        let engine = FakeClonerEngine::with_defaults();
        engine.load().await.unwrap();

        let voice = Voice::new(
            VoiceId::new(),
            VoiceName::new("demo").unwrap(),
            AudioRef::from_path(PathBuf::from("/tmp/ref.wav")).unwrap(),
            EngineName::Fake,
        );

        let audio = engine
            .synthesize(SynthesisRequest {
                text: "hello".to_string(),
                language: "en".to_string(),
                voice,
            })
            .await
            .unwrap();

        let reader = hound::WavReader::new(Cursor::new(audio)).unwrap();
        assert_eq!(reader.spec().sample_rate, 22050);
        assert_eq!(reader.spec().channels, 1);
        // 500ms @ 22050Hz
        assert_eq!(reader.len(), 11025);
    }

    #[tokio::test]
    async fn test_fake_requires_load() {
        let engine = FakeClonerEngine::with_defaults();
        let voice = Voice::new(
            VoiceId::new(),
            VoiceName::new("demo").unwrap(),
            AudioRef::from_path(PathBuf::from("/tmp/ref.wav")).unwrap(),
            EngineName::Fake,
        );
        let err = engine
            .synthesize(SynthesisRequest {
                text: "hello".to_string(),
                language: "en".to_string(),
                voice,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClonerError::NotReady(_)));
    }
}
