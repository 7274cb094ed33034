//! Synthesis Command Handlers

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::commands::{SynthesizeSpeech, VoiceSelector};
use crate::application::error::ApplicationError;
use crate::application::ports::{ClonerEnginePort, SynthesisRequest, VoiceStorePort};

/// SynthesizeSpeech Handler
///
/// 编排: 音色加载 -> 引擎合成 -> 音频落盘
///
/// 一次阻塞调用，无重试、无并发协调
pub struct SynthesizeHandler {
    store: Arc<dyn VoiceStorePort>,
    engine: Arc<dyn ClonerEnginePort>,
}

impl SynthesizeHandler {
    pub fn new(store: Arc<dyn VoiceStorePort>, engine: Arc<dyn ClonerEnginePort>) -> Self {
        Self { store, engine }
    }

    pub async fn handle(&self, command: SynthesizeSpeech) -> Result<PathBuf, ApplicationError> {
        if command.text.trim().is_empty() {
            return Err(ApplicationError::validation("text must not be empty"));
        }

        let voice = match &command.voice {
            VoiceSelector::Id(id) => self.store.load(id).await?,
            VoiceSelector::Dir(dir) => self.store.load_dir(dir).await?,
        };

        // 音色不可跨引擎使用
        if voice.engine() != self.engine.engine_name() {
            return Err(ApplicationError::validation(format!(
                "voice {} belongs to engine {}, current engine is {}",
                voice.id(),
                voice.engine(),
                self.engine.engine_name()
            )));
        }

        tracing::debug!(
            voice_id = %voice.id(),
            text_len = command.text.len(),
            language = %command.language,
            "Synthesizing speech"
        );

        let audio = self
            .engine
            .synthesize(SynthesisRequest {
                text: command.text,
                language: command.language,
                voice,
            })
            .await?;

        if let Some(parent) = command.output_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ApplicationError::internal(e.to_string()))?;
        }
        tokio::fs::write(&command.output_path, &audio)
            .await
            .map_err(|e| ApplicationError::internal(e.to_string()))?;

        tracing::info!(
            output = %command.output_path.display(),
            audio_size = audio.len(),
            "Synthesis completed"
        );

        Ok(command.output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        ClonerError, ExtractArtifacts, ExtractRequest, StoreError,
    };
    use crate::domain::voice::{AudioRef, EngineName, Voice, VoiceId, VoiceName};
    use async_trait::async_trait;
    use std::path::Path;
    use tempfile::tempdir;

    struct StubEngine {
        name: EngineName,
    }

    #[async_trait]
    impl ClonerEnginePort for StubEngine {
        fn engine_name(&self) -> EngineName {
            self.name
        }

        fn supported_languages(&self) -> &'static [&'static str] {
            &["zh"]
        }

        async fn load(&self) -> Result<(), ClonerError> {
            Ok(())
        }

        fn is_ready(&self) -> bool {
            true
        }

        async fn extract(&self, _: ExtractRequest) -> Result<ExtractArtifacts, ClonerError> {
            Ok(ExtractArtifacts::default())
        }

        async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, ClonerError> {
            Ok(request.text.into_bytes())
        }
    }

    struct OneVoiceStore {
        voice: Voice,
    }

    #[async_trait]
    impl VoiceStorePort for OneVoiceStore {
        fn voice_dir(&self, id: &VoiceId) -> PathBuf {
            PathBuf::from("/tmp").join(id.to_string())
        }

        async fn import_reference(
            &self,
            _: &VoiceId,
            _: &Path,
        ) -> Result<PathBuf, StoreError> {
            unimplemented!()
        }

        async fn write_embedding(&self, _: &VoiceId, _: &[u8]) -> Result<PathBuf, StoreError> {
            unimplemented!()
        }

        async fn save(&self, _: &Voice) -> Result<(), StoreError> {
            Ok(())
        }

        async fn load(&self, id: &VoiceId) -> Result<Voice, StoreError> {
            if id == self.voice.id() {
                Ok(self.voice.clone())
            } else {
                Err(StoreError::NotFound(id.to_string()))
            }
        }

        async fn load_dir(&self, _: &Path) -> Result<Voice, StoreError> {
            Ok(self.voice.clone())
        }

        async fn list(&self) -> Result<Vec<Voice>, StoreError> {
            Ok(vec![self.voice.clone()])
        }

        async fn delete(&self, _: &VoiceId) -> Result<(), StoreError> {
            Ok(())
        }

        async fn exists(&self, id: &VoiceId) -> bool {
            id == self.voice.id()
        }
    }

    fn sample_voice(engine: EngineName) -> Voice {
        Voice::new(
            VoiceId::new(),
            VoiceName::new("demo").unwrap(),
            AudioRef::from_path(PathBuf::from("/tmp/ref.wav")).unwrap(),
            engine,
        )
    }

    #[tokio::test]
    async fn test_synthesize_writes_output() {
        let temp = tempdir().unwrap();
        let voice = sample_voice(EngineName::Fake);
        let voice_id = voice.id().clone();
        let store = Arc::new(OneVoiceStore { voice });
        let engine = Arc::new(StubEngine {
            name: EngineName::Fake,
        });
        let handler = SynthesizeHandler::new(store, engine);

        let output = temp.path().join("nested/out.wav");
        let result = handler
            .handle(SynthesizeSpeech {
                text: "你好".to_string(),
                voice: VoiceSelector::Id(voice_id),
                output_path: output.clone(),
                language: "zh".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result, output);
        assert_eq!(std::fs::read(&output).unwrap(), "你好".as_bytes());
    }

    #[tokio::test]
    async fn test_synthesize_rejects_empty_text() {
        let voice = sample_voice(EngineName::Fake);
        let store = Arc::new(OneVoiceStore { voice });
        let engine = Arc::new(StubEngine {
            name: EngineName::Fake,
        });
        let handler = SynthesizeHandler::new(store, engine);

        let err = handler
            .handle(SynthesizeSpeech {
                text: "   ".to_string(),
                voice: VoiceSelector::Dir(PathBuf::from("/tmp/v")),
                output_path: PathBuf::from("/tmp/out.wav"),
                language: "zh".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_synthesize_rejects_engine_mismatch() {
        let voice = sample_voice(EngineName::GptSovits);
        let voice_id = voice.id().clone();
        let store = Arc::new(OneVoiceStore { voice });
        let engine = Arc::new(StubEngine {
            name: EngineName::OpenVoice,
        });
        let handler = SynthesizeHandler::new(store, engine);

        let err = handler
            .handle(SynthesizeSpeech {
                text: "hello".to_string(),
                voice: VoiceSelector::Id(voice_id),
                output_path: PathBuf::from("/tmp/out.wav"),
                language: "zh".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }
}
