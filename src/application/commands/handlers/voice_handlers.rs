//! Voice Command Handlers

use std::sync::Arc;

use crate::application::commands::{DeleteVoice, ExtractVoice};
use crate::application::error::ApplicationError;
use crate::application::ports::{ClonerEnginePort, ExtractRequest, VoiceStorePort};
use crate::domain::voice::{AudioFormat, AudioRef, Voice, VoiceId, VoiceName};

// ============================================================================
// ExtractVoice
// ============================================================================

/// ExtractVoice Handler
///
/// 编排: 输入校验 -> 参考音频落盘 -> 引擎提取工件 -> sidecar 持久化
pub struct ExtractVoiceHandler {
    store: Arc<dyn VoiceStorePort>,
    engine: Arc<dyn ClonerEnginePort>,
}

impl ExtractVoiceHandler {
    pub fn new(store: Arc<dyn VoiceStorePort>, engine: Arc<dyn ClonerEnginePort>) -> Self {
        Self { store, engine }
    }

    pub async fn handle(&self, command: ExtractVoice) -> Result<Voice, ApplicationError> {
        if !command.audio_path.exists() {
            return Err(ApplicationError::validation(format!(
                "audio file not found: {}",
                command.audio_path.display()
            )));
        }

        // 扩展名必须是已知音频格式
        command
            .audio_path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(AudioFormat::from_extension)
            .ok_or_else(|| {
                ApplicationError::validation(format!(
                    "unrecognized audio format: {}",
                    command.audio_path.display()
                ))
            })?;

        let voice_id = command.voice_id.unwrap_or_default();
        let name = match command.name {
            Some(name) => VoiceName::new(name).map_err(ApplicationError::validation)?,
            None => VoiceName::new(voice_id.to_string())
                .map_err(ApplicationError::validation)?,
        };

        let reference_path = self
            .store
            .import_reference(&voice_id, &command.audio_path)
            .await?;

        let artifacts = self
            .engine
            .extract(ExtractRequest {
                audio_path: reference_path.clone(),
                reference_text: command.reference_text,
            })
            .await?;

        let reference_audio = AudioRef::from_path(reference_path)
            .map_err(ApplicationError::validation)?;
        let mut voice = Voice::new(
            voice_id.clone(),
            name,
            reference_audio,
            self.engine.engine_name(),
        );

        if let Some(embedding) = artifacts.embedding {
            let embedding_path = self.store.write_embedding(&voice_id, &embedding).await?;
            voice.set_embedding_path(embedding_path);
        }
        voice.merge_metadata(artifacts.metadata);

        self.store.save(&voice).await?;

        tracing::info!(
            voice_id = %voice_id,
            name = %voice.name(),
            engine = %voice.engine(),
            "Voice extracted"
        );

        Ok(voice)
    }
}

// ============================================================================
// DeleteVoice
// ============================================================================

/// DeleteVoice Handler
pub struct DeleteVoiceHandler {
    store: Arc<dyn VoiceStorePort>,
}

impl DeleteVoiceHandler {
    pub fn new(store: Arc<dyn VoiceStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, command: DeleteVoice) -> Result<(), ApplicationError> {
        let voice_id = command.voice_id;

        // 检查音色是否存在
        if !self.store.exists(&voice_id).await {
            return Err(ApplicationError::not_found("Voice", *voice_id.as_uuid()));
        }

        self.store.delete(&voice_id).await?;

        tracing::info!(voice_id = %voice_id, "Voice deleted");

        Ok(())
    }
}
