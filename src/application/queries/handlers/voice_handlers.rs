//! Voice Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{StoreError, VoiceStorePort};
use crate::application::queries::{GetVoice, ListVoices};
use crate::domain::voice::Voice;

// ============================================================================
// Response DTOs
// ============================================================================

/// 音色详情响应
#[derive(Debug, Clone)]
pub struct VoiceResponse {
    pub id: String,
    pub name: String,
    pub engine: String,
    pub reference_audio: String,
    pub created_at: String,
}

impl From<Voice> for VoiceResponse {
    fn from(voice: Voice) -> Self {
        Self {
            id: voice.id().to_string(),
            name: voice.name().to_string(),
            engine: voice.engine().to_string(),
            reference_audio: voice.reference_audio().path().display().to_string(),
            created_at: voice.created_at().to_rfc3339(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetVoice Handler
pub struct GetVoiceHandler {
    store: Arc<dyn VoiceStorePort>,
}

impl GetVoiceHandler {
    pub fn new(store: Arc<dyn VoiceStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetVoice) -> Result<VoiceResponse, ApplicationError> {
        let voice = self
            .store
            .load(&query.voice_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => {
                    ApplicationError::not_found("Voice", *query.voice_id.as_uuid())
                }
                other => other.into(),
            })?;

        Ok(VoiceResponse::from(voice))
    }
}

/// ListVoices Handler
pub struct ListVoicesHandler {
    store: Arc<dyn VoiceStorePort>,
}

impl ListVoicesHandler {
    pub fn new(store: Arc<dyn VoiceStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, _query: ListVoices) -> Result<Vec<VoiceResponse>, ApplicationError> {
        let voices = self.store.list().await?;
        Ok(voices.into_iter().map(VoiceResponse::from).collect())
    }
}
