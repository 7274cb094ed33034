//! GPT-SoVITS HTTP Client - 调用外部 GPT-SoVITS API 服务
//!
//! 实现 ClonerEnginePort trait，通过 HTTP 调用独立运行的 GPT-SoVITS 服务。
//! 该引擎的"音色提取"只是保存参考音频和文本，合成时用参考音频做零样本克隆。
//!
//! 外部 API:
//! GET  /           健康检查
//! POST /tts        Request: {"text", "text_lang", "ref_audio_path",
//!                            "prompt_text", "prompt_lang"}  (JSON)
//!                  Response: 音频二进制
//! POST /set_model  Request: {"gpt_model_path"?, "sovits_model_path"?}

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Map};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::application::ports::{
    ClonerEnginePort, ClonerError, ExtractArtifacts, ExtractRequest, SynthesisRequest,
};
use crate::domain::voice::EngineName;

/// 零样本克隆合成请求体 (JSON)
#[derive(Debug, Serialize)]
struct TtsHttpRequest<'a> {
    /// 要合成的文本
    text: &'a str,
    /// 文本语言
    text_lang: &'a str,
    /// 参考音频路径（服务端直接读取，需共享文件系统）
    ref_audio_path: &'a str,
    /// 参考音频对应的文本
    prompt_text: &'a str,
    /// 参考文本语言
    prompt_lang: &'a str,
}

/// GPT-SoVITS 客户端配置
#[derive(Debug, Clone)]
pub struct SovitsClientConfig {
    /// API 服务基础 URL
    pub base_url: String,
    /// 合成请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for SovitsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9880".to_string(),
            timeout_secs: 120,
        }
    }
}

impl SovitsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// GPT-SoVITS HTTP 客户端
pub struct SovitsHttpClient {
    client: Client,
    config: SovitsClientConfig,
    ready: AtomicBool,
}

impl SovitsHttpClient {
    /// 创建新的客户端
    pub fn new(config: SovitsClientConfig) -> Result<Self, ClonerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClonerError::Network(e.to_string()))?;

        Ok(Self {
            client,
            config,
            ready: AtomicBool::new(false),
        })
    }

    /// 使用默认配置创建客户端
    pub fn with_default_config() -> Result<Self, ClonerError> {
        Self::new(SovitsClientConfig::default())
    }

    fn tts_url(&self) -> String {
        format!("{}/tts", self.config.base_url)
    }

    fn set_model_url(&self) -> String {
        format!("{}/set_model", self.config.base_url)
    }

    fn ensure_ready(&self) -> Result<(), ClonerError> {
        if self.ready.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ClonerError::NotReady(format!(
                "GPT-SoVITS service not connected: {}",
                self.config.base_url
            )))
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> ClonerError {
        if e.is_timeout() {
            ClonerError::Timeout
        } else if e.is_connect() {
            ClonerError::Network(format!(
                "Cannot connect to GPT-SoVITS service {}: {}",
                self.config.base_url, e
            ))
        } else {
            ClonerError::Network(e.to_string())
        }
    }

    /// 发送合成请求，返回音频字节
    async fn request_tts(&self, payload: &TtsHttpRequest<'_>) -> Result<Vec<u8>, ClonerError> {
        tracing::debug!(
            url = %self.tts_url(),
            text_len = payload.text.len(),
            prompt_lang = %payload.prompt_lang,
            "Sending TTS request"
        );

        let response = self
            .client
            .post(self.tts_url())
            .json(payload)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClonerError::Service(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| ClonerError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .to_vec();

        tracing::info!(audio_size = audio.len(), "TTS request completed");

        Ok(audio)
    }

    /// 直接用参考音频合成（不经过已保存的音色）
    pub async fn synthesize_direct(
        &self,
        text: &str,
        reference_audio: &Path,
        reference_text: &str,
        language: &str,
    ) -> Result<Vec<u8>, ClonerError> {
        self.ensure_ready()?;
        self.check_language(language)?;

        let ref_audio = reference_audio.to_string_lossy();
        self.request_tts(&TtsHttpRequest {
            text,
            text_lang: language,
            ref_audio_path: &ref_audio,
            prompt_text: reference_text,
            prompt_lang: language,
        })
        .await
    }

    /// 切换服务端模型（微调模型）
    ///
    /// 两个路径都为 None 时不发请求
    pub async fn set_model(
        &self,
        gpt_model_path: Option<&str>,
        sovits_model_path: Option<&str>,
    ) -> Result<(), ClonerError> {
        let mut payload = Map::new();
        if let Some(path) = gpt_model_path {
            payload.insert("gpt_model_path".to_string(), json!(path));
        }
        if let Some(path) = sovits_model_path {
            payload.insert("sovits_model_path".to_string(), json!(path));
        }
        if payload.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .post(self.set_model_url())
            .timeout(Duration::from_secs(60))
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClonerError::Service(format!(
                "set_model failed, HTTP {}: {}",
                status, error_text
            )));
        }

        tracing::info!("GPT-SoVITS model switched");
        Ok(())
    }
}

#[async_trait]
impl ClonerEnginePort for SovitsHttpClient {
    fn engine_name(&self) -> EngineName {
        EngineName::GptSovits
    }

    fn supported_languages(&self) -> &'static [&'static str] {
        &["zh", "en", "ja"]
    }

    /// 检查 API 服务是否可用
    ///
    /// 服务未运行时只记录警告，保持未就绪状态
    async fn load(&self) -> Result<(), ClonerError> {
        let result = self
            .client
            .get(format!("{}/", self.config.base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        match result {
            Ok(_) => {
                self.ready.store(true, Ordering::SeqCst);
                tracing::info!(base_url = %self.config.base_url, "GPT-SoVITS service connected");
            }
            Err(e) => {
                self.ready.store(false, Ordering::SeqCst);
                tracing::warn!(
                    base_url = %self.config.base_url,
                    error = %e,
                    "GPT-SoVITS service not running, start it with: python api_v2.py"
                );
            }
        }
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// 保存音色元数据（参考文本）
    ///
    /// GPT-SoVITS 无独立工件，参考音频本身即工件
    async fn extract(&self, request: ExtractRequest) -> Result<ExtractArtifacts, ClonerError> {
        let mut metadata = Map::new();
        metadata.insert(
            "reference_text".to_string(),
            json!(request.reference_text.as_deref().unwrap_or("")),
        );

        tracing::info!(
            audio = %request.audio_path.display(),
            "Reference audio registered for zero-shot cloning"
        );

        Ok(ExtractArtifacts {
            embedding: None,
            metadata,
        })
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<Vec<u8>, ClonerError> {
        self.ensure_ready()?;
        self.check_language(&request.language)?;

        let prompt_text = request
            .voice
            .metadata_str("reference_text")
            .unwrap_or("")
            .to_string();
        let ref_audio = request
            .voice
            .reference_audio()
            .path()
            .to_string_lossy()
            .into_owned();

        self.request_tts(&TtsHttpRequest {
            text: &request.text,
            text_lang: &request.language,
            ref_audio_path: &ref_audio,
            prompt_text: &prompt_text,
            prompt_lang: &request.language,
        })
        .await
    }
}
