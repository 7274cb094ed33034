//! Voice Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use super::{AudioRef, EngineName, VoiceId, VoiceName};

/// Voice 聚合根
///
/// 序列化形态即音色目录下的 voice.json sidecar。
///
/// 不变量:
/// - Voice 必须有且只有一个 reference audio
/// - embedding_path 指向音色工件: openvoice 为 embedding 文件,
///   gpt-sovits 直接复用参考音频
/// - engine 标识产生该音色的引擎，合成时不可跨引擎使用
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    #[serde(rename = "voice_id")]
    id: VoiceId,
    name: VoiceName,
    #[serde(rename = "source_audio")]
    reference_audio: AudioRef,
    embedding_path: PathBuf,
    engine: EngineName,
    #[serde(default)]
    metadata: Map<String, Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Voice {
    /// 创建新音色
    ///
    /// embedding_path 缺省复用参考音频路径（参考音频本身即工件）
    pub fn new(
        id: VoiceId,
        name: VoiceName,
        reference_audio: AudioRef,
        engine: EngineName,
    ) -> Self {
        let now = Utc::now();
        let embedding_path = reference_audio.path().clone();
        Self {
            id,
            name,
            reference_audio,
            embedding_path,
            engine,
            metadata: Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 设置独立的音色工件路径（openvoice embedding）
    pub fn set_embedding_path(&mut self, path: PathBuf) {
        self.embedding_path = path;
        self.updated_at = Utc::now();
    }

    /// 合并引擎产出的元数据
    pub fn merge_metadata(&mut self, metadata: Map<String, Value>) {
        self.metadata.extend(metadata);
        self.updated_at = Utc::now();
    }

    /// 更新音色名称
    pub fn rename(&mut self, name: VoiceName) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    /// 读取元数据中的字符串字段
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    // Getters
    pub fn id(&self) -> &VoiceId {
        &self.id
    }

    pub fn name(&self) -> &VoiceName {
        &self.name
    }

    pub fn reference_audio(&self) -> &AudioRef {
        &self.reference_audio
    }

    pub fn embedding_path(&self) -> &Path {
        &self.embedding_path
    }

    pub fn engine(&self) -> EngineName {
        self.engine
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_voice() -> Voice {
        let name = VoiceName::new("测试音色").unwrap();
        let audio = AudioRef::from_path(PathBuf::from("/tmp/ref.wav")).unwrap();
        Voice::new(VoiceId::new(), name, audio, EngineName::GptSovits)
    }

    #[test]
    fn test_voice_creation() {
        let voice = sample_voice();
        assert_eq!(voice.name().as_str(), "测试音色");
        assert_eq!(voice.engine(), EngineName::GptSovits);
        // 缺省工件即参考音频
        assert_eq!(voice.embedding_path(), voice.reference_audio().path());
    }

    #[test]
    fn test_metadata_merge() {
        let mut voice = sample_voice();
        let mut meta = Map::new();
        meta.insert("reference_text".to_string(), json!("你好"));
        voice.merge_metadata(meta);
        assert_eq!(voice.metadata_str("reference_text"), Some("你好"));
        assert_eq!(voice.metadata_str("missing"), None);
    }

    #[test]
    fn test_sidecar_roundtrip() {
        let mut voice = sample_voice();
        voice.set_embedding_path(PathBuf::from("/tmp/embedding.bin"));

        let json = serde_json::to_string(&voice).unwrap();
        assert!(json.contains("\"voice_id\""));
        assert!(json.contains("\"source_audio\""));
        assert!(json.contains("\"gpt-sovits\""));

        let loaded: Voice = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.id(), voice.id());
        assert_eq!(loaded.embedding_path(), Path::new("/tmp/embedding.bin"));
    }
}
