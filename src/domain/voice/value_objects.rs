//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// 音色唯一标识
///
/// 不变量: 一个 VoiceId 对应存储目录下唯一一个音色目录
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceId(Uuid);

impl VoiceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for VoiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::str::FromStr for VoiceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音色名称
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceName(String);

impl VoiceName {
    pub fn new(name: impl Into<String>) -> Result<Self, &'static str> {
        let name = name.into();
        if name.is_empty() {
            return Err("音色名称不能为空");
        }
        if name.len() > 100 {
            return Err("音色名称长度不能超过100字符");
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音频格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
    Ogg,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "flac" => Some(Self::Flac),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
        }
    }
}

/// 音频引用 - 参考音频的路径和格式
///
/// 不变量:
/// - path 必须指向有效文件
/// - format 必须与文件实际格式匹配
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioRef {
    path: PathBuf,
    format: AudioFormat,
}

impl AudioRef {
    pub fn new(path: PathBuf, format: AudioFormat) -> Self {
        Self { path, format }
    }

    /// 从路径自动推断格式
    pub fn from_path(path: PathBuf) -> Result<Self, &'static str> {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(AudioFormat::from_extension)
            .ok_or("无法识别的音频格式")?;

        Ok(Self { path, format })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }
}

/// 克隆引擎标识
///
/// 写入 voice.json，合成时校验音色与引擎是否匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineName {
    #[serde(rename = "gpt-sovits")]
    GptSovits,
    #[serde(rename = "openvoice")]
    OpenVoice,
    #[serde(rename = "fake")]
    Fake,
}

impl EngineName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GptSovits => "gpt-sovits",
            Self::OpenVoice => "openvoice",
            Self::Fake => "fake",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "gpt-sovits" => Some(Self::GptSovits),
            "openvoice" => Some(Self::OpenVoice),
            "fake" => Some(Self::Fake),
            _ => None,
        }
    }
}

impl std::fmt::Display for EngineName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_name_validation() {
        assert!(VoiceName::new("测试音色").is_ok());
        assert!(VoiceName::new("").is_err());
        assert!(VoiceName::new("x".repeat(101)).is_err());
    }

    #[test]
    fn test_audio_format_from_extension() {
        assert_eq!(AudioFormat::from_extension("WAV"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_extension("mp3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_audio_ref_from_path() {
        let audio = AudioRef::from_path(PathBuf::from("/tmp/ref.wav")).unwrap();
        assert_eq!(audio.format(), AudioFormat::Wav);
        assert!(AudioRef::from_path(PathBuf::from("/tmp/ref.bin")).is_err());
    }

    #[test]
    fn test_engine_name_roundtrip() {
        assert_eq!(EngineName::parse("gpt-sovits"), Some(EngineName::GptSovits));
        assert_eq!(EngineName::parse("openvoice"), Some(EngineName::OpenVoice));
        assert_eq!(EngineName::parse("unknown"), None);
        assert_eq!(EngineName::OpenVoice.as_str(), "openvoice");
    }

    #[test]
    fn test_voice_id_parse() {
        let id = VoiceId::new();
        let parsed: VoiceId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
