//! Synthesis Commands

use std::path::PathBuf;

use crate::domain::voice::VoiceId;

/// 音色来源: 已存储的 ID 或任意音色目录
#[derive(Debug, Clone)]
pub enum VoiceSelector {
    Id(VoiceId),
    Dir(PathBuf),
}

/// 合成语音命令
#[derive(Debug, Clone)]
pub struct SynthesizeSpeech {
    pub text: String,
    pub voice: VoiceSelector,
    pub output_path: PathBuf,
    pub language: String,
}
