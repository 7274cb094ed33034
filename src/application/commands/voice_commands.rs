//! Voice Commands

use std::path::PathBuf;

use crate::domain::voice::VoiceId;

/// 提取音色命令
///
/// voice_id 缺省自动生成，name 缺省取 id 字符串
#[derive(Debug, Clone)]
pub struct ExtractVoice {
    pub audio_path: PathBuf,
    pub voice_id: Option<VoiceId>,
    pub name: Option<String>,
    /// 参考音频对应的文本（gpt-sovits 必需，openvoice 忽略）
    pub reference_text: Option<String>,
}

/// 删除音色命令
#[derive(Debug, Clone)]
pub struct DeleteVoice {
    pub voice_id: VoiceId,
}
