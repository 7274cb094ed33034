//! Voice Queries

use crate::domain::voice::VoiceId;

/// 获取音色详情查询
#[derive(Debug, Clone)]
pub struct GetVoice {
    pub voice_id: VoiceId,
}

/// 列出所有音色查询
#[derive(Debug, Clone)]
pub struct ListVoices;
