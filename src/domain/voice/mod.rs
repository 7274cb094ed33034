//! Voice Context - 克隆音色限界上下文
//!
//! 职责:
//! - 参考音频与音色工件（embedding）管理
//! - 音色元数据（voice.json sidecar）
//! - 引擎归属标识

mod aggregate;
mod value_objects;

pub use aggregate::Voice;
pub use value_objects::{AudioFormat, AudioRef, EngineName, VoiceId, VoiceName};
