//! OpenVoice Adapter - 本地音色转换链
//!
//! engine 编排转换流程，converter 包装外部转换器进程

mod converter;
mod engine;

pub use converter::{ConverterCli, ConverterCliConfig};
pub use engine::{OpenVoiceEngine, OpenVoiceEngineConfig};
