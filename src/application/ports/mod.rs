//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod base_tts;
mod cloner_engine;
mod tone_color;
mod voice_store;

pub use base_tts::{BaseTtsError, BaseTtsPort};
pub use cloner_engine::{
    ClonerEnginePort, ClonerError, ExtractArtifacts, ExtractRequest, SynthesisRequest,
};
pub use tone_color::{ToneColorError, ToneColorPort};
pub use voice_store::{StoreError, VoiceStorePort};
