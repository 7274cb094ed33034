//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（ClonerEngine、VoiceStore、BaseTts、ToneColor）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Synthesis commands
    SynthesizeSpeech,
    VoiceSelector,
    // Voice commands
    DeleteVoice,
    ExtractVoice,
    // Handlers
    handlers::{DeleteVoiceHandler, ExtractVoiceHandler, SynthesizeHandler},
};

pub use error::ApplicationError;

pub use ports::{
    // Base TTS
    BaseTtsError,
    BaseTtsPort,
    // Cloner engine
    ClonerEnginePort,
    ClonerError,
    ExtractArtifacts,
    ExtractRequest,
    SynthesisRequest,
    // Tone color converter
    ToneColorError,
    ToneColorPort,
    // Voice store
    StoreError,
    VoiceStorePort,
};

pub use queries::{
    // Voice queries
    GetVoice,
    ListVoices,
    // Handlers
    handlers::{GetVoiceHandler, ListVoicesHandler, VoiceResponse},
};
