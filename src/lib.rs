//! Revoice - 声音克隆 TTS 适配库
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: 克隆音色管理上下文
//!
//! 应用层 (application/):
//! - Ports: 端口定义（ClonerEngine, VoiceStore, BaseTts, ToneColor）
//! - Commands: CQRS 命令处理器（提取音色、合成语音、删除音色）
//! - Queries: CQRS 查询处理器（查询音色）
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: GPT-SoVITS HTTP 客户端、OpenVoice 转换链、Edge TTS、Fake 引擎
//! - Persistence: 音色目录 + voice.json sidecar 存储
//!
//! 两个克隆引擎可互换:
//! - gpt-sovits: 远程 HTTP 服务，参考音频零样本克隆
//! - openvoice: 本地音色转换链（基础 TTS + 外部转换器）

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
