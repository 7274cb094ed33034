//! Voice Persistence - 音色目录存储

mod fs_voice_store;

pub use fs_voice_store::FsVoiceStore;
