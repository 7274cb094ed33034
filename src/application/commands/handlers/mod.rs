//! Command Handlers

mod synth_handlers;
mod voice_handlers;

pub use synth_handlers::SynthesizeHandler;
pub use voice_handlers::{DeleteVoiceHandler, ExtractVoiceHandler};
