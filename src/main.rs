//! Revoice CLI - 声音克隆 TTS 命令行工具
//!
//! 引擎由配置选择（engine = gpt-sovits / openvoice / fake），
//! 子命令只负责把参数交给应用层处理器。

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};

use revoice::application::{
    DeleteVoice, DeleteVoiceHandler, ExtractVoice, ExtractVoiceHandler, GetVoice, GetVoiceHandler,
    ListVoices, ListVoicesHandler, SynthesizeHandler, SynthesizeSpeech, VoiceSelector,
};
use revoice::application::ports::{ClonerEnginePort, VoiceStorePort};
use revoice::config::{load_config, load_config_from_path, print_config, AppConfig};
use revoice::domain::voice::{EngineName, VoiceId};
use revoice::infrastructure::adapters::{
    ConverterCli, ConverterCliConfig, EdgeTtsClient, EdgeTtsConfig, FakeClonerEngine,
    OpenVoiceEngine, OpenVoiceEngineConfig, SovitsClientConfig, SovitsHttpClient,
};
use revoice::infrastructure::FsVoiceStore;

/// Revoice - 声音克隆 TTS 工具
///
/// 用参考音频克隆音色，再用克隆的音色合成语音。
#[derive(Parser)]
#[command(name = "revoice")]
#[command(about = "Voice cloning TTS tool")]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认搜索 config.toml / config.local.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 从参考音频提取音色
    Extract {
        /// 参考音频路径（建议 3-10 秒清晰人声）
        #[arg(long)]
        audio: PathBuf,

        /// 指定音色 ID（缺省自动生成）
        #[arg(long)]
        id: Option<VoiceId>,

        /// 音色名称
        #[arg(long)]
        name: Option<String>,

        /// 参考音频对应的文本（gpt-sovits 必需）
        #[arg(long)]
        text: Option<String>,
    },

    /// 用已保存的音色合成语音
    Synth {
        /// 要合成的文本
        #[arg(long)]
        text: String,

        /// 音色 ID
        #[arg(long, conflicts_with = "voice_dir")]
        voice: Option<VoiceId>,

        /// 音色目录（含 voice.json）
        #[arg(long)]
        voice_dir: Option<PathBuf>,

        /// 输出文件路径（缺省写入输出目录）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 语言代码
        #[arg(long, default_value = "zh")]
        language: String,
    },

    /// 直接用参考音频合成，不保存音色（仅 gpt-sovits）
    SynthDirect {
        /// 要合成的文本
        #[arg(long)]
        text: String,

        /// 参考音频路径
        #[arg(long)]
        reference: PathBuf,

        /// 参考音频对应的文本
        #[arg(long, default_value = "")]
        reference_text: String,

        /// 输出文件路径（缺省写入输出目录）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 语言代码
        #[arg(long, default_value = "zh")]
        language: String,
    },

    /// 切换服务端模型（仅 gpt-sovits）
    SetModel {
        /// GPT 模型路径
        #[arg(long)]
        gpt: Option<String>,

        /// SoVITS 模型路径
        #[arg(long)]
        sovits: Option<String>,
    },

    /// 管理已保存的音色
    Voices {
        #[command(subcommand)]
        command: VoicesCommands,
    },

    /// 检查引擎就绪状态
    Health,
}

#[derive(Subcommand)]
enum VoicesCommands {
    /// 列出所有音色
    List,
    /// 显示音色详情
    Show {
        #[arg(long)]
        id: VoiceId,
    },
    /// 删除音色
    Delete {
        #[arg(long)]
        id: VoiceId,
    },
}

/// 按配置构建克隆引擎
fn build_engine(config: &AppConfig) -> anyhow::Result<Arc<dyn ClonerEnginePort>> {
    let engine = EngineName::parse(&config.engine)
        .ok_or_else(|| anyhow!("unknown engine: {}", config.engine))?;

    Ok(match engine {
        EngineName::GptSovits => Arc::new(build_sovits_client(config)?),
        EngineName::OpenVoice => {
            let tone_color = Arc::new(ConverterCli::new(ConverterCliConfig {
                program: config.openvoice.converter_program.clone(),
                checkpoint_dir: config.openvoice.checkpoint_dir.clone(),
            }));
            let base_tts = Arc::new(EdgeTtsClient::new(EdgeTtsConfig {
                program: config.openvoice.base_tts_program.clone(),
            }));
            Arc::new(OpenVoiceEngine::new(
                OpenVoiceEngineConfig {
                    checkpoint_dir: config.openvoice.checkpoint_dir.clone(),
                },
                tone_color,
                base_tts,
            ))
        }
        EngineName::Fake => Arc::new(FakeClonerEngine::with_defaults()),
    })
}

fn build_sovits_client(config: &AppConfig) -> anyhow::Result<SovitsHttpClient> {
    let client = SovitsHttpClient::new(
        SovitsClientConfig::new(&config.sovits.url).with_timeout(config.sovits.timeout_secs),
    )?;
    Ok(client)
}

/// 缺省输出路径: <output_dir>/synth_<utc时间戳>.wav
fn default_output_path(config: &AppConfig) -> PathBuf {
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    config.storage.output_dir.join(format!("synth_{}.wav", stamp))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = match &cli.config {
        Some(path) => load_config_from_path(Some(path)),
        None => load_config(),
    }
    .map_err(|e| anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},revoice={}", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    print_config(&config);

    let store: Arc<dyn VoiceStorePort> =
        Arc::new(FsVoiceStore::new(&config.storage.voices_dir).await?);

    match cli.command {
        Commands::Extract {
            audio,
            id,
            name,
            text,
        } => {
            let engine = build_engine(&config)?;
            engine.load().await?;

            let handler = ExtractVoiceHandler::new(store, engine);
            let voice = handler
                .handle(ExtractVoice {
                    audio_path: audio,
                    voice_id: id,
                    name,
                    reference_text: text,
                })
                .await?;

            println!("voice extracted: {}", voice.id());
            println!("  name:      {}", voice.name());
            println!("  engine:    {}", voice.engine());
            println!("  reference: {}", voice.reference_audio().path().display());
            println!("  artifact:  {}", voice.embedding_path().display());
        }

        Commands::Synth {
            text,
            voice,
            voice_dir,
            output,
            language,
        } => {
            let selector = match (voice, voice_dir) {
                (Some(id), None) => VoiceSelector::Id(id),
                (None, Some(dir)) => VoiceSelector::Dir(dir),
                _ => return Err(anyhow!("specify exactly one of --voice / --voice-dir")),
            };
            let output_path = output.unwrap_or_else(|| default_output_path(&config));

            let engine = build_engine(&config)?;
            engine.load().await?;

            let handler = SynthesizeHandler::new(store, engine);
            let written = handler
                .handle(SynthesizeSpeech {
                    text,
                    voice: selector,
                    output_path,
                    language,
                })
                .await?;

            println!("audio written: {}", written.display());
        }

        Commands::SynthDirect {
            text,
            reference,
            reference_text,
            output,
            language,
        } => {
            ensure_engine(&config, EngineName::GptSovits)?;
            let client = build_sovits_client(&config)?;
            client.load().await?;

            let audio = client
                .synthesize_direct(&text, &reference, &reference_text, &language)
                .await?;

            let output_path = output.unwrap_or_else(|| default_output_path(&config));
            if let Some(parent) = output_path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&output_path, &audio)
                .await
                .with_context(|| format!("writing {}", output_path.display()))?;

            println!("audio written: {}", output_path.display());
        }

        Commands::SetModel { gpt, sovits } => {
            ensure_engine(&config, EngineName::GptSovits)?;
            let client = build_sovits_client(&config)?;
            client.load().await?;
            client.set_model(gpt.as_deref(), sovits.as_deref()).await?;
            println!("model switched");
        }

        Commands::Voices { command } => match command {
            VoicesCommands::List => {
                let handler = ListVoicesHandler::new(store);
                let voices = handler.handle(ListVoices).await?;
                if voices.is_empty() {
                    println!("no voices saved");
                }
                for voice in voices {
                    println!("{}  {}  [{}]  {}", voice.id, voice.name, voice.engine, voice.created_at);
                }
            }
            VoicesCommands::Show { id } => {
                let handler = GetVoiceHandler::new(store);
                let voice = handler.handle(GetVoice { voice_id: id }).await?;
                println!("id:        {}", voice.id);
                println!("name:      {}", voice.name);
                println!("engine:    {}", voice.engine);
                println!("reference: {}", voice.reference_audio);
                println!("created:   {}", voice.created_at);
            }
            VoicesCommands::Delete { id } => {
                let handler = DeleteVoiceHandler::new(store);
                handler.handle(DeleteVoice { voice_id: id }).await?;
                println!("voice deleted");
            }
        },

        Commands::Health => {
            let engine = build_engine(&config)?;
            engine.load().await?;
            if engine.is_ready() {
                println!("{}: ready", engine.engine_name());
            } else {
                println!("{}: not ready", engine.engine_name());
                return Err(anyhow!("engine not ready"));
            }
        }
    }

    Ok(())
}

fn ensure_engine(config: &AppConfig, expected: EngineName) -> anyhow::Result<()> {
    if config.engine != expected.as_str() {
        return Err(anyhow!(
            "this command requires engine = {}, configured engine is {}",
            expected,
            config.engine
        ));
    }
    Ok(())
}
