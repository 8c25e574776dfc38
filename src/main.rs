//! Quote TTS - 聊天台词朗读服务

use std::sync::Arc;
use std::time::Duration;

use quote_tts::application::{
    PlaybackConfig, PlaybackController, ReconcileChatHandler, SettingsServicePort,
    SpeechEnginePort, VoiceAssignmentStore,
};
use quote_tts::config::{load_config, print_config, AppConfig, TransportKind};
use quote_tts::domain::{AudioFormat, VoiceCatalog};
use quote_tts::infrastructure::adapters::{
    ClipPlayer, ClipPlayerConfig, ClipStore, FakeSpeechClient, FakeSpeechClientConfig,
    HttpSpeechClient, HttpSpeechClientConfig, SpeechProxy, SpeechTransport,
};
use quote_tts::infrastructure::events::EventPublisher;
use quote_tts::infrastructure::http::{AppState, HttpServer, ServerConfig};
use quote_tts::infrastructure::memory::{
    DebouncedSettingsService, InMemoryAugmentationStore, InMemoryChatSurface,
    InMemoryControlRegistry,
};
use quote_tts::infrastructure::persistence::sled::{SledSettingsConfig, SledSettingsStore};
use quote_tts::infrastructure::worker::ChatObserver;
use tokio::sync::mpsc;

/// 按配置选择语音服务的调用方式
fn build_speech_engine(config: &AppConfig) -> anyhow::Result<Arc<dyn SpeechEnginePort>> {
    let tts = &config.tts;
    let transport = match tts.transport {
        TransportKind::Fake => {
            return Ok(Arc::new(FakeSpeechClient::new(FakeSpeechClientConfig::default())));
        }
        TransportKind::Direct => SpeechTransport::Direct {
            url: tts.url.clone(),
            api_key: tts.api_key.clone(),
        },
        TransportKind::Proxy => SpeechTransport::Proxy {
            proxy_url: tts.proxy_url.clone(),
            target_url: tts.url.clone(),
            auth_header: tts.auth_header.clone(),
            credential: tts.credential.clone(),
        },
    };

    let client_config = HttpSpeechClientConfig::new(transport)
        .with_timeout(tts.timeout_secs)
        .with_retries(tts.max_retries);
    Ok(Arc::new(HttpSpeechClient::new(client_config)?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},quote_tts={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));
    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    tracing::info!("Quote TTS - 聊天台词朗读服务");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.settings.db_path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 设置存储与防抖保存
    let settings_store = Arc::new(SledSettingsStore::new(&SledSettingsConfig {
        db_path: config.settings.db_path.clone(),
    })?);
    let settings = Arc::new(
        DebouncedSettingsService::spawn(
            settings_store,
            Duration::from_millis(config.settings.debounce_ms),
        )
        .await?,
    );

    // 音色目录与分配
    let catalog = Arc::new(VoiceCatalog::new(config.voices.catalog.iter().cloned())?);
    let voices = Arc::new(VoiceAssignmentStore::new(catalog, settings.clone()));

    // 事件发布器与内存状态
    let event_publisher = Arc::new(EventPublisher::new());
    let (mutation_tx, mutation_rx) = mpsc::channel(256);
    let chat_surface = Arc::new(InMemoryChatSurface::new(mutation_tx));
    let augmentations = Arc::new(InMemoryAugmentationStore::new());
    let controls = Arc::new(InMemoryControlRegistry::new());

    // 播放
    let clip_store = Arc::new(ClipStore::new());
    let clip_player = Arc::new(ClipPlayer::new(
        ClipPlayerConfig::default(),
        clip_store.clone(),
        event_publisher.clone(),
    ));
    let speech_engine = build_speech_engine(&config)?;
    let playback = Arc::new(PlaybackController::new(
        PlaybackConfig {
            model: config.tts.model.clone(),
            response_format: AudioFormat::Mp3,
            error_display: Duration::from_millis(config.playback.error_display_ms),
            preview_text: config.playback.preview_text.clone(),
        },
        speech_engine,
        clip_player,
        controls.clone(),
        event_publisher.clone(),
        voices.clone(),
    ));

    // 启动 ChatObserver
    let reconciler = Arc::new(ReconcileChatHandler::new(
        chat_surface.clone(),
        augmentations.clone(),
        controls.clone(),
        event_publisher.clone(),
    ));
    tokio::spawn(ChatObserver::new(mutation_rx, reconciler).run());

    let speech_proxy = if config.proxy.enabled {
        Some(SpeechProxy::new(
            config.tts.timeout_secs,
            config.proxy.endpoints(&config.tts.url),
        )?)
    } else {
        None
    };

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_body_limit(config.server.body_limit);
    let state = AppState::new(
        chat_surface,
        augmentations,
        controls,
        voices,
        playback,
        clip_store,
        event_publisher,
        speech_proxy,
    );

    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    // 写出尚未保存的设置
    if let Err(e) = settings.flush().await {
        tracing::error!(error = %e, "Failed to flush settings on shutdown");
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}
