//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechEngine、AudioOutput、ControlRegistry、Settings 等）
//! - services: 播放控制与音色分配
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;
pub mod services;

// Re-exports
pub use commands::{
    // Chat commands
    ReconcileChat,
    // Participant commands
    ActivateControl,
    AssignVoice,
    FillDefaultVoices,
    PreviewVoice,
    // Handlers
    handlers::{
        ActivateControlHandler, AssignVoiceHandler, AssignVoiceResponse, FillDefaultVoicesHandler,
        PreviewVoiceHandler, ReconcileChatHandler, ReconcileReport,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Audio output
    AudioClip,
    AudioOutputPort,
    PlaybackError,
    // Augmentation store
    AugmentationStorePort,
    AugmentedMessage,
    // Chat surface
    ChatSurfacePort,
    // Control registry
    ControlBinding,
    ControlId,
    ControlRegistryPort,
    ControlState,
    // Settings
    Settings,
    SettingsError,
    SettingsServicePort,
    SettingsStorePort,
    // Speech engine
    SpeechAudio,
    SpeechEnginePort,
    SpeechError,
    SpeechRequest,
    // UI events
    ToastLevel,
    UiEvent,
    UiEventSinkPort,
};

pub use queries::{
    // Chat queries
    GetMessage,
    // Participant queries
    GetParticipantVoice,
    ScanParticipants,
    // Voice queries
    ListVoices,
    // Handlers
    handlers::{
        ControlView, GetMessageHandler, GetParticipantVoiceHandler, ListVoicesHandler,
        MessageView, ParticipantRow, ParticipantsView, ScanParticipantsHandler,
        VoiceListResponse, EMPTY_PARTICIPANTS_MESSAGE,
    },
};

pub use services::{
    Activation, PlaybackConfig, PlaybackController, PlaybackOutcome, VoiceAssignmentStore,
    DEFAULT_ERROR_DISPLAY_MS, DEFAULT_PREVIEW_TEXT,
};
