//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    ActivateControlHandler, AssignVoiceHandler, FillDefaultVoicesHandler, PreviewVoiceHandler,
    // Query handlers
    GetMessageHandler, GetParticipantVoiceHandler, ListVoicesHandler, ScanParticipantsHandler,
    // Ports & services
    AugmentationStorePort, ControlRegistryPort, PlaybackController, VoiceAssignmentStore,
};
use crate::infrastructure::adapters::{ClipStore, SpeechProxy};
use crate::infrastructure::events::EventPublisher;
use crate::infrastructure::memory::InMemoryChatSurface;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub chat_surface: Arc<InMemoryChatSurface>,
    pub clip_store: Arc<ClipStore>,
    pub event_publisher: Arc<EventPublisher>,
    /// 同源语音代理；未启用时为 None
    pub speech_proxy: Option<SpeechProxy>,

    // ========== Command Handlers ==========
    pub assign_voice_handler: AssignVoiceHandler,
    pub fill_default_voices_handler: FillDefaultVoicesHandler,
    pub preview_voice_handler: PreviewVoiceHandler,
    pub activate_control_handler: Arc<ActivateControlHandler>,

    // ========== Query Handlers ==========
    pub get_message_handler: GetMessageHandler,
    pub scan_participants_handler: ScanParticipantsHandler,
    pub get_participant_voice_handler: GetParticipantVoiceHandler,
    pub list_voices_handler: ListVoicesHandler,
}

impl AppState {
    /// 创建应用状态
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chat_surface: Arc<InMemoryChatSurface>,
        augmentations: Arc<dyn AugmentationStorePort>,
        controls: Arc<dyn ControlRegistryPort>,
        voices: Arc<VoiceAssignmentStore>,
        playback: Arc<PlaybackController>,
        clip_store: Arc<ClipStore>,
        event_publisher: Arc<EventPublisher>,
        speech_proxy: Option<SpeechProxy>,
    ) -> Self {
        let catalog = Arc::new(voices.catalog().clone());

        Self {
            // Ports
            chat_surface: chat_surface.clone(),
            clip_store,
            event_publisher: event_publisher.clone(),
            speech_proxy,

            // Command handlers
            assign_voice_handler: AssignVoiceHandler::new(voices.clone()),
            fill_default_voices_handler: FillDefaultVoicesHandler::new(
                chat_surface.clone(),
                voices.clone(),
            ),
            preview_voice_handler: PreviewVoiceHandler::new(voices.clone(), playback.clone()),
            activate_control_handler: Arc::new(ActivateControlHandler::new(
                controls.clone(),
                playback,
            )),

            // Query handlers
            get_message_handler: GetMessageHandler::new(
                chat_surface.clone(),
                augmentations,
                controls,
            ),
            scan_participants_handler: ScanParticipantsHandler::new(
                chat_surface,
                voices.clone(),
                event_publisher,
            ),
            get_participant_voice_handler: GetParticipantVoiceHandler::new(voices),
            list_voices_handler: ListVoicesHandler::new(catalog),
        }
    }
}
