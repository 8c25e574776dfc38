//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_output;
mod augmentation_store;
mod chat_surface;
mod control_registry;
mod settings_store;
mod speech_engine;
mod ui_events;

pub use audio_output::{AudioClip, AudioOutputPort, PlaybackError};
pub use augmentation_store::{AugmentationStorePort, AugmentedMessage};
pub use chat_surface::ChatSurfacePort;
pub use control_registry::{ControlBinding, ControlId, ControlRegistryPort, ControlState};
pub use settings_store::{Settings, SettingsError, SettingsServicePort, SettingsStorePort};
pub use speech_engine::{SpeechAudio, SpeechEnginePort, SpeechError, SpeechRequest};
pub use ui_events::{ToastLevel, UiEvent, UiEventSinkPort};
