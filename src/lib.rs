//! Quote TTS - 聊天台词朗读服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Quote Context: 引号台词提取与说话人归属
//! - Participant Context: 对话参与者识别
//! - Voice Context: 音色目录
//! - Chat Context: 聊天消息快照
//!
//! 应用层 (application/):
//! - Ports: 端口定义（ChatSurface, SpeechEngine, AudioOutput, ControlRegistry, Settings, UiEvents）
//! - Services: PlaybackController, VoiceAssignmentStore
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Memory: 聊天镜像、控件注册表、防抖设置服务
//! - Worker: ChatObserver 后台协调
//! - Persistence: Sled 设置存储
//! - Adapters: 语音客户端、同源代理、临时音频播放
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
