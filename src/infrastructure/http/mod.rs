//! HTTP Layer - RESTful API + WebSocket
//!
//! 宿主前端同步聊天内容、操作设置面板、激活播放控件，
//! 并通过 `/ws/events` 接收控件状态与提示

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
