//! HTTP Handlers

mod audio;
mod chat;
mod controls;
mod participants;
mod ping;
mod proxy;
mod voices;
mod websocket;

pub use audio::*;
pub use chat::*;
pub use controls::*;
pub use participants::*;
pub use ping::*;
pub use proxy::*;
pub use voices::*;
pub use websocket::*;
