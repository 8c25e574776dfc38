//! Speech Adapter - 语音合成客户端与同源代理

mod fake_speech_client;
mod http_speech_client;
mod speech_proxy;
#[cfg(test)]
mod upstream_stub;

pub use fake_speech_client::{silent_wav, FakeSpeechClient, FakeSpeechClientConfig};
pub use http_speech_client::*;
pub use speech_proxy::{ProxiedResponse, SpeechProxy};
