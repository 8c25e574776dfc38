//! 测试用的本地语音服务：记录收到的请求头和请求体

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

pub const STUB_AUDIO: &[u8] = &[0xFF, 0xFB, 0x90, 0x00];

#[derive(Clone)]
pub struct UpstreamStub {
    pub url: String,
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

impl UpstreamStub {
    /// 在随机端口启动，所有请求都以 `status` 应答
    pub async fn spawn(status: StatusCode) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/v1/audio/speech", post(record))
            .with_state((requests.clone(), status));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/v1/audio/speech", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<(HeaderMap, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State((requests, status)): State<(Arc<Mutex<Vec<(HeaderMap, Value)>>>, StatusCode)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Vec<u8>) {
    requests.lock().unwrap().push((headers, body));
    if status.is_success() {
        (status, STUB_AUDIO.to_vec())
    } else {
        (status, b"upstream failure".to_vec())
    }
}
