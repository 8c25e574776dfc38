//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                     GET   健康检查
//! - /api/chat/identity            PUT   设置当前用户名和主角色名
//! - /api/chat/messages            POST  新增或更新一条已渲染的消息
//! - /api/chat/messages/remove     POST  移除消息
//! - /api/chat/messages/:id        GET   获取消息的注入结果
//! - /api/voices                   GET   音色目录
//! - /api/participants             GET   刷新参与者列表（?fill_defaults=true 写入兜底音色）
//! - /api/participants/voice       POST  修改参与者音色
//! - /api/participants/preview     POST  试听
//! - /api/controls/activate        POST  激活台词播放控件
//! - /api/audio/:clip_id           GET   播放期间的临时音频
//! - /api/tts/proxy                POST  同源语音代理（可选）
//! - /ws/events                    WS    界面事件

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::events_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/chat", chat_routes())
        .route("/voices", get(handlers::list_voices))
        .nest("/participants", participant_routes())
        .route("/controls/activate", post(handlers::activate_control))
        .route("/audio/:clip_id", get(handlers::get_clip))
        .route("/tts/proxy", post(handlers::proxy_speech))
}

/// Chat 路由
fn chat_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/identity", put(handlers::set_identity))
        .route("/messages", post(handlers::upsert_message))
        .route("/messages/remove", post(handlers::remove_message))
        .route("/messages/:id", get(handlers::get_message))
}

/// Participant 路由
fn participant_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_participants))
        .route("/voice", post(handlers::assign_voice))
        .route("/preview", post(handlers::preview_voice))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{
        PlaybackConfig, PlaybackController, ReconcileChat, ReconcileChatHandler,
        SettingsServicePort, VoiceAssignmentStore,
    };
    use crate::domain::{AudioFormat, VoiceCatalog};
    use crate::infrastructure::adapters::{
        ClipPlayer, ClipPlayerConfig, ClipStore, FakeSpeechClient, FakeSpeechClientConfig,
        SpeechProxy, StoredClip,
    };
    use crate::infrastructure::events::EventPublisher;
    use crate::infrastructure::memory::{
        ChatMutation, DebouncedSettingsService, InMemoryAugmentationStore, InMemoryChatSurface,
        InMemoryControlRegistry,
    };
    use crate::infrastructure::persistence::SledSettingsStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use chrono::Utc;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    struct Harness {
        app: Router,
        reconcile: ReconcileChatHandler,
        clip_store: Arc<ClipStore>,
        settings: Arc<DebouncedSettingsService>,
        _mutations: mpsc::Receiver<ChatMutation>,
        _dir: TempDir,
    }

    async fn harness() -> Harness {
        harness_with_proxy(None).await
    }

    async fn harness_with_proxy(speech_proxy: Option<SpeechProxy>) -> Harness {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(SledSettingsStore::open(dir.path().join("settings")).unwrap());
        let settings = Arc::new(
            DebouncedSettingsService::spawn(store, Duration::from_millis(20))
                .await
                .unwrap(),
        );

        let (tx, rx) = mpsc::channel(64);
        let surface = Arc::new(InMemoryChatSurface::new(tx));
        let augmentations = Arc::new(InMemoryAugmentationStore::new());
        let controls = Arc::new(InMemoryControlRegistry::new());
        let events = Arc::new(EventPublisher::new());
        let clip_store = Arc::new(ClipStore::new());

        let catalog = Arc::new(VoiceCatalog::new(["alloy", "nova"]).unwrap());
        let voices = Arc::new(VoiceAssignmentStore::new(catalog, settings.clone()));

        let player = Arc::new(ClipPlayer::new(
            ClipPlayerConfig {
                tail: Duration::ZERO,
                ..Default::default()
            },
            clip_store.clone(),
            events.clone(),
        ));
        let speech = Arc::new(FakeSpeechClient::new(FakeSpeechClientConfig {
            duration_ms: 100,
            latency: Duration::ZERO,
            ..Default::default()
        }));
        let playback = Arc::new(PlaybackController::new(
            PlaybackConfig {
                error_display: Duration::from_millis(10),
                ..Default::default()
            },
            speech,
            player,
            controls.clone(),
            events.clone(),
            voices.clone(),
        ));

        let reconcile = ReconcileChatHandler::new(
            surface.clone(),
            augmentations.clone(),
            controls.clone(),
            events.clone(),
        );

        let state = AppState::new(
            surface,
            augmentations,
            controls,
            voices,
            playback,
            clip_store.clone(),
            events,
            speech_proxy,
        );

        Harness {
            app: create_routes().with_state(Arc::new(state)),
            reconcile,
            clip_store,
            settings,
            _mutations: rx,
            _dir: dir,
        }
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Value {
        let response = send(app, method, uri, body).await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await
    }

    #[tokio::test]
    async fn test_ping() {
        let h = harness().await;
        let body = call(&h.app, "GET", "/api/ping", None).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_voices() {
        let h = harness().await;
        let body = call(&h.app, "GET", "/api/voices", None).await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["voices"], json!(["alloy", "nova"]));
        assert_eq!(body["data"]["fallback"], "alloy");
    }

    #[tokio::test]
    async fn test_message_is_augmented_after_reconcile() {
        let h = harness().await;

        let body = call(
            &h.app,
            "POST",
            "/api/chat/messages",
            Some(json!({"id": "m1", "sender": "Bob", "content": "<p>Alice: “Hello”</p>"})),
        )
        .await;
        assert_eq!(body["errno"], 0);

        let report = h.reconcile.handle(ReconcileChat);
        assert_eq!(report.controls_bound, 1);

        let body = call(&h.app, "GET", "/api/chat/messages/m1", None).await;
        assert_eq!(body["errno"], 0);
        let controls = body["data"]["controls"].as_array().unwrap();
        assert_eq!(controls.len(), 1);
        assert_eq!(controls[0]["speaker"], "Alice");
        assert_eq!(controls[0]["text"], "Hello");
        assert_eq!(controls[0]["state"], "idle");
        assert!(body["data"]["markup"].as_str().unwrap().contains("Hello"));
    }

    #[tokio::test]
    async fn test_unknown_message_returns_errno() {
        let h = harness().await;
        let body = call(&h.app, "GET", "/api/chat/messages/missing", None).await;
        assert_eq!(body["errno"], 404);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_remove_message() {
        let h = harness().await;
        call(
            &h.app,
            "POST",
            "/api/chat/messages",
            Some(json!({"id": "m1", "sender": "Bob", "content": "hi"})),
        )
        .await;

        let body = call(&h.app, "POST", "/api/chat/messages/remove", Some(json!({"id": "m1"}))).await;
        assert_eq!(body["data"]["removed"], true);

        let body = call(&h.app, "POST", "/api/chat/messages/remove", Some(json!({"id": "m1"}))).await;
        assert_eq!(body["data"]["removed"], false);
    }

    #[tokio::test]
    async fn test_participants_fill_defaults_and_assign() {
        let h = harness().await;
        call(
            &h.app,
            "PUT",
            "/api/chat/identity",
            Some(json!({"user_name": "Me", "character_name": "Bob"})),
        )
        .await;
        call(
            &h.app,
            "POST",
            "/api/chat/messages",
            Some(json!({"id": "m1", "sender": "Bob", "content": "hi"})),
        )
        .await;

        let body = call(&h.app, "GET", "/api/participants?fill_defaults=true", None).await;
        assert_eq!(body["errno"], 0);
        let rows = body["data"]["rows"].as_array().unwrap();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|row| row["assigned"] == true));
        assert_eq!(body["data"]["filled"], rows.len());

        let body = call(
            &h.app,
            "POST",
            "/api/participants/voice",
            Some(json!({"name": "Bob", "voice": "nova"})),
        )
        .await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["voice"], "nova");
        assert_eq!(h.settings.voice_for("Bob").as_deref(), Some("nova"));
    }

    #[tokio::test]
    async fn test_assign_unknown_voice_is_rejected() {
        let h = harness().await;
        let body = call(
            &h.app,
            "POST",
            "/api/participants/voice",
            Some(json!({"name": "Bob", "voice": "nope"})),
        )
        .await;
        assert_ne!(body["errno"], 0);
        assert!(h.settings.voice_for("Bob").is_none());
    }

    #[tokio::test]
    async fn test_preview_completes() {
        let h = harness().await;
        let body = call(
            &h.app,
            "POST",
            "/api/participants/preview",
            Some(json!({"name": "Bob", "voice": "nova"})),
        )
        .await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["outcome"], "completed");
        assert!(h.clip_store.is_empty());
    }

    #[tokio::test]
    async fn test_activate_bound_control() {
        let h = harness().await;
        call(
            &h.app,
            "POST",
            "/api/chat/messages",
            Some(json!({"id": "m1", "sender": "Bob", "content": "“Hi”"})),
        )
        .await;
        h.reconcile.handle(ReconcileChat);

        let body = call(
            &h.app,
            "POST",
            "/api/controls/activate",
            Some(json!({"control_id": "quote:m1:0"})),
        )
        .await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["accepted"], true);
        assert_eq!(body["data"]["state"], "loading");
    }

    #[tokio::test]
    async fn test_back_to_back_activations_accept_only_first() {
        let h = harness().await;
        call(
            &h.app,
            "POST",
            "/api/chat/messages",
            Some(json!({"id": "m1", "sender": "Bob", "content": "“Hi”"})),
        )
        .await;
        h.reconcile.handle(ReconcileChat);

        let activate = Some(json!({"control_id": "quote:m1:0"}));
        let first = call(&h.app, "POST", "/api/controls/activate", activate.clone()).await;
        let second = call(&h.app, "POST", "/api/controls/activate", activate).await;

        assert_eq!(first["data"]["accepted"], true);
        assert_eq!(second["errno"], 0);
        assert_eq!(second["data"]["accepted"], false);
        assert_ne!(second["data"]["state"], "idle");
    }

    #[tokio::test]
    async fn test_activate_unknown_control() {
        let h = harness().await;
        let body = call(
            &h.app,
            "POST",
            "/api/controls/activate",
            Some(json!({"control_id": "quote:none:0"})),
        )
        .await;
        assert_eq!(body["errno"], 404);
    }

    #[tokio::test]
    async fn test_audio_clip_served_while_stored() {
        let h = harness().await;
        let clip_id = h.clip_store.insert(StoredClip {
            control_id: crate::application::ControlId::new("quote:m1:0"),
            data: Arc::new(vec![1, 2, 3]),
            format: AudioFormat::Mp3,
            duration_ms: 10,
            created_at: Utc::now(),
        });

        let response = send(&h.app, "GET", &format!("/api/audio/{}", clip_id), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "audio/mpeg");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.as_ref(), &[1, 2, 3]);

        h.clip_store.revoke(&clip_id);
        let response = send(&h.app, "GET", &format!("/api/audio/{}", clip_id), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_proxy_disabled() {
        let h = harness().await;
        let response = send(
            &h.app,
            "POST",
            "/api/tts/proxy",
            Some(json!({
                "endpoint": "http://127.0.0.1:1/v1/audio/speech",
                "auth_header": "Authorization",
                "credential": "Bearer x",
                "model": "tts-1",
                "input": "hi",
                "voice": "alloy",
                "response_format": "mp3"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_proxy_rejects_endpoint_outside_allowlist() {
        let proxy =
            SpeechProxy::new(2, vec!["http://127.0.0.1:1/v1/audio/speech".to_string()]).unwrap();
        let h = harness_with_proxy(Some(proxy)).await;
        let response = send(
            &h.app,
            "POST",
            "/api/tts/proxy",
            Some(json!({
                "endpoint": "http://169.254.169.254/latest/meta-data",
                "auth_header": "Authorization",
                "credential": "Bearer x",
                "model": "tts-1",
                "input": "hi",
                "voice": "alloy",
                "response_format": "mp3"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
