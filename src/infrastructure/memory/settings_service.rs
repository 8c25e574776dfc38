//! Debounced Settings Service
//!
//! 进程内唯一的 `characterMap`。每次修改把最新快照交给后台保存任务，
//! 保存任务在最后一次修改后静默 `debounce` 时长才写出，连续修改合并为一次写入

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

use crate::application::ports::{
    Settings, SettingsError, SettingsServicePort, SettingsStorePort,
};

enum SaveCommand {
    /// 安排保存（携带最新快照）
    Schedule(Settings),
    /// 立即写出待保存的快照
    Flush(oneshot::Sender<Result<(), SettingsError>>),
}

/// 防抖设置服务
pub struct DebouncedSettingsService {
    character_map: Mutex<BTreeMap<String, String>>,
    command_sender: mpsc::UnboundedSender<SaveCommand>,
}

impl DebouncedSettingsService {
    /// 从存储加载设置并启动后台保存任务
    pub async fn spawn(
        store: Arc<dyn SettingsStorePort>,
        debounce: Duration,
    ) -> Result<Self, SettingsError> {
        let settings = store.load().await?;
        let (command_sender, command_receiver) = mpsc::unbounded_channel();

        tracing::info!(
            entries = settings.character_map.len(),
            debounce_ms = debounce.as_millis() as u64,
            "Settings loaded"
        );

        let saver = SettingsSaver {
            store,
            debounce,
            commands: command_receiver,
        };
        tokio::spawn(saver.run());

        Ok(Self {
            character_map: Mutex::new(settings.character_map),
            command_sender,
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.character_map.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl SettingsServicePort for DebouncedSettingsService {
    fn voice_for(&self, name: &str) -> Option<String> {
        self.lock().get(name).cloned()
    }

    fn assign(&self, name: &str, voice: &str) {
        let mut map = self.lock();
        if map.get(name).map(String::as_str) == Some(voice) {
            return;
        }
        map.insert(name.to_string(), voice.to_string());

        // 持锁发送，保证保存任务收到的快照顺序与修改顺序一致
        let snapshot = Settings {
            character_map: map.clone(),
        };
        if self
            .command_sender
            .send(SaveCommand::Schedule(snapshot))
            .is_err()
        {
            tracing::warn!(participant = %name, "Settings saver stopped, change not persisted");
        }
    }

    fn snapshot(&self) -> Settings {
        Settings {
            character_map: self.lock().clone(),
        }
    }

    async fn flush(&self) -> Result<(), SettingsError> {
        let (reply, done) = oneshot::channel();
        self.command_sender
            .send(SaveCommand::Flush(reply))
            .map_err(|_| SettingsError::ServiceStopped)?;
        done.await.map_err(|_| SettingsError::ServiceStopped)?
    }
}

/// 后台保存任务
struct SettingsSaver {
    store: Arc<dyn SettingsStorePort>,
    debounce: Duration,
    commands: mpsc::UnboundedReceiver<SaveCommand>,
}

impl SettingsSaver {
    async fn run(mut self) {
        tracing::debug!("Settings saver started");
        let mut pending: Option<Settings> = None;

        loop {
            let command = if pending.is_some() {
                match tokio::time::timeout(self.debounce, self.commands.recv()).await {
                    Ok(command) => command,
                    Err(_) => {
                        // 静默期结束；失败时保留快照，下一个静默期后重试
                        let _ = self.write(&mut pending).await;
                        continue;
                    }
                }
            } else {
                self.commands.recv().await
            };

            match command {
                Some(SaveCommand::Schedule(settings)) => pending = Some(settings),
                Some(SaveCommand::Flush(reply)) => {
                    let result = self.write(&mut pending).await;
                    let _ = reply.send(result);
                }
                None => {
                    let _ = self.write(&mut pending).await;
                    break;
                }
            }
        }

        tracing::debug!("Settings saver stopped");
    }

    /// 写出待保存的快照；只有写入成功才清空
    async fn write(&self, pending: &mut Option<Settings>) -> Result<(), SettingsError> {
        let Some(settings) = pending.as_ref() else {
            return Ok(());
        };

        match self.store.save(settings).await {
            Ok(()) => {
                tracing::debug!(entries = settings.character_map.len(), "Settings saved");
                *pending = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save settings");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStore {
        saves: AtomicUsize,
        last: Mutex<Option<Settings>>,
        initial: Settings,
        /// 接下来需要失败的写入次数
        failures: AtomicUsize,
    }

    #[async_trait]
    impl SettingsStorePort for CountingStore {
        async fn load(&self) -> Result<Settings, SettingsError> {
            Ok(self.initial.clone())
        }

        async fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
            if self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(SettingsError::DatabaseError("disk full".to_string()));
            }
            self.saves.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(settings.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_loads_existing_settings() {
        let mut initial = Settings::default();
        initial
            .character_map
            .insert("Alice".to_string(), "voice-b".to_string());
        let store = Arc::new(CountingStore {
            initial,
            ..CountingStore::default()
        });

        let service = DebouncedSettingsService::spawn(store, Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(service.voice_for("Alice").as_deref(), Some("voice-b"));
        assert_eq!(service.voice_for("Bob"), None);
    }

    #[tokio::test]
    async fn test_rapid_changes_collapse_into_one_write() {
        let store = Arc::new(CountingStore::default());
        let service = DebouncedSettingsService::spawn(store.clone(), Duration::from_millis(50))
            .await
            .unwrap();

        service.assign("Alice", "voice-a");
        service.assign("Bob", "voice-b");
        service.assign("Alice", "voice-c");

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        let saved = store.last.lock().unwrap().clone().unwrap();
        assert_eq!(saved.character_map.get("Alice").map(String::as_str), Some("voice-c"));
        assert_eq!(saved.character_map.get("Bob").map(String::as_str), Some("voice-b"));
    }

    #[tokio::test]
    async fn test_flush_writes_pending_immediately() {
        let store = Arc::new(CountingStore::default());
        let service = DebouncedSettingsService::spawn(store.clone(), Duration::from_secs(60))
            .await
            .unwrap();

        service.assign("Alice", "voice-a");
        service.flush().await.unwrap();
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);

        // 没有待保存的修改时不写入
        service.flush().await.unwrap();
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unchanged_assignment_schedules_nothing() {
        let store = Arc::new(CountingStore::default());
        let service = DebouncedSettingsService::spawn(store.clone(), Duration::from_secs(60))
            .await
            .unwrap();

        service.assign("Alice", "voice-a");
        service.flush().await.unwrap();
        service.assign("Alice", "voice-a");
        service.flush().await.unwrap();
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_pending_for_next_flush() {
        let store = Arc::new(CountingStore {
            failures: AtomicUsize::new(1),
            ..CountingStore::default()
        });
        let service = DebouncedSettingsService::spawn(store.clone(), Duration::from_secs(60))
            .await
            .unwrap();

        service.assign("Alice", "voice-a");
        assert!(service.flush().await.is_err());
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);

        service.flush().await.unwrap();
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        let saved = store.last.lock().unwrap().clone().unwrap();
        assert_eq!(saved.character_map.get("Alice").map(String::as_str), Some("voice-a"));
    }

    #[tokio::test]
    async fn test_failed_debounced_write_is_retried() {
        let store = Arc::new(CountingStore {
            failures: AtomicUsize::new(1),
            ..CountingStore::default()
        });
        let service = DebouncedSettingsService::spawn(store.clone(), Duration::from_millis(20))
            .await
            .unwrap();

        service.assign("Alice", "voice-a");
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        assert_eq!(store.failures.load(Ordering::SeqCst), 0);
    }
}
