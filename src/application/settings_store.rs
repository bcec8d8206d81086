// Settings store trait and the process-local implementation
use crate::domain::settings::{AppSettings, SettingsPatch};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Current settings record.
    async fn get(&self) -> anyhow::Result<AppSettings>;

    /// Shallow-merge the patch into the stored record and return the result.
    async fn update(&self, patch: &SettingsPatch) -> anyhow::Result<AppSettings>;
}

/// Process-lifetime settings behind an RwLock; a restart resets the record
/// to the hardcoded defaults. The durable variant lives in the
/// infrastructure layer.
#[derive(Debug, Default)]
pub struct InMemorySettings {
    current: RwLock<AppSettings>,
}

#[async_trait]
impl SettingsStore for InMemorySettings {
    async fn get(&self) -> anyhow::Result<AppSettings> {
        Ok(self.current.read().await.clone())
    }

    async fn update(&self, patch: &SettingsPatch) -> anyhow::Result<AppSettings> {
        let mut current = self.current.write().await;
        *current = current.merged(patch);
        Ok(current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_from_the_hardcoded_defaults() {
        let store = InMemorySettings::default();
        assert_eq!(store.get().await.unwrap(), AppSettings::default());
    }

    #[tokio::test]
    async fn update_merges_and_returns_the_new_record() {
        let store = InMemorySettings::default();
        let patch = SettingsPatch {
            notification: Some("maintenance at midnight".into()),
            ..SettingsPatch::default()
        };
        let updated = store.update(&patch).await.unwrap();
        assert_eq!(updated.notification, "maintenance at midnight");
        assert_eq!(updated.app_version, AppSettings::default().app_version);

        let read_back = store.get().await.unwrap();
        assert_eq!(read_back, updated);
    }

    #[tokio::test]
    async fn sequential_partial_updates_compose() {
        let store = InMemorySettings::default();
        store
            .update(&SettingsPatch {
                maintenance_mode: Some(true),
                ..SettingsPatch::default()
            })
            .await
            .unwrap();
        let settings = store
            .update(&SettingsPatch {
                app_version: Some("1.1.0".into()),
                ..SettingsPatch::default()
            })
            .await
            .unwrap();
        assert!(settings.maintenance_mode);
        assert_eq!(settings.app_version, "1.1.0");
    }
}
