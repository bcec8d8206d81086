// Application settings record and merge semantics
use serde::{Deserialize, Serialize};

/// Mutable application-wide settings.
///
/// Fields merge independently on update; there is no atomicity guarantee
/// across fields and the last write wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub registration_enabled: bool,
    pub maintenance_mode: bool,
    pub vip_features: Vec<String>,
    pub app_version: String,
    pub notification: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            registration_enabled: true,
            maintenance_mode: false,
            vip_features: Vec::new(),
            app_version: "1.0.0".to_string(),
            notification: String::new(),
        }
    }
}

/// Partial settings update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub registration_enabled: Option<bool>,
    pub maintenance_mode: Option<bool>,
    pub vip_features: Option<Vec<String>>,
    pub app_version: Option<String>,
    pub notification: Option<String>,
}

impl AppSettings {
    /// Shallow merge: fields present in the patch replace the current value.
    pub fn merged(&self, patch: &SettingsPatch) -> AppSettings {
        AppSettings {
            registration_enabled: patch
                .registration_enabled
                .unwrap_or(self.registration_enabled),
            maintenance_mode: patch.maintenance_mode.unwrap_or(self.maintenance_mode),
            vip_features: patch
                .vip_features
                .clone()
                .unwrap_or_else(|| self.vip_features.clone()),
            app_version: patch
                .app_version
                .clone()
                .unwrap_or_else(|| self.app_version.clone()),
            notification: patch
                .notification
                .clone()
                .unwrap_or_else(|| self.notification.clone()),
        }
    }
}
