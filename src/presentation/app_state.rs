// Application state for HTTP handlers
use crate::application::analytics_service::AnalyticsService;
use crate::application::settings_store::SettingsStore;
use crate::application::user_service::UserService;
use std::sync::Arc;

pub struct AppState {
    pub user_service: UserService,
    pub analytics_service: AnalyticsService,
    pub settings: Arc<dyn SettingsStore>,
}
