// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::application::analytics_service::AnalyticsService;
use crate::application::user_service::UserService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::postgrest_repository::PostgrestRepository;
use crate::infrastructure::postgrest_settings::PostgrestSettings;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    activity_trend, ban_user, get_settings, get_user, health_check, list_users, set_vip, stats,
    unban_user, update_settings, update_user,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let app_config = load_app_config()?;

    // Create the repository and settings store (infrastructure layer)
    let repository = Arc::new(PostgrestRepository::new(
        app_config.database.host.clone(),
        app_config.database.api_key.clone(),
        app_config.database.users_table.clone(),
    ));
    let settings = Arc::new(PostgrestSettings::new(
        app_config.database.host,
        app_config.database.api_key,
        app_config.database.settings_table,
    ));

    // Create services (application layer)
    let user_service = UserService::new(repository.clone());
    let analytics_service = AnalyticsService::new(repository.clone());

    // Create application state
    let state = Arc::new(AppState {
        user_service,
        analytics_service,
        settings,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/api/users", get(list_users))
        .route("/api/users/:id", get(get_user).put(update_user))
        .route("/api/users/:id/ban", post(ban_user))
        .route("/api/users/:id/unban", post(unban_user))
        .route("/api/users/:id/vip", post(set_vip))
        .route("/api/analytics/stats", get(stats))
        .route("/api/analytics/activity", get(activity_trend))
        .route("/api/settings", get(get_settings).put(update_settings))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = app_config.server.bind.parse()?;
    println!("Starting user-console service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
