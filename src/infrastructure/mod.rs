// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod postgrest_repository;
pub mod postgrest_settings;
