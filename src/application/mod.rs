// Application layer - Use cases and the ports they depend on
pub mod analytics_service;
pub mod settings_store;
pub mod user_repository;
pub mod user_service;
