use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub host: String,
    pub api_key: String,
    /// The one place the user table is named; every operation goes through it.
    #[serde(default = "default_users_table")]
    pub users_table: String,
    #[serde(default = "default_settings_table")]
    pub settings_table: String,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_users_table() -> String {
    "users".to_string()
}

fn default_settings_table() -> String {
    "app_settings".to_string()
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/app"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_and_bind_address_have_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[server]\n[database]\nhost = \"https://db.example.com\"\napi_key = \"key\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.database.users_table, "users");
        assert_eq!(config.database.settings_table, "app_settings");
    }
}
