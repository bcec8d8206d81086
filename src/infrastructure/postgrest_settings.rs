// Durable settings store backed by a single row in the hosted database
use crate::application::settings_store::SettingsStore;
use crate::domain::settings::{AppSettings, SettingsPatch};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

const SETTINGS_ROW_ID: i64 = 1;

/// Settings persisted as one well-known row, so they survive restarts.
/// A missing row reads as the hardcoded defaults.
#[derive(Debug, Clone)]
pub struct PostgrestSettings {
    host: String,
    api_key: String,
    table: String,
}

#[derive(Debug, Serialize)]
struct SettingsRow<'a> {
    id: i64,
    #[serde(flatten)]
    settings: &'a AppSettings,
}

impl PostgrestSettings {
    pub fn new(host: String, api_key: String, table: String) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            api_key,
            table,
        }
    }

    fn table_url(&self, query: &str) -> String {
        format!("{}/rest/v1/{}?{}", self.host, self.table, query)
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let client = reqwest::Client::new();
        client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .send()
            .await
            .context("failed to reach the settings table")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("settings request failed with status {}: {}", status, body);
        }

        Ok(response)
    }
}

#[async_trait]
impl SettingsStore for PostgrestSettings {
    async fn get(&self) -> Result<AppSettings> {
        let url = self.table_url(&format!("select=*&id=eq.{SETTINGS_ROW_ID}&limit=1"));
        let response = self.send(self.request(Method::GET, &url)).await?;
        let rows = response
            .json::<Vec<AppSettings>>()
            .await
            .context("failed to parse settings row")?;

        Ok(rows.into_iter().next().unwrap_or_default())
    }

    /// Read-merge-upsert. Concurrent updates race at row granularity; the
    /// last write wins.
    async fn update(&self, patch: &SettingsPatch) -> Result<AppSettings> {
        let merged = self.get().await?.merged(patch);

        let url = self.table_url("on_conflict=id");
        let response = self
            .send(
                self.request(Method::POST, &url)
                    .header("Prefer", "resolution=merge-duplicates,return=representation")
                    .json(&SettingsRow {
                        id: SETTINGS_ROW_ID,
                        settings: &merged,
                    }),
            )
            .await?;
        let rows = response
            .json::<Vec<AppSettings>>()
            .await
            .context("failed to parse stored settings row")?;

        Ok(rows.into_iter().next().unwrap_or(merged))
    }
}
