// Hosted-database user repository over its PostgREST-style REST API
use crate::application::user_repository::{UserCount, UserPage, UserRepository};
use crate::domain::filter::UserFilter;
use crate::domain::user::{User, UserChanges};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::CONTENT_RANGE;
use reqwest::Method;
use serde::Deserialize;

/// Repository over the hosted database's REST endpoint. The table name is
/// injected once at construction and every operation goes through it.
#[derive(Debug, Clone)]
pub struct PostgrestRepository {
    host: String,
    api_key: String,
    table: String,
}

impl PostgrestRepository {
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
            .context("failed to reach the user database")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("user database request failed with status {}: {}", status, body);
        }

        Ok(response)
    }

    /// Build the filter expression for a list request.
    ///
    /// Substring filters use `ilike` with `*` wildcards, tri-states become
    /// plain equality, and pagination is expressed as limit/offset.
    fn list_query(filter: &UserFilter) -> String {
        let mut parts = vec!["select=*".to_string()];
        if let Some(name) = &filter.name {
            parts.push(format!(
                "name=ilike.{}",
                urlencoding::encode(&format!("*{name}*"))
            ));
        }
        if let Some(phone) = &filter.phone {
            parts.push(format!(
                "phone=ilike.{}",
                urlencoding::encode(&format!("*{phone}*"))
            ));
        }
        if let Some(vip) = filter.vip.as_flag() {
            parts.push(format!("is_vip=eq.{vip}"));
        }
        if let Some(banned) = filter.ban.as_flag() {
            parts.push(format!("is_banned=eq.{banned}"));
        }
        parts.push(format!(
            "order={}.{}",
            filter.sort_by.column(),
            filter.sort_order.keyword()
        ));
        parts.push(format!("limit={}", filter.limit));
        parts.push(format!("offset={}", filter.offset()));
        parts.join("&")
    }

    fn count_query(kind: UserCount) -> String {
        let condition = match kind {
            UserCount::Total => String::new(),
            UserCount::Active => "&is_banned=eq.false".to_string(),
            UserCount::Banned => "&is_banned=eq.true".to_string(),
            UserCount::Vip => "&is_vip=eq.true".to_string(),
            UserCount::CreatedSince(since) => format!(
                "&created_at=gte.{}",
                urlencoding::encode(&since.to_rfc3339_opts(SecondsFormat::Secs, true))
            ),
        };
        format!("select=id{condition}")
    }

    fn response_total(response: &reqwest::Response) -> Option<u64> {
        response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(content_range_total)
    }
}

/// Total row count from a `Content-Range` header such as `0-9/57` or `*/0`.
fn content_range_total(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.trim().parse().ok()
}

#[derive(Debug, Deserialize)]
struct CreatedRow {
    created_at: DateTime<Utc>,
}

#[async_trait]
impl UserRepository for PostgrestRepository {
    async fn list(&self, filter: &UserFilter) -> Result<UserPage> {
        let url = self.table_url(&Self::list_query(filter));
        tracing::debug!("listing users: {}", url);

        let response = self
            .send(self.request(Method::GET, &url).header("Prefer", "count=exact"))
            .await?;

        // A response without a usable count reads as zero.
        let count = Self::response_total(&response).unwrap_or(0);
        let data = response
            .json::<Vec<User>>()
            .await
            .context("failed to parse user rows")?;

        Ok(UserPage { data, count })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let url = self.table_url(&format!(
            "select=*&id=eq.{}&limit=1",
            urlencoding::encode(id)
        ));
        let response = self.send(self.request(Method::GET, &url)).await?;
        let rows = response
            .json::<Vec<User>>()
            .await
            .context("failed to parse user row")?;

        Ok(rows.into_iter().next())
    }

    async fn update(&self, id: &str, changes: &UserChanges) -> Result<Option<User>> {
        let url = self.table_url(&format!("id=eq.{}", urlencoding::encode(id)));
        tracing::debug!("updating user {}: {:?}", id, changes);

        let response = self
            .send(
                self.request(Method::PATCH, &url)
                    .header("Prefer", "return=representation")
                    .json(changes),
            )
            .await?;
        let rows = response
            .json::<Vec<User>>()
            .await
            .context("failed to parse updated user row")?;

        // PostgREST returns the updated rows; an empty list means no row
        // matched the id.
        Ok(rows.into_iter().next())
    }

    async fn count(&self, kind: UserCount) -> Result<u64> {
        let url = self.table_url(&Self::count_query(kind));
        let response = self
            .send(
                self.request(Method::HEAD, &url)
                    .header("Prefer", "count=exact"),
            )
            .await?;

        Ok(Self::response_total(&response).unwrap_or(0))
    }

    async fn created_since(&self, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>> {
        let url = self.table_url(&format!(
            "select=created_at&created_at=gte.{}",
            urlencoding::encode(&since.to_rfc3339_opts(SecondsFormat::Secs, true))
        ));
        let response = self.send(self.request(Method::GET, &url)).await?;
        let rows = response
            .json::<Vec<CreatedRow>>()
            .await
            .context("failed to parse creation timestamps")?;

        Ok(rows.into_iter().map(|row| row.created_at).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::{BanFilter, FilterQuery, VipFilter};

    #[test]
    fn default_filter_builds_the_default_query() {
        let query = PostgrestRepository::list_query(&UserFilter::default());
        assert_eq!(query, "select=*&order=created_at.desc&limit=10&offset=0");
    }

    #[test]
    fn substring_filters_are_wildcarded_and_encoded() {
        let filter = UserFilter {
            name: Some("an a".into()),
            ..UserFilter::default()
        };
        let query = PostgrestRepository::list_query(&filter);
        assert!(query.contains("name=ilike.%2Aan%20a%2A"));
    }

    #[test]
    fn tri_states_become_equality_filters_only_when_not_all() {
        let filter = UserFilter {
            vip: VipFilter::Vip,
            ban: BanFilter::Active,
            ..UserFilter::default()
        };
        let query = PostgrestRepository::list_query(&filter);
        assert!(query.contains("is_vip=eq.true"));
        assert!(query.contains("is_banned=eq.false"));

        let query = PostgrestRepository::list_query(&UserFilter::default());
        assert!(!query.contains("is_vip"));
        assert!(!query.contains("is_banned"));
    }

    #[test]
    fn pagination_is_offset_times_page() {
        let filter = FilterQuery {
            page: Some("3".into()),
            limit: Some("20".into()),
            ..FilterQuery::default()
        }
        .validate()
        .unwrap();
        let query = PostgrestRepository::list_query(&filter);
        assert!(query.ends_with("limit=20&offset=40"));
    }

    #[test]
    fn count_queries_select_the_id_column_only() {
        assert_eq!(PostgrestRepository::count_query(UserCount::Total), "select=id");
        assert_eq!(
            PostgrestRepository::count_query(UserCount::Active),
            "select=id&is_banned=eq.false"
        );
        assert_eq!(
            PostgrestRepository::count_query(UserCount::Vip),
            "select=id&is_vip=eq.true"
        );
        let since = DateTime::parse_from_rfc3339("2026-07-30T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            PostgrestRepository::count_query(UserCount::CreatedSince(since)),
            "select=id&created_at=gte.2026-07-30T00%3A00%3A00Z"
        );
    }

    #[test]
    fn content_range_totals_parse() {
        assert_eq!(content_range_total("0-9/57"), Some(57));
        assert_eq!(content_range_total("*/0"), Some(0));
        assert_eq!(content_range_total("0-24/3573"), Some(3573));
        assert_eq!(content_range_total("0-9/*"), None);
        assert_eq!(content_range_total("garbage"), None);
    }

    #[test]
    fn host_trailing_slash_is_trimmed() {
        let repository = PostgrestRepository::new(
            "https://db.example.com/".into(),
            "key".into(),
            "users".into(),
        );
        assert_eq!(
            repository.table_url("select=*"),
            "https://db.example.com/rest/v1/users?select=*"
        );
    }
}
