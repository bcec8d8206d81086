// User account domain model
use crate::domain::ValidationError;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A user account row as stored in the hosted database.
///
/// Rows are created by the registration flow, which is outside this service;
/// here they are only read and partially updated, never deleted. The password
/// hash never leaves the server in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub imei: String,
    pub is_vip: bool,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
    pub expired_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub current_device: Option<String>,
}

/// Partial update body as it arrives on the wire.
///
/// `expired_at` is tri-state: a missing key leaves the stored value alone,
/// while an explicit null or empty string clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub imei: Option<String>,
    pub is_vip: Option<bool>,
    pub is_banned: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub expired_at: Option<Option<String>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Normalized field set ready to be persisted.
///
/// Serializes to the PATCH body sent to the database: absent fields are
/// omitted entirely, a cleared expiration becomes an explicit null.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imei: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_banned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<Option<String>>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.imei.is_none()
            && self.is_vip.is_none()
            && self.is_banned.is_none()
            && self.expired_at.is_none()
    }

    pub fn ban(banned: bool) -> Self {
        Self {
            is_banned: Some(banned),
            ..Self::default()
        }
    }

    pub fn vip(vip: bool) -> Self {
        Self {
            is_vip: Some(vip),
            ..Self::default()
        }
    }
}

impl UserUpdate {
    /// Validate and normalize the raw update into a persistable field set.
    pub fn into_changes(self) -> Result<UserChanges, ValidationError> {
        let expired_at = match self.expired_at {
            None => None,
            Some(raw) => Some(normalize_expiration(raw)?),
        };
        Ok(UserChanges {
            name: self.name,
            phone: self.phone,
            imei: self.imei,
            is_vip: self.is_vip,
            is_banned: self.is_banned,
            expired_at,
        })
    }
}

/// Empty or null expiration values mean "no expiration"; anything else must
/// parse as a date and is stored as a canonical RFC 3339 UTC timestamp.
fn normalize_expiration(raw: Option<String>) -> Result<Option<String>, ValidationError> {
    let Some(raw) = raw else { return Ok(None) };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        let canonical = timestamp
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        return Ok(Some(canonical));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            let canonical = midnight.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true);
            return Ok(Some(canonical));
        }
    }

    Err(ValidationError::new(
        "expired_at",
        format!("'{trimmed}' is not a recognized date"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_expiration_clears_the_field() {
        assert_eq!(normalize_expiration(None).unwrap(), None);
        assert_eq!(normalize_expiration(Some("".into())).unwrap(), None);
        assert_eq!(normalize_expiration(Some("   ".into())).unwrap(), None);
    }

    #[test]
    fn date_only_expiration_becomes_utc_midnight() {
        let normalized = normalize_expiration(Some("2026-03-01".into())).unwrap();
        assert_eq!(normalized.as_deref(), Some("2026-03-01T00:00:00Z"));
    }

    #[test]
    fn rfc3339_expiration_is_canonicalized_to_utc() {
        let normalized = normalize_expiration(Some("2026-03-01T10:30:00+02:00".into())).unwrap();
        assert_eq!(normalized.as_deref(), Some("2026-03-01T08:30:00Z"));
    }

    #[test]
    fn unparseable_expiration_names_the_field() {
        let err = normalize_expiration(Some("soon".into())).unwrap_err();
        assert_eq!(err.field, "expired_at");
    }

    #[test]
    fn missing_expiration_key_leaves_the_field_alone() {
        let update: UserUpdate = serde_json::from_str(r#"{ "name": "alice" }"#).unwrap();
        let changes = update.into_changes().unwrap();
        assert_eq!(changes.name.as_deref(), Some("alice"));
        assert_eq!(changes.expired_at, None);
    }

    #[test]
    fn explicit_null_expiration_is_preserved_as_a_clear() {
        let update: UserUpdate = serde_json::from_str(r#"{ "expired_at": null }"#).unwrap();
        let changes = update.into_changes().unwrap();
        assert_eq!(changes.expired_at, Some(None));
    }

    #[test]
    fn changes_serialize_cleared_expiration_as_null() {
        let changes = UserChanges {
            expired_at: Some(None),
            ..UserChanges::default()
        };
        let body = serde_json::to_value(&changes).unwrap();
        assert_eq!(body, serde_json::json!({ "expired_at": null }));
    }

    #[test]
    fn changes_omit_untouched_fields() {
        let body = serde_json::to_value(UserChanges::ban(true)).unwrap();
        assert_eq!(body, serde_json::json!({ "is_banned": true }));
    }

    #[test]
    fn password_hash_never_serializes() {
        let user = User {
            id: "u1".into(),
            name: "alice".into(),
            phone: "15550001111".into(),
            password: "argon2-hash".into(),
            imei: "356938035643809".into(),
            is_vip: false,
            is_banned: false,
            created_at: Utc::now(),
            expired_at: None,
            last_login: None,
            current_device: None,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["phone"], "15550001111");
    }
}
