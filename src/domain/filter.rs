// List filter - raw query parsing and the typed filter the repository consumes
use crate::domain::ValidationError;
use serde::Deserialize;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// VIP tri-state filter: match everyone, only VIPs, or only non-VIPs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VipFilter {
    #[default]
    All,
    Vip,
    NonVip,
}

impl VipFilter {
    fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw {
            "all" => Ok(Self::All),
            "vip" => Ok(Self::Vip),
            "non-vip" => Ok(Self::NonVip),
            other => Err(ValidationError::new(
                "is_vip",
                format!("'{other}' is not one of all, vip, non-vip"),
            )),
        }
    }

    /// The equality value to filter on, or `None` for no filter at all.
    pub fn as_flag(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Vip => Some(true),
            Self::NonVip => Some(false),
        }
    }
}

/// Ban tri-state filter: everyone, only banned, or only active accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BanFilter {
    #[default]
    All,
    Banned,
    Active,
}

impl BanFilter {
    fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw {
            "all" => Ok(Self::All),
            "banned" => Ok(Self::Banned),
            "active" => Ok(Self::Active),
            other => Err(ValidationError::new(
                "is_banned",
                format!("'{other}' is not one of all, banned, active"),
            )),
        }
    }

    pub fn as_flag(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Banned => Some(true),
            Self::Active => Some(false),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    Name,
    #[default]
    CreatedAt,
    LastLogin,
    ExpiredAt,
}

impl SortField {
    fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw {
            "name" => Ok(Self::Name),
            "created_at" => Ok(Self::CreatedAt),
            "last_login" => Ok(Self::LastLogin),
            "expired_at" => Ok(Self::ExpiredAt),
            other => Err(ValidationError::new(
                "sortBy",
                format!("'{other}' is not a sortable column"),
            )),
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CreatedAt => "created_at",
            Self::LastLogin => "last_login",
            Self::ExpiredAt => "expired_at",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ValidationError::new(
                "sortOrder",
                format!("'{other}' is not one of asc, desc"),
            )),
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Raw query-string values exactly as they arrive on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub is_vip: Option<String>,
    pub is_banned: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl FilterQuery {
    /// Produce the typed filter, or fail naming the offending field.
    /// Missing fields fall back to the documented defaults.
    pub fn validate(self) -> Result<UserFilter, ValidationError> {
        let vip = match self.is_vip.as_deref() {
            None => VipFilter::All,
            Some(raw) => VipFilter::parse(raw)?,
        };
        let ban = match self.is_banned.as_deref() {
            None => BanFilter::All,
            Some(raw) => BanFilter::parse(raw)?,
        };
        let sort_by = match self.sort_by.as_deref() {
            None => SortField::CreatedAt,
            Some(raw) => SortField::parse(raw)?,
        };
        let sort_order = match self.sort_order.as_deref() {
            None => SortOrder::Desc,
            Some(raw) => SortOrder::parse(raw)?,
        };
        let page = parse_positive("page", self.page.as_deref(), DEFAULT_PAGE)?;
        let limit = parse_positive("limit", self.limit.as_deref(), DEFAULT_PAGE_SIZE)?;

        Ok(UserFilter {
            name: self.name.filter(|s| !s.is_empty()),
            phone: self.phone.filter(|s| !s.is_empty()),
            vip,
            ban,
            sort_by,
            sort_order,
            page,
            limit,
        })
    }
}

fn parse_positive(
    field: &'static str,
    raw: Option<&str>,
    default: u32,
) -> Result<u32, ValidationError> {
    let Some(raw) = raw else { return Ok(default) };
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::new(field, format!("'{raw}' is not a positive integer")))?;
    if value == 0 {
        return Err(ValidationError::new(field, "must be at least 1"));
    }
    Ok(value)
}

/// Validated list filter consumed by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFilter {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub vip: VipFilter,
    pub ban: BanFilter,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl Default for UserFilter {
    fn default() -> Self {
        Self {
            name: None,
            phone: None,
            vip: VipFilter::All,
            ban: BanFilter::All,
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl UserFilter {
    /// Zero-based row offset of the requested page.
    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_takes_the_documented_defaults() {
        let filter = FilterQuery::default().validate().unwrap();
        assert_eq!(filter, UserFilter::default());
        assert_eq!(filter.sort_by, SortField::CreatedAt);
        assert_eq!(filter.sort_order, SortOrder::Desc);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
    }

    #[test]
    fn full_query_parses_every_field() {
        let query = FilterQuery {
            name: Some("ali".into()),
            phone: Some("555".into()),
            is_vip: Some("vip".into()),
            is_banned: Some("active".into()),
            sort_by: Some("last_login".into()),
            sort_order: Some("asc".into()),
            page: Some("3".into()),
            limit: Some("25".into()),
        };
        let filter = query.validate().unwrap();
        assert_eq!(filter.name.as_deref(), Some("ali"));
        assert_eq!(filter.vip, VipFilter::Vip);
        assert_eq!(filter.ban, BanFilter::Active);
        assert_eq!(filter.sort_by, SortField::LastLogin);
        assert_eq!(filter.sort_order, SortOrder::Asc);
        assert_eq!(filter.offset(), 50);
    }

    #[test]
    fn unknown_vip_value_names_the_field() {
        let query = FilterQuery {
            is_vip: Some("sometimes".into()),
            ..FilterQuery::default()
        };
        let err = query.validate().unwrap_err();
        assert_eq!(err.field, "is_vip");
    }

    #[test]
    fn unknown_sort_column_names_the_field() {
        let query = FilterQuery {
            sort_by: Some("password".into()),
            ..FilterQuery::default()
        };
        let err = query.validate().unwrap_err();
        assert_eq!(err.field, "sortBy");
    }

    #[test]
    fn zero_and_junk_pagination_values_are_rejected() {
        let query = FilterQuery {
            page: Some("0".into()),
            ..FilterQuery::default()
        };
        assert_eq!(query.validate().unwrap_err().field, "page");

        let query = FilterQuery {
            limit: Some("ten".into()),
            ..FilterQuery::default()
        };
        assert_eq!(query.validate().unwrap_err().field, "limit");
    }

    #[test]
    fn empty_substring_filters_are_dropped() {
        let query = FilterQuery {
            name: Some(String::new()),
            ..FilterQuery::default()
        };
        let filter = query.validate().unwrap();
        assert_eq!(filter.name, None);
    }
}
