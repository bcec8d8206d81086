// Analytics domain models and the activity-trend bucketing
use crate::domain::ValidationError;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_TREND_DAYS: u32 = 7;
pub const MAX_TREND_DAYS: u32 = 365;

/// Aggregate user counts. Each count comes from an independent read, so the
/// numbers may reflect slightly different instants under concurrent writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: u64,
    pub active: u64,
    pub banned: u64,
    pub vip: u64,
    pub new_last_week: u64,
}

/// One day of the signup trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPoint {
    pub date: String,
    pub user_count: u64,
}

/// Parse the requested trend window, defaulting to a week.
pub fn parse_days(raw: Option<&str>) -> Result<u32, ValidationError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TREND_DAYS);
    };
    let days: u32 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::new("days", format!("'{raw}' is not a positive integer")))?;
    if days == 0 || days > MAX_TREND_DAYS {
        return Err(ValidationError::new(
            "days",
            format!("must be between 1 and {MAX_TREND_DAYS}"),
        ));
    }
    Ok(days)
}

/// Bucket signup days into one count per calendar date.
///
/// Buckets are initialized to zero for each of the `days` dates ending at
/// `today`, so days without signups still appear in the output, and days
/// outside the window are ignored. The `BTreeMap` keeps the emitted points
/// in ascending date order.
pub fn activity_trend(today: NaiveDate, days: u32, signup_days: &[NaiveDate]) -> Vec<ActivityPoint> {
    let mut buckets: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for offset in 0..days {
        buckets.insert(today - Duration::days(i64::from(offset)), 0);
    }

    for day in signup_days {
        if let Some(count) = buckets.get_mut(day) {
            *count += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(date, user_count)| ActivityPoint {
            date: date.format("%Y-%m-%d").to_string(),
            user_count,
        })
        .collect()
}
