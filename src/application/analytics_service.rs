// Analytics service - Concurrent stat counts and the signup trend
use crate::application::user_repository::{UserCount, UserRepository};
use crate::domain::analytics::{activity_trend, ActivityPoint, UserStats};
use chrono::{Duration, Local, NaiveDate, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct AnalyticsService {
    repository: Arc<dyn UserRepository>,
}

impl AnalyticsService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Five independent counts issued concurrently and joined. Each count is
    /// its own read; no cross-count snapshot is taken.
    pub async fn stats(&self) -> anyhow::Result<UserStats> {
        let week_ago = Utc::now() - Duration::days(7);
        let (total, active, banned, vip, new_last_week) = futures::try_join!(
            self.repository.count(UserCount::Total),
            self.repository.count(UserCount::Active),
            self.repository.count(UserCount::Banned),
            self.repository.count(UserCount::Vip),
            self.repository.count(UserCount::CreatedSince(week_ago)),
        )?;

        Ok(UserStats {
            total,
            active,
            banned,
            vip,
            new_last_week,
        })
    }

    /// Per-day signup counts for the trailing `days` window, zero-filled and
    /// ascending. Days are bucketed on the process-local calendar.
    pub async fn activity(&self, days: u32) -> anyhow::Result<Vec<ActivityPoint>> {
        // Fetch from a cutoff at or before the first local midnight of the
        // window; the bucketing clamps anything earlier away.
        let since = Utc::now() - Duration::days(i64::from(days));
        let creations = self.repository.created_since(since).await?;

        let today = Local::now().date_naive();
        let signup_days: Vec<NaiveDate> = creations
            .iter()
            .map(|created| created.with_timezone(&Local).date_naive())
            .collect();
        Ok(activity_trend(today, days, &signup_days))
    }
}
