use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};

use crate::{error::AppResult, model::statistics::Statistics, repository::StatsRepository};

pub struct DashboardService {
    stats: Arc<dyn StatsRepository>,
}

impl DashboardService {
    pub fn new(stats: Arc<dyn StatsRepository>) -> Self {
        Self { stats }
    }

    pub async fn statistics(&self) -> AppResult<Statistics> {
        self.stats
            .statistics(month_start(Utc::now().date_naive()))
            .await
    }
}

fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}
