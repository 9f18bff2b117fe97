use async_trait::async_trait;
use chrono::NaiveDate;

use super::MySqlStore;
use crate::{
    error::AppResult,
    model::statistics::{DivisionCount, PositionCount, Statistics},
    repository::StatsRepository,
};

impl MySqlStore {
    async fn count(&self, sql: &str) -> AppResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await?)
    }
}

#[async_trait]
impl StatsRepository for MySqlStore {
    async fn statistics(&self, month_start: NaiveDate) -> AppResult<Statistics> {
        let total_users = self.count("SELECT COUNT(*) FROM users").await?;
        let active_users = self
            .count("SELECT COUNT(*) FROM users WHERE is_active = TRUE")
            .await?;
        let total_divisions = self.count("SELECT COUNT(*) FROM divisions").await?;
        let total_positions = self.count("SELECT COUNT(*) FROM positions").await?;

        let users_per_division = sqlx::query_as::<_, DivisionCount>(
            r#"
            SELECT d.name AS division, COUNT(u.id) AS count
            FROM users u
            JOIN divisions d ON d.id = u.division_id
            WHERE u.is_active = TRUE
            GROUP BY d.id, d.name
            ORDER BY d.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let users_per_position = sqlx::query_as::<_, PositionCount>(
            r#"
            SELECT p.name AS position, COUNT(u.id) AS count
            FROM users u
            JOIN positions p ON p.id = u.position_id
            WHERE u.is_active = TRUE
            GROUP BY p.id, p.name
            ORDER BY p.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let new_users_this_month =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE join_date >= ?")
                .bind(month_start)
                .fetch_one(&self.pool)
                .await?;

        Ok(Statistics {
            total_users,
            active_users,
            total_divisions,
            total_positions,
            users_per_division,
            users_per_position,
            new_users_this_month,
        })
    }
}
