use async_trait::async_trait;
use chrono::Utc;

use super::MySqlStore;
use crate::{
    error::AppResult,
    model::role::Role,
    models::PageRequest,
    repository::RoleRepository,
    utils::db_utils::search_clause,
};

const ROLE_SELECT: &str = r#"
    SELECT id, name, level, is_active, created_at, created_by, updated_at, updated_by
    FROM roles
"#;

#[async_trait]
impl RoleRepository for MySqlStore {
    async fn find_by_id(&self, id: u64) -> AppResult<Option<Role>> {
        let sql = format!("{ROLE_SELECT} WHERE id = ?");
        Ok(sqlx::query_as::<_, Role>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let sql = format!("{ROLE_SELECT} WHERE name = ?");
        Ok(sqlx::query_as::<_, Role>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list(&self, page: &PageRequest) -> AppResult<(Vec<Role>, i64)> {
        let filter = search_clause(&["name"], page.search.as_deref());

        let count_sql = format!("SELECT COUNT(*) FROM roles{}", filter.sql);
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
        for value in &filter.values {
            count = count.bind(value);
        }
        let total = count.fetch_one(&self.pool).await?;

        let sql = format!("{ROLE_SELECT}{} ORDER BY id LIMIT ? OFFSET ?", filter.sql);
        let mut query = sqlx::query_as::<_, Role>(&sql);
        for value in &filter.values {
            query = query.bind(value);
        }
        let roles = query
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((roles, total))
    }

    async fn list_active(&self) -> AppResult<Vec<Role>> {
        let sql = format!("{ROLE_SELECT} WHERE is_active = TRUE ORDER BY level DESC, id");
        Ok(sqlx::query_as::<_, Role>(&sql).fetch_all(&self.pool).await?)
    }

    async fn create(&self, name: &str, level: i32, actor: &str) -> AppResult<u64> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO roles (name, level, is_active, created_at, created_by, updated_at, updated_by)
            VALUES (?, ?, TRUE, ?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(level)
        .bind(now)
        .bind(actor)
        .bind(now)
        .bind(actor)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn update(&self, role: &Role, actor: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE roles SET name = ?, level = ?, is_active = ?, updated_at = ?, updated_by = ? WHERE id = ?",
        )
        .bind(&role.name)
        .bind(role.level)
        .bind(role.is_active)
        .bind(Utc::now())
        .bind(actor)
        .bind(role.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn count_assignments(&self, id: u64) -> AppResult<i64> {
        Ok(
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_roles WHERE role_id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn deactivate(&self, id: u64, actor: &str) -> AppResult<()> {
        sqlx::query("UPDATE roles SET is_active = FALSE, updated_at = ?, updated_by = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(actor)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, id: u64) -> AppResult<()> {
        sqlx::query("DELETE FROM roles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
