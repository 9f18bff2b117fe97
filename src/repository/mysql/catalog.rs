use async_trait::async_trait;
use chrono::Utc;

use super::MySqlStore;
use crate::{
    error::AppResult,
    model::catalog::{CatalogEntry, CatalogKind},
    models::PageRequest,
    repository::CatalogRepository,
    utils::db_utils::search_clause,
};

// Table and column names below come from `CatalogKind`, never from input.

fn select(kind: CatalogKind) -> String {
    format!(
        "SELECT id, code, name, is_active, created_at, created_by, updated_at, updated_by FROM {}",
        kind.table()
    )
}

#[async_trait]
impl CatalogRepository for MySqlStore {
    async fn find_by_id(&self, kind: CatalogKind, id: u64) -> AppResult<Option<CatalogEntry>> {
        let sql = format!("{} WHERE id = ?", select(kind));
        Ok(sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_code(
        &self,
        kind: CatalogKind,
        code: &str,
    ) -> AppResult<Option<CatalogEntry>> {
        let sql = format!("{} WHERE code = ?", select(kind));
        Ok(sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list(
        &self,
        kind: CatalogKind,
        page: &PageRequest,
    ) -> AppResult<(Vec<CatalogEntry>, i64)> {
        let filter = search_clause(&["name", "code"], page.search.as_deref());

        let count_sql = format!("SELECT COUNT(*) FROM {}{}", kind.table(), filter.sql);
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
        for value in &filter.values {
            count = count.bind(value);
        }
        let total = count.fetch_one(&self.pool).await?;

        let sql = format!("{}{} ORDER BY id LIMIT ? OFFSET ?", select(kind), filter.sql);
        let mut query = sqlx::query_as::<_, CatalogEntry>(&sql);
        for value in &filter.values {
            query = query.bind(value);
        }
        let items = query
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((items, total))
    }

    async fn list_active(&self, kind: CatalogKind) -> AppResult<Vec<CatalogEntry>> {
        let sql = format!("{} WHERE is_active = TRUE ORDER BY name", select(kind));
        Ok(sqlx::query_as::<_, CatalogEntry>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create(
        &self,
        kind: CatalogKind,
        code: &str,
        name: &str,
        actor: &str,
    ) -> AppResult<u64> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO {} (code, name, is_active, created_at, created_by, updated_at, updated_by) \
             VALUES (?, ?, TRUE, ?, ?, ?, ?)",
            kind.table()
        );

        let result = sqlx::query(&sql)
            .bind(code)
            .bind(name)
            .bind(now)
            .bind(actor)
            .bind(now)
            .bind(actor)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_id())
    }

    async fn update(&self, kind: CatalogKind, entry: &CatalogEntry, actor: &str) -> AppResult<()> {
        let sql = format!(
            "UPDATE {} SET code = ?, name = ?, is_active = ?, updated_at = ?, updated_by = ? WHERE id = ?",
            kind.table()
        );

        sqlx::query(&sql)
            .bind(&entry.code)
            .bind(&entry.name)
            .bind(entry.is_active)
            .bind(Utc::now())
            .bind(actor)
            .bind(entry.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_members(&self, kind: CatalogKind, id: u64) -> AppResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM users WHERE {} = ?", kind.user_column());
        Ok(sqlx::query_scalar::<_, i64>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn deactivate(&self, kind: CatalogKind, id: u64, actor: &str) -> AppResult<()> {
        let sql = format!(
            "UPDATE {} SET is_active = FALSE, updated_at = ?, updated_by = ? WHERE id = ?",
            kind.table()
        );

        sqlx::query(&sql)
            .bind(Utc::now())
            .bind(actor)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, kind: CatalogKind, id: u64) -> AppResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", kind.table());
        sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(())
    }
}
