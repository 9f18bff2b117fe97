use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlArguments;
use sqlx::query::QueryAs;
use sqlx::{MySql, Transaction};
use tracing::debug;

use super::MySqlStore;
use crate::{
    error::AppResult,
    model::user::{NewUser, User},
    models::PageRequest,
    repository::UserRepository,
    utils::db_utils::search_clause,
};

const USER_SELECT: &str = r#"
    SELECT u.id, u.uid, u.employee_id, u.name, u.email, u.password, u.phone, u.address,
           u.birthdate, u.join_date, u.profile_image, u.division_id, u.position_id,
           u.is_manager, u.manager_id, u.is_active,
           u.created_at, u.created_by, u.updated_at, u.updated_by,
           d.name AS division_name, p.name AS position_name, m.name AS manager_name
    FROM users u
    LEFT JOIN divisions d ON d.id = u.division_id
    LEFT JOIN positions p ON p.id = u.position_id
    LEFT JOIN users m ON m.id = u.manager_id
"#;

const SEARCH_COLUMNS: [&str; 3] = ["u.name", "u.email", "u.employee_id"];

impl MySqlStore {
    /// Runs a single-user lookup built on `USER_SELECT` and attaches its roles.
    async fn fetch_user(
        &self,
        query: QueryAs<'_, MySql, User, MySqlArguments>,
    ) -> AppResult<Option<User>> {
        match query.fetch_optional(&self.pool).await? {
            Some(u) => Ok(self.with_roles(vec![u]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Fills `roles` for every user with one query, highest level first.
    async fn with_roles(&self, mut users: Vec<User>) -> AppResult<Vec<User>> {
        if users.is_empty() {
            return Ok(users);
        }

        let placeholders = vec!["?"; users.len()].join(", ");
        let sql = format!(
            r#"
            SELECT ur.user_id, r.name
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id IN ({placeholders})
            ORDER BY r.level DESC, r.name
            "#
        );

        let mut query = sqlx::query_as::<_, (u64, String)>(&sql);
        for user in &users {
            query = query.bind(user.id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut by_user: HashMap<u64, Vec<String>> = HashMap::new();
        for (user_id, role) in rows {
            by_user.entry(user_id).or_default().push(role);
        }
        for user in &mut users {
            user.roles = by_user.remove(&user.id).unwrap_or_default();
        }

        Ok(users)
    }
}

async fn insert_roles(
    tx: &mut Transaction<'_, MySql>,
    user_id: u64,
    role_ids: &[u64],
    actor: &str,
) -> AppResult<()> {
    let now = Utc::now();
    for role_id in role_ids {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id, created_at, created_by)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(role_id)
        .bind(now)
        .bind(actor)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl UserRepository for MySqlStore {
    async fn find_by_id(&self, id: u64) -> AppResult<Option<User>> {
        let sql = format!("{USER_SELECT} WHERE u.id = ?");
        self.fetch_user(sqlx::query_as(&sql).bind(id)).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let sql = format!("{USER_SELECT} WHERE u.email = ?");
        self.fetch_user(sqlx::query_as(&sql).bind(email)).await
    }

    async fn find_by_employee_id(&self, employee_id: &str) -> AppResult<Option<User>> {
        let sql = format!("{USER_SELECT} WHERE u.employee_id = ?");
        self.fetch_user(sqlx::query_as(&sql).bind(employee_id)).await
    }

    async fn list(&self, page: &PageRequest) -> AppResult<(Vec<User>, i64)> {
        let filter = search_clause(&SEARCH_COLUMNS, page.search.as_deref());

        let count_sql = format!("SELECT COUNT(*) FROM users u{}", filter.sql);
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
        for value in &filter.values {
            count = count.bind(value);
        }
        let total = count.fetch_one(&self.pool).await?;

        let sql = format!("{USER_SELECT}{} ORDER BY u.id LIMIT ? OFFSET ?", filter.sql);
        let mut query = sqlx::query_as::<_, User>(&sql);
        for value in &filter.values {
            query = query.bind(value);
        }
        let users = query
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((self.with_roles(users).await?, total))
    }

    async fn create(&self, user: &NewUser, role_ids: &[u64], actor: &str) -> AppResult<u64> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO users
            (uid, employee_id, name, email, password, phone, address, birthdate, join_date,
             profile_image, division_id, position_id, is_manager, manager_id, is_active,
             created_at, created_by, updated_at, updated_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.uid)
        .bind(&user.employee_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(user.birthdate)
        .bind(user.join_date)
        .bind(&user.profile_image)
        .bind(user.division_id)
        .bind(user.position_id)
        .bind(user.is_manager)
        .bind(user.manager_id)
        .bind(user.is_active)
        .bind(now)
        .bind(actor)
        .bind(now)
        .bind(actor)
        .execute(&mut *tx)
        .await?;

        let user_id = result.last_insert_id();
        insert_roles(&mut tx, user_id, role_ids, actor).await?;

        // dropping `tx` on any `?` above rolls the whole batch back
        tx.commit().await?;

        debug!(user_id, roles = role_ids.len(), "User inserted");
        Ok(user_id)
    }

    async fn update(&self, user: &User, role_ids: Option<&[u64]>, actor: &str) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE users
            SET name = ?, email = ?, phone = ?, address = ?, birthdate = ?, join_date = ?,
                profile_image = ?, division_id = ?, position_id = ?, is_manager = ?,
                manager_id = ?, is_active = ?, updated_at = ?, updated_by = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(user.birthdate)
        .bind(user.join_date)
        .bind(&user.profile_image)
        .bind(user.division_id)
        .bind(user.position_id)
        .bind(user.is_manager)
        .bind(user.manager_id)
        .bind(user.is_active)
        .bind(Utc::now())
        .bind(actor)
        .bind(user.id)
        .execute(&mut *tx)
        .await?;

        if let Some(ids) = role_ids {
            sqlx::query("DELETE FROM user_roles WHERE user_id = ?")
                .bind(user.id)
                .execute(&mut *tx)
                .await?;
            insert_roles(&mut tx, user.id, ids, actor).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn update_password(&self, id: u64, password_hash: &str, actor: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET password = ?, updated_at = ?, updated_by = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(actor)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: u64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
