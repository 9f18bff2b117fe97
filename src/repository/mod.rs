//! Persistence ports used by the service layer.
//!
//! Each write that spans more than one row (a user plus its role set, a user
//! plus its role rows on delete) is a single trait call so the implementation
//! can run it inside one transaction.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    error::AppResult,
    model::{
        catalog::{CatalogEntry, CatalogKind},
        role::Role,
        statistics::Statistics,
        user::{NewUser, User},
    },
    models::PageRequest,
};

pub mod mysql;

#[cfg(test)]
pub mod memory;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Lookups return the user with `roles` populated.
    async fn find_by_id(&self, id: u64) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_employee_id(&self, employee_id: &str) -> AppResult<Option<User>>;
    async fn list(&self, page: &PageRequest) -> AppResult<(Vec<User>, i64)>;

    /// Inserts the user row and one `user_roles` row per id, all or nothing.
    async fn create(&self, user: &NewUser, role_ids: &[u64], actor: &str) -> AppResult<u64>;

    /// Writes every column of `user`. With `Some(ids)` the role set is
    /// replaced in the same transaction; `None` leaves it untouched.
    async fn update(&self, user: &User, role_ids: Option<&[u64]>, actor: &str) -> AppResult<()>;

    async fn update_password(&self, id: u64, password_hash: &str, actor: &str) -> AppResult<()>;

    /// Removes the role rows, then the user row.
    async fn delete(&self, id: u64) -> AppResult<()>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: u64) -> AppResult<Option<Role>>;
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;
    async fn list(&self, page: &PageRequest) -> AppResult<(Vec<Role>, i64)>;
    /// Active roles, highest level first.
    async fn list_active(&self) -> AppResult<Vec<Role>>;
    async fn create(&self, name: &str, level: i32, actor: &str) -> AppResult<u64>;
    async fn update(&self, role: &Role, actor: &str) -> AppResult<()>;
    /// Number of `user_roles` rows pointing at the role.
    async fn count_assignments(&self, id: u64) -> AppResult<i64>;
    async fn deactivate(&self, id: u64, actor: &str) -> AppResult<()>;
    async fn remove(&self, id: u64) -> AppResult<()>;
}

/// Shared store for divisions and positions, selected by [`CatalogKind`].
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn find_by_id(&self, kind: CatalogKind, id: u64) -> AppResult<Option<CatalogEntry>>;
    async fn find_by_code(&self, kind: CatalogKind, code: &str)
    -> AppResult<Option<CatalogEntry>>;
    async fn list(
        &self,
        kind: CatalogKind,
        page: &PageRequest,
    ) -> AppResult<(Vec<CatalogEntry>, i64)>;
    async fn list_active(&self, kind: CatalogKind) -> AppResult<Vec<CatalogEntry>>;
    async fn create(&self, kind: CatalogKind, code: &str, name: &str, actor: &str)
    -> AppResult<u64>;
    async fn update(&self, kind: CatalogKind, entry: &CatalogEntry, actor: &str) -> AppResult<()>;
    /// Number of users referencing the entry.
    async fn count_members(&self, kind: CatalogKind, id: u64) -> AppResult<i64>;
    async fn deactivate(&self, kind: CatalogKind, id: u64, actor: &str) -> AppResult<()>;
    async fn remove(&self, kind: CatalogKind, id: u64) -> AppResult<()>;
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// `month_start` is the first day of the current month; users joining on or
    /// after it count as new.
    async fn statistics(&self, month_start: NaiveDate) -> AppResult<Statistics>;
}
