use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::{catalog::CatalogEntry, role::Role, user::UserResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "a@x.com", format = "email")]
    pub email: String,
    #[schema(example = "secret1")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Signed token payload. `iat`/`nbf`/`exp` are unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// Stable external identifier (UUID text)
    pub uid: String,
    pub employee_id: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Highest page whose offset still fits an `i64` at the largest page size.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, starting at 1
    pub page: Option<i64>,
    /// Items per page (default 10)
    pub limit: Option<i64>,
    /// Substring search
    pub search: Option<String>,
}

/// Normalised pagination input handed to repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
}

impl PageQuery {
    pub fn normalize(&self) -> PageRequest {
        let page = self.page.filter(|p| *p >= 1).unwrap_or(1).min(MAX_PAGE);
        let limit = self
            .limit
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        PageRequest { page, limit, search }
    }
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[aliases(
    UserPage = Paginated<UserResponse>,
    RolePage = Paginated<Role>,
    CatalogPage = Paginated<CatalogEntry>
)]
pub struct Paginated<T> {
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub page_size: i64,
    pub items: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total_items: i64, request: &PageRequest) -> Self {
        Self {
            total_items,
            total_pages: (total_items + request.limit - 1) / request.limit,
            current_page: request.page,
            page_size: request.limit,
            items,
        }
    }

    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            total_items: self.total_items,
            total_pages: self.total_pages,
            current_page: self.current_page,
            page_size: self.page_size,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}
